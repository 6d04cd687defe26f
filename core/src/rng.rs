//! Deterministic random number generation for simulated tables.
//!
//! RULE: Nothing in the core may call any platform RNG.
//! Every simulated value flows through a StreamRng derived from the
//! single master seed handed to the report engine.
//!
//! Each simulated table gets its own stream, seeded from
//! (master_seed XOR slot_index * golden ratio). Adding a table never
//! shifts the values of the existing ones.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single simulated table.
pub struct StreamRng {
    pub name: &'static str,
    inner:    Pcg64Mcg,
}

impl StreamRng {
    /// Create a stream from the master seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll an integer in [low, high). Panics if the range is empty.
    pub fn next_i64_in(&mut self, low: i64, high: i64) -> i64 {
        use rand::RngCore;
        assert!(high > low, "empty range {low}..{high}");
        let span = (high - low) as u64;
        low + (self.inner.next_u64() % span) as i64
    }
}

/// All streams for one engine, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_slot(&self, slot: StreamSlot) -> StreamRng {
        StreamRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries, only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    /// Reserved. The complaint tables are deterministic and never draw.
    Complaints = 0,
    Water = 1,
    Energy = 2,
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Complaints => "complaints",
            Self::Water      => "water",
            Self::Energy     => "energy",
        }
    }
}
