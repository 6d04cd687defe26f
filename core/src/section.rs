//! Report section trait and the built-in sections.
//!
//! RULE: Every block of the combined analytics response comes from one
//! ReportSection. The engine renders sections in registration order and
//! merges their keys; later sections never see earlier output.

use crate::{
    advisory::{energy_advisory, water_advisory},
    aggregator::aggregate_value,
    clock::PortalClock,
    config::{EnergyReference, WaterReference},
    consumption::ConsumptionData,
    error::AnalyticsResult,
    request::AnalyticsRequest,
    resource::{energy_analytics, water_analytics},
    rng::StreamRng,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Everything a section may read while rendering one request.
pub struct SectionContext<'a> {
    pub request:     &'a AnalyticsRequest,
    pub consumption: &'a ConsumptionData,
    pub clock:       &'a PortalClock,
}

/// The contract every report section must fulfill.
pub trait ReportSection: Send {
    /// Unique stable name for this section.
    fn name(&self) -> &'static str;

    /// Render this section's keys for one request.
    ///
    /// - `ctx`: the request plus shared read-only data
    /// - `rng`: this section's deterministic stream for this request
    fn render(&self, ctx: &SectionContext<'_>, rng: &mut StreamRng)
        -> AnalyticsResult<Map<String, Value>>;
}

// ── Complaints ───────────────────────────────────────────────────────────────

/// The six complaint summary tables, or nothing when no complaints were sent.
/// Pure aggregation: the stream handed in is left untouched.
pub struct ComplaintSection;

impl ReportSection for ComplaintSection {
    fn name(&self) -> &'static str {
        "complaints"
    }

    fn render(
        &self,
        ctx: &SectionContext<'_>,
        _rng: &mut StreamRng,
    ) -> AnalyticsResult<Map<String, Value>> {
        if !ctx.request.has_complaints() {
            log::info!("no complaints supplied, complaint tables omitted");
            return Ok(Map::new());
        }
        let tables = aggregate_value(&ctx.request.complaints, ctx.request.role())?;
        into_object(&tables)
    }
}

// ── Water ────────────────────────────────────────────────────────────────────

pub struct WaterSection {
    reference: WaterReference,
}

impl WaterSection {
    pub fn new(reference: WaterReference) -> Self {
        Self { reference }
    }
}

impl ReportSection for WaterSection {
    fn name(&self) -> &'static str {
        "water"
    }

    fn render(
        &self,
        ctx: &SectionContext<'_>,
        rng: &mut StreamRng,
    ) -> AnalyticsResult<Map<String, Value>> {
        let a = water_analytics(&self.reference, ctx.consumption, rng);
        let advisory = water_advisory(&a, &self.reference.advisory_actions, ctx.clock);

        let mut out = Map::new();
        put(&mut out, "waterConsumption", &a.water_consumption)?;
        put(&mut out, "waterSources", &a.water_sources)?;
        put(&mut out, "seasonalWaterDemand", &a.seasonal_demand)?;
        put(&mut out, "waterQuality", &a.water_quality)?;
        put(&mut out, "waterAlerts", &a.citizen_alerts)?;
        put(&mut out, "waterProjections", &a.water_projections)?;
        put(&mut out, "waterEfficiency", &a.water_efficiency)?;
        put(&mut out, "waterRisks", &a.water_risks)?;
        put(&mut out, "waterExplanations", &self.reference.explanations)?;
        put(&mut out, "waterAdvisory", &advisory)?;
        Ok(out)
    }
}

// ── Energy ───────────────────────────────────────────────────────────────────

pub struct EnergySection {
    reference: EnergyReference,
}

impl EnergySection {
    pub fn new(reference: EnergyReference) -> Self {
        Self { reference }
    }
}

impl ReportSection for EnergySection {
    fn name(&self) -> &'static str {
        "energy"
    }

    fn render(
        &self,
        ctx: &SectionContext<'_>,
        rng: &mut StreamRng,
    ) -> AnalyticsResult<Map<String, Value>> {
        let a = energy_analytics(&self.reference, ctx.consumption, rng);
        let advisory = energy_advisory(&a, &self.reference.advisory_actions, ctx.clock);

        let mut out = Map::new();
        put(&mut out, "energyConsumption", &a.energy_consumption)?;
        put(&mut out, "energySources", &a.energy_sources)?;
        put(&mut out, "seasonalEnergyDemand", &a.seasonal_demand)?;
        put(&mut out, "energyQuality", &a.energy_quality)?;
        put(&mut out, "energyAlerts", &a.citizen_alerts)?;
        put(&mut out, "energyProjections", &a.energy_projections)?;
        put(&mut out, "energyEfficiency", &a.energy_efficiency)?;
        put(&mut out, "energyRisks", &a.energy_risks)?;
        put(&mut out, "energyExplanations", &self.reference.explanations)?;
        put(&mut out, "energyAdvisory", &advisory)?;
        Ok(out)
    }
}

fn put<T: Serialize + ?Sized>(out: &mut Map<String, Value>, key: &str, value: &T) -> AnalyticsResult<()> {
    out.insert(key.to_string(), serde_json::to_value(value)?);
    Ok(())
}

/// Serialize a struct and unwrap the resulting JSON object.
pub(crate) fn into_object<T: Serialize>(value: &T) -> AnalyticsResult<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(anyhow::anyhow!("expected a JSON object, got {other}").into()),
    }
}
