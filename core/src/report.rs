//! Report engine: owns reference data, consumption data, the clock and the
//! seeded streams, and renders the registered sections for each request.
//!
//! Execution order (fixed, registration order):
//!   1. complaints
//!   2. water
//!   3. energy
//!
//! Every request gets fresh streams from the same seed, so rendering the
//! same request twice yields identical output.

use crate::{
    clock::PortalClock,
    config::PortalConfig,
    consumption::ConsumptionData,
    error::AnalyticsResult,
    request::{AnalyticsRequest, ResourceKind, ResourceRequest},
    resource::{energy_analytics, water_analytics},
    rng::{RngBank, StreamSlot},
    section::{into_object, ComplaintSection, EnergySection, ReportSection, SectionContext, WaterSection},
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

/// Answer to a single-resource lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceResponse {
    pub success:   bool,
    pub data:      Map<String, Value>,
    pub timestamp: String,
}

pub struct ReportEngine {
    pub clock:   PortalClock,
    config:      PortalConfig,
    rng_bank:    RngBank,
    consumption: ConsumptionData,
    sections:    Vec<(StreamSlot, Box<dyn ReportSection>)>,
}

impl ReportEngine {
    /// Create an engine with no sections registered.
    pub fn new(config: PortalConfig, seed: u64, clock: PortalClock) -> AnalyticsResult<Self> {
        let consumption = ConsumptionData::load(&config)?;
        Ok(Self {
            clock,
            config,
            rng_bank: RngBank::new(seed),
            consumption,
            sections: Vec::new(),
        })
    }

    /// Create an engine with the standard sections in documented order.
    pub fn build(config: PortalConfig, seed: u64, clock: PortalClock) -> AnalyticsResult<Self> {
        let water = config.water.clone();
        let energy = config.energy.clone();
        let mut engine = Self::new(config, seed, clock)?;
        engine.register(StreamSlot::Complaints, Box::new(ComplaintSection));
        engine.register(StreamSlot::Water, Box::new(WaterSection::new(water)));
        engine.register(StreamSlot::Energy, Box::new(EnergySection::new(energy)));
        log::debug!(
            "report engine ready: seed={} sections={}",
            engine.rng_bank.master_seed(),
            engine.sections.len()
        );
        Ok(engine)
    }

    /// Built-in tables, no consumption files, clock pinned to 2024-04-15 10:00.
    pub fn build_test(seed: u64) -> AnalyticsResult<Self> {
        let at = NaiveDate::from_ymd_opt(2024, 4, 15)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .ok_or_else(|| anyhow::anyhow!("invalid test clock"))?;
        Self::build(PortalConfig::default(), seed, PortalClock::Fixed(at))
    }

    /// Register a section. Call in the documented execution order.
    pub fn register(&mut self, slot: StreamSlot, section: Box<dyn ReportSection>) {
        self.sections.push((slot, section));
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn consumption(&self) -> &ConsumptionData {
        &self.consumption
    }

    /// Re-read the consumption files.
    pub fn refresh_consumption(&mut self) -> AnalyticsResult<()> {
        self.consumption = ConsumptionData::load(&self.config)?;
        Ok(())
    }

    /// Render every section for one dashboard request and merge the keys.
    pub fn generate_analytics(&self, request: &AnalyticsRequest) -> AnalyticsResult<Map<String, Value>> {
        log::info!(
            "analytics request: role={} view={}",
            request.role().as_str(),
            request.view_type
        );
        let ctx = SectionContext {
            request,
            consumption: &self.consumption,
            clock: &self.clock,
        };

        let mut combined = Map::new();
        for (slot, section) in &self.sections {
            let mut rng = self.rng_bank.for_slot(*slot);
            let rendered = section.render(&ctx, &mut rng)?;
            log::debug!("section {} rendered {} keys", section.name(), rendered.len());
            combined.extend(rendered);
        }

        log::info!("generated combined analytics with {} key metrics", combined.len());
        Ok(combined)
    }

    /// Analytics for one resource, with its measurement explanations.
    pub fn fetch_resource_data(&mut self, request: &ResourceRequest) -> AnalyticsResult<ResourceResponse> {
        let kind = request.kind()?;
        if request.force_refresh {
            self.refresh_consumption()?;
        }

        let mut data = match kind {
            ResourceKind::Water => {
                let mut rng = self.rng_bank.for_slot(StreamSlot::Water);
                into_object(&water_analytics(&self.config.water, &self.consumption, &mut rng))?
            }
            ResourceKind::Energy => {
                let mut rng = self.rng_bank.for_slot(StreamSlot::Energy);
                into_object(&energy_analytics(&self.config.energy, &self.consumption, &mut rng))?
            }
        };
        let explanations = match kind {
            ResourceKind::Water => &self.config.water.explanations,
            ResourceKind::Energy => &self.config.energy.explanations,
        };
        data.insert("explanations".into(), serde_json::to_value(explanations)?);

        Ok(ResourceResponse {
            success: true,
            data,
            timestamp: self.clock.now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        })
    }
}
