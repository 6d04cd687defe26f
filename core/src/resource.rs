//! Water and energy analytics assembled from reference tables, local
//! consumption data and seeded simulated series.
//!
//! Quality and area-risk tables are simulated. They draw only from the
//! StreamRng handed in, so the same seed always yields the same tables.

use crate::{
    aggregator::NamedValue,
    config::{AreaRisk, CitizenAlert, EnergyReference, EnergySeason, WaterReference, WaterSeason},
    consumption::{ConsumptionData, EnergyConsumptionRow, WaterConsumptionRow},
    rng::StreamRng,
    util::round_to,
};
use serde::Serialize;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Years covered by the projection tables, starting at the base year.
const PROJECTION_YEARS: i32 = 5;

/// Area risk jitter range, half-open.
const RISK_JITTER: (i64, i64) = (-5, 6);

// ── Water ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterQualityRow {
    pub month:     String,
    #[serde(rename = "pH")]
    pub ph:        f64,
    pub turbidity: f64,
    pub tds:       i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterProjectionRow {
    pub year:        String,
    pub projected:   f64,
    pub sustainable: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterEfficiencyRow {
    pub year:      String,
    pub leakage:   f64,
    pub treatment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterRiskRow {
    pub area:                String,
    pub shortage_risk:       i64,
    pub infrastructure_risk: i64,
    pub quality_risk:        i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterAnalytics {
    pub water_consumption: Vec<WaterConsumptionRow>,
    pub water_sources:     Vec<NamedValue>,
    pub seasonal_demand:   Vec<WaterSeason>,
    pub water_quality:     Vec<WaterQualityRow>,
    pub citizen_alerts:    Vec<CitizenAlert>,
    pub water_projections: Vec<WaterProjectionRow>,
    pub water_efficiency:  Vec<WaterEfficiencyRow>,
    pub water_risks:       Vec<WaterRiskRow>,
}

pub fn water_analytics(
    reference: &WaterReference,
    consumption: &ConsumptionData,
    rng: &mut StreamRng,
) -> WaterAnalytics {
    WaterAnalytics {
        water_consumption: consumption.water.clone(),
        water_sources: reference.sources.clone(),
        seasonal_demand: reference.seasonal_demand.clone(),
        water_quality: water_quality(rng),
        citizen_alerts: reference.alerts.clone(),
        water_projections: water_projections(reference),
        water_efficiency: water_efficiency(reference),
        water_risks: water_risks(&reference.risk_areas, rng),
    }
}

fn water_quality(rng: &mut StreamRng) -> Vec<WaterQualityRow> {
    MONTHS
        .iter()
        .map(|&month| {
            let season_factor = match month {
                "Apr" | "May"         => 1.15,
                "Jul" | "Aug" | "Sep" => 0.9,
                _                     => 1.0,
            };
            let random_factor = 0.95 + rng.next_f64() * 0.1;
            WaterQualityRow {
                month: month.into(),
                ph: round_to(7.2 * random_factor, 1),
                turbidity: round_to(3.5 * season_factor * random_factor, 1),
                tds: (380.0 * season_factor * random_factor).round() as i64,
            }
        })
        .collect()
}

fn water_projections(reference: &WaterReference) -> Vec<WaterProjectionRow> {
    let p = &reference.projection;
    (0..PROJECTION_YEARS)
        .map(|i| WaterProjectionRow {
            year: (p.base_year + i).to_string(),
            projected: round_to(p.base_demand * (1.0 + p.annual_growth).powi(i), 1),
            // Sustainable supply grows at half the demand rate.
            sustainable: round_to(p.sustainable_level * (1.0 + p.annual_growth * 0.5).powi(i), 1),
        })
        .collect()
}

fn water_efficiency(reference: &WaterReference) -> Vec<WaterEfficiencyRow> {
    let window = reference.efficiency_years;
    (window.start_year..=window.end_year)
        .map(|year| {
            let elapsed = f64::from(year - window.start_year);
            WaterEfficiencyRow {
                year: year.to_string(),
                leakage: round_to((30.0 - elapsed * 2.5).max(15.0), 1),
                treatment: round_to((75.0 + elapsed * 2.2).min(90.0), 1),
            }
        })
        .collect()
}

fn water_risks(areas: &[AreaRisk], rng: &mut StreamRng) -> Vec<WaterRiskRow> {
    areas
        .iter()
        .map(|a| {
            let base = a.base_risk;
            WaterRiskRow {
                area: a.area.clone(),
                shortage_risk: base + jitter(rng),
                infrastructure_risk: base - 5 + jitter(rng),
                quality_risk: (base - 10 + jitter(rng)).clamp(10, 70),
            }
        })
        .collect()
}

// ── Energy ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyQualityRow {
    pub month:     String,
    pub stability: f64,
    pub outages:   f64,
    pub voltage:   f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyProjectionRow {
    pub year:      String,
    pub projected: f64,
    pub capacity:  f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyEfficiencyRow {
    pub year:      String,
    pub losses:    f64,
    pub renewable: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyRiskRow {
    pub area:                String,
    pub outage_risk:         i64,
    pub capacity_risk:       i64,
    pub infrastructure_risk: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyAnalytics {
    pub energy_consumption: Vec<EnergyConsumptionRow>,
    pub energy_sources:     Vec<NamedValue>,
    pub seasonal_demand:    Vec<EnergySeason>,
    pub energy_quality:     Vec<EnergyQualityRow>,
    pub citizen_alerts:     Vec<CitizenAlert>,
    pub energy_projections: Vec<EnergyProjectionRow>,
    pub energy_efficiency:  Vec<EnergyEfficiencyRow>,
    pub energy_risks:       Vec<EnergyRiskRow>,
}

pub fn energy_analytics(
    reference: &EnergyReference,
    consumption: &ConsumptionData,
    rng: &mut StreamRng,
) -> EnergyAnalytics {
    EnergyAnalytics {
        energy_consumption: consumption.energy.clone(),
        energy_sources: energy_sources(consumption.renewable_share, &reference.fallback_sources),
        seasonal_demand: reference.seasonal_demand.clone(),
        energy_quality: energy_quality(rng),
        citizen_alerts: reference.alerts.clone(),
        energy_projections: energy_projections(reference),
        energy_efficiency: energy_efficiency(reference),
        energy_risks: energy_risks(&reference.risk_areas, rng),
    }
}

/// Energy mix around a measured renewable share; gas and other are fixed.
pub fn energy_sources(renewable_share: Option<f64>, fallback: &[NamedValue]) -> Vec<NamedValue> {
    match renewable_share {
        Some(renewable) => vec![
            NamedValue::new("Renewable", renewable),
            NamedValue::new("Coal", round_to(100.0 - renewable - 20.0, 1)),
            NamedValue::new("Natural Gas", 15.0),
            NamedValue::new("Other", 5.0),
        ],
        None => fallback.to_vec(),
    }
}

fn energy_quality(rng: &mut StreamRng) -> Vec<EnergyQualityRow> {
    MONTHS
        .iter()
        .map(|&month| {
            let season_factor = match month {
                "Apr" | "May" => 0.92,
                "Dec" | "Jan" => 0.95,
                _             => 1.0,
            };
            let random_factor = 0.98 + rng.next_f64() * 0.04;
            EnergyQualityRow {
                month: month.into(),
                stability: round_to(95.0 * season_factor * random_factor, 1),
                outages: round_to(5.0 * (2.0 - season_factor) * random_factor, 1),
                voltage: round_to(220.0 * random_factor, 1),
            }
        })
        .collect()
}

fn energy_projections(reference: &EnergyReference) -> Vec<EnergyProjectionRow> {
    let p = &reference.projection;
    (0..PROJECTION_YEARS)
        .map(|i| EnergyProjectionRow {
            year: (p.base_year + i).to_string(),
            projected: round_to(p.base_demand * (1.0 + p.demand_growth).powi(i), 1),
            capacity: round_to(p.capacity * (1.0 + p.capacity_growth).powi(i), 1),
        })
        .collect()
}

fn energy_efficiency(reference: &EnergyReference) -> Vec<EnergyEfficiencyRow> {
    let window = reference.efficiency_years;
    (window.start_year..=window.end_year)
        .map(|year| {
            let elapsed = f64::from(year - window.start_year);
            EnergyEfficiencyRow {
                year: year.to_string(),
                losses: round_to((22.0 - elapsed * 1.2).max(14.0), 1),
                renewable: round_to((8.0 + elapsed * 1.8).min(20.0), 1),
            }
        })
        .collect()
}

fn energy_risks(areas: &[AreaRisk], rng: &mut StreamRng) -> Vec<EnergyRiskRow> {
    areas
        .iter()
        .map(|a| {
            let base = a.base_risk;
            EnergyRiskRow {
                area: a.area.clone(),
                outage_risk: base + jitter(rng),
                capacity_risk: base - 3 + jitter(rng),
                infrastructure_risk: (base - 8 + jitter(rng)).clamp(10, 70),
            }
        })
        .collect()
}

fn jitter(rng: &mut StreamRng) -> i64 {
    rng.next_i64_in(RISK_JITTER.0, RISK_JITTER.1)
}
