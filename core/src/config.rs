//! Static reference tables for the water and energy dashboards.
//!
//! Loaded from `{data_dir}/reference/*.json`. Tests and callers without a
//! data directory use `PortalConfig::default()`, which carries the same
//! tables as the shipped files.

use crate::aggregator::NamedValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterSeason {
    pub name:     String,
    pub demand:   f64,
    pub supply:   f64,
    pub critical: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnergySeason {
    pub name:     String,
    pub demand:   f64,
    pub capacity: f64,
    pub peak:     f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitizenAlert {
    pub month:        String,
    pub level:        String,
    pub alert:        String,
    pub conservation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaRisk {
    pub area:      String,
    pub base_risk: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterProjection {
    pub base_year:         i32,
    /// Current demand in MLD.
    pub base_demand:       f64,
    pub sustainable_level: f64,
    pub annual_growth:     f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnergyProjection {
    pub base_year:       i32,
    /// Current peak demand in MW.
    pub base_demand:     f64,
    pub capacity:        f64,
    pub demand_growth:   f64,
    pub capacity_growth: f64,
}

/// Inclusive year range for the efficiency trend tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct YearWindow {
    pub start_year: i32,
    pub end_year:   i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterReference {
    /// CSV with Year, Total_Demand_MLD, Domestic_Demand_MLD, Industrial_Demand_MLD.
    pub consumption_file: String,
    pub sources:          Vec<NamedValue>,
    pub seasonal_demand:  Vec<WaterSeason>,
    pub alerts:           Vec<CitizenAlert>,
    pub projection:       WaterProjection,
    pub efficiency_years: YearWindow,
    pub risk_areas:       Vec<AreaRisk>,
    pub explanations:     BTreeMap<String, String>,
    pub advisory_actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnergyReference {
    /// CSV with City, Year, Consumption_MWh.
    pub consumption_file: String,
    /// CSV with Year, Renewable_Percentage.
    pub green_city_file:  String,
    /// City whose rows are kept from the consumption CSV.
    pub city:             String,
    pub fallback_sources: Vec<NamedValue>,
    pub seasonal_demand:  Vec<EnergySeason>,
    pub alerts:           Vec<CitizenAlert>,
    pub projection:       EnergyProjection,
    pub efficiency_years: YearWindow,
    pub risk_areas:       Vec<AreaRisk>,
    pub explanations:     BTreeMap<String, String>,
    pub advisory_actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortalConfig {
    /// Root for consumption CSVs. `None` means no consumption data.
    pub data_dir: Option<PathBuf>,
    pub water:    WaterReference,
    pub energy:   EnergyReference,
}

impl PortalConfig {
    /// Load from the data/ directory.
    /// In tests, use PortalConfig::default().
    pub fn load(data_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let data_dir = data_dir.as_ref();
        let water: WaterReference = read_json(&data_dir.join("reference").join("water.json"))?;
        let energy: EnergyReference = read_json(&data_dir.join("reference").join("energy.json"))?;
        log::info!(
            "loaded reference tables from {} ({} water areas, {} energy areas)",
            data_dir.display(),
            water.risk_areas.len(),
            energy.risk_areas.len()
        );
        Ok(Self {
            data_dir: Some(data_dir.to_path_buf()),
            water,
            energy,
        })
    }

    /// Resolve a data file name against the data directory.
    pub fn data_path(&self, file: &str) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(file))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))
}

// ── Built-in tables ──────────────────────────────────────────────────────────

const AREAS: [&str; 5] = ["Pimpri", "Chinchwad", "Bhosari", "Wakad", "Nigdi"];

fn area_risks(low: i64, medium: i64, high: i64) -> Vec<AreaRisk> {
    AREAS
        .iter()
        .map(|&area| AreaRisk {
            area: area.into(),
            base_risk: match area {
                "Pimpri" | "Nigdi"      => low,
                "Chinchwad" | "Bhosari" => medium,
                _                       => high,
            },
        })
        .collect()
}

fn alert(month: &str, level: &str, alert: &str, conservation: &str) -> CitizenAlert {
    CitizenAlert {
        month: month.into(),
        level: level.into(),
        alert: alert.into(),
        conservation: conservation.into(),
    }
}

fn explanations(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for WaterReference {
    fn default() -> Self {
        let season = |name: &str, demand: f64| WaterSeason {
            name: name.into(),
            demand,
            supply: 110.0,
            critical: 80.0,
        };
        Self {
            consumption_file: "consumption/water_sustainability.csv".into(),
            sources: vec![
                NamedValue::new("Pavana Dam", 55.0),
                NamedValue::new("Groundwater", 20.0),
                NamedValue::new("Indrayani River", 15.0),
                NamedValue::new("Other Sources", 10.0),
            ],
            seasonal_demand: vec![
                season("Winter", 90.0),
                season("Spring", 95.0),
                season("Summer", 120.0),
                season("Monsoon", 85.0),
                season("Autumn", 90.0),
            ],
            alerts: vec![
                alert("April-May", "high", "Water Supply Reduction",
                    "Store water in clean containers during morning supply. Report leakages promptly."),
                alert("June-September", "low", "Normal Supply",
                    "Practice regular water conservation. Use wastewater from RO systems for plants."),
                alert("October-November", "medium", "Occasional Disruption",
                    "Expect occasional supply disruptions due to maintenance. Store water as needed."),
                alert("December-March", "low", "Normal Supply",
                    "Continue regular conservation practices. Fix any leaking taps or pipes."),
            ],
            projection: WaterProjection {
                base_year: 2024,
                base_demand: 795.0,
                sustainable_level: 780.0,
                annual_growth: 0.025,
            },
            efficiency_years: YearWindow { start_year: 2018, end_year: 2024 },
            risk_areas: area_risks(30, 45, 60),
            explanations: explanations(&[
                ("pH Level", "Measures how acidic or basic water is. The ideal range is 6.5-8.5, with 7 being neutral."),
                ("Turbidity (NTU)", "Measures water cloudiness. Lower values indicate clearer water. PCMC standards require <5 NTU."),
                ("Total Dissolved Solids (TDS)", "Measures inorganic salts and small organic matter dissolved in water. Ideal range is 300-500 mg/L."),
                ("MLD", "Million Liters per Day - Standard unit for measuring water volume in municipal supply systems."),
                ("BOD", "Biochemical Oxygen Demand - Amount of dissolved oxygen needed by organisms to break down organic material. Lower is better."),
                ("COD", "Chemical Oxygen Demand - Amount of oxygen required for chemical oxidation of contaminants. Lower is better."),
            ]),
            advisory_actions: vec![
                "Report leakages immediately to minimize water loss".into(),
                "Store water adequately during supply hours".into(),
                "Use water efficient fixtures to reduce consumption".into(),
                "Harvest rainwater where possible to supplement supply".into(),
            ],
        }
    }
}

impl Default for EnergyReference {
    fn default() -> Self {
        let season = |name: &str, demand: f64| EnergySeason {
            name: name.into(),
            demand,
            capacity: 240.0,
            peak: 270.0,
        };
        Self {
            consumption_file: "consumption/electricity_consumption.csv".into(),
            green_city_file: "consumption/pcmc_green_city.csv".into(),
            city: "Pimpri Chinchwad".into(),
            fallback_sources: vec![
                NamedValue::new("Renewable", 12.0),
                NamedValue::new("Coal", 68.0),
                NamedValue::new("Natural Gas", 15.0),
                NamedValue::new("Other", 5.0),
            ],
            seasonal_demand: vec![
                season("Winter", 220.0),
                season("Spring", 200.0),
                season("Summer", 260.0),
                season("Monsoon", 190.0),
                season("Post-Monsoon", 210.0),
            ],
            alerts: vec![
                alert("April-May", "high", "Peak Demand Period",
                    "Reduce usage during 6-10 PM. Use energy-efficient appliances and optimize AC temperature."),
                alert("June-September", "medium", "Monsoon Safety",
                    "Be cautious of electrical safety during rains. Report any sparking poles or transformers."),
                alert("October-November", "low", "Normal Operation",
                    "Standard energy conservation practices recommended."),
                alert("December-March", "medium", "Winter Peak",
                    "Avoid using multiple heating appliances simultaneously to prevent overloading."),
            ],
            projection: EnergyProjection {
                base_year: 2024,
                base_demand: 260.0,
                capacity: 300.0,
                demand_growth: 0.04,
                capacity_growth: 0.025,
            },
            efficiency_years: YearWindow { start_year: 2018, end_year: 2024 },
            risk_areas: area_risks(25, 40, 55),
            explanations: explanations(&[
                ("MW", "Megawatt - Unit of power equal to one million watts, used to measure electricity generation capacity."),
                ("MWh", "Megawatt Hour - Unit of energy equivalent to one megawatt of power sustained for one hour."),
                ("kWh", "Kilowatt Hour - Standard unit for measuring electricity consumption in homes."),
                ("T&D Losses", "Transmission and Distribution Losses - Percentage of electricity lost during transmission from generation to consumption."),
                ("Peak Demand", "Highest amount of electricity drawn from the grid at any given time, measured in MW."),
                ("Load Factor", "Ratio of average load to peak load, indicating efficiency of electricity usage. Higher is better."),
            ]),
            advisory_actions: vec![
                "Avoid using heavy appliances during peak hours (6-10 PM)".into(),
                "Use natural light during daytime where possible".into(),
                "Maintain appliances regularly for optimal efficiency".into(),
                "Consider solar solutions for supplementary power".into(),
            ],
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            water: WaterReference::default(),
            energy: EnergyReference::default(),
        }
    }
}
