//! Consumption datasets read from local CSV exports.
//!
//! Every file is optional: a missing file yields an empty table (or no
//! renewable share) and a warning. A file that exists but is not valid CSV
//! is an error.

use crate::{config::PortalConfig, error::AnalyticsResult, util::round_to};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

/// Residential / industrial / commercial split applied to city totals.
const SECTOR_SHARES: (f64, f64, f64) = (0.45, 0.40, 0.15);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterConsumptionRow {
    pub year:       String,
    pub domestic:   f64,
    pub industrial: f64,
    pub total:      f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyConsumptionRow {
    pub year:        String,
    pub residential: f64,
    pub industrial:  f64,
    pub commercial:  f64,
    pub total:       f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsumptionData {
    pub water:           Vec<WaterConsumptionRow>,
    pub energy:          Vec<EnergyConsumptionRow>,
    /// Latest-year renewable share of the city's energy mix, in percent.
    pub renewable_share: Option<f64>,
}

impl ConsumptionData {
    /// Read every consumption file the config names.
    pub fn load(config: &PortalConfig) -> AnalyticsResult<Self> {
        let water = match open_optional(config.data_path(&config.water.consumption_file))? {
            Some(file) => read_water_consumption(file)?,
            None => Vec::new(),
        };
        let energy = match open_optional(config.data_path(&config.energy.consumption_file))? {
            Some(file) => read_energy_consumption(file, &config.energy.city)?,
            None => Vec::new(),
        };
        let renewable_share = match open_optional(config.data_path(&config.energy.green_city_file))? {
            Some(file) => read_renewable_share(file)?,
            None => None,
        };
        log::debug!(
            "consumption loaded: {} water years, {} energy years, renewable={:?}",
            water.len(),
            energy.len(),
            renewable_share
        );
        Ok(Self {
            water,
            energy,
            renewable_share,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawWaterRow {
    #[serde(rename = "Year")]
    year:       Option<String>,
    #[serde(rename = "Total_Demand_MLD")]
    total:      Option<String>,
    #[serde(rename = "Domestic_Demand_MLD")]
    domestic:   Option<String>,
    #[serde(rename = "Industrial_Demand_MLD")]
    industrial: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawElectricityRow {
    #[serde(rename = "City")]
    city:        Option<String>,
    #[serde(rename = "Year")]
    year:        Option<String>,
    #[serde(rename = "Consumption_MWh")]
    consumption: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGreenCityRow {
    #[serde(rename = "Year")]
    year:      Option<String>,
    #[serde(rename = "Renewable_Percentage")]
    renewable: Option<String>,
}

pub fn read_water_consumption<R: Read>(reader: R) -> AnalyticsResult<Vec<WaterConsumptionRow>> {
    let mut rdr = csv_reader(reader);
    if !has_columns(
        &mut rdr,
        &["Year", "Total_Demand_MLD", "Domestic_Demand_MLD", "Industrial_Demand_MLD"],
    )? {
        return Ok(Vec::new());
    }
    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawWaterRow>() {
        let raw = result?;
        let (Some(year), Some(total), Some(domestic), Some(industrial)) = (
            parse_year(raw.year.as_deref()),
            parse_f64(raw.total.as_deref()),
            parse_f64(raw.domestic.as_deref()),
            parse_f64(raw.industrial.as_deref()),
        ) else {
            log::debug!("skipping unparseable water consumption row {raw:?}");
            continue;
        };
        rows.push(WaterConsumptionRow {
            year: year.to_string(),
            domestic,
            industrial,
            total,
        });
    }
    Ok(rows)
}

/// Sum one city's consumption per year and split it into sectors.
pub fn read_energy_consumption<R: Read>(
    reader: R,
    city: &str,
) -> AnalyticsResult<Vec<EnergyConsumptionRow>> {
    let mut rdr = csv_reader(reader);
    if !has_columns(&mut rdr, &["City", "Year", "Consumption_MWh"])? {
        return Ok(Vec::new());
    }
    let mut by_year: BTreeMap<i64, f64> = BTreeMap::new();
    for result in rdr.deserialize::<RawElectricityRow>() {
        let raw = result?;
        if raw.city.as_deref().map(str::trim) != Some(city) {
            continue;
        }
        let (Some(year), Some(mwh)) = (
            parse_year(raw.year.as_deref()),
            parse_f64(raw.consumption.as_deref()),
        ) else {
            continue;
        };
        *by_year.entry(year).or_default() += mwh;
    }
    let (residential, industrial, commercial) = SECTOR_SHARES;
    Ok(by_year
        .into_iter()
        .map(|(year, total)| EnergyConsumptionRow {
            year: year.to_string(),
            residential: round_to(total * residential, 1),
            industrial: round_to(total * industrial, 1),
            commercial: round_to(total * commercial, 1),
            total: round_to(total, 1),
        })
        .collect())
}

/// Renewable share of the most recent year; first row wins on ties.
pub fn read_renewable_share<R: Read>(reader: R) -> AnalyticsResult<Option<f64>> {
    let mut rdr = csv_reader(reader);
    if !has_columns(&mut rdr, &["Year", "Renewable_Percentage"])? {
        return Ok(None);
    }
    let mut latest: Option<(i64, f64)> = None;
    for result in rdr.deserialize::<RawGreenCityRow>() {
        let raw = result?;
        let (Some(year), Some(share)) = (
            parse_year(raw.year.as_deref()),
            parse_f64(raw.renewable.as_deref()),
        ) else {
            continue;
        };
        if latest.is_none_or(|(best, _)| year > best) {
            latest = Some((year, share));
        }
    }
    Ok(latest.map(|(_, share)| share))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

fn has_columns<R: Read>(rdr: &mut csv::Reader<R>, required: &[&str]) -> AnalyticsResult<bool> {
    let headers = rdr.headers()?;
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        log::warn!("consumption CSV lacks columns {missing:?}, table left empty");
    }
    Ok(missing.is_empty())
}

fn open_optional(path: Option<PathBuf>) -> AnalyticsResult<Option<File>> {
    let Some(path) = path else {
        return Ok(None);
    };
    match File::open(&path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("consumption file {} not found", path.display());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

// Forgiving about thousands separators and stray whitespace.
fn parse_f64(s: Option<&str>) -> Option<f64> {
    let s = s?.trim().replace(',', "");
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

// Accepts `2021` as well as spreadsheet-style `2021.0`.
fn parse_year(s: Option<&str>) -> Option<i64> {
    let v = parse_f64(s)?;
    (v.fract() == 0.0).then_some(v as i64)
}
