//! Consumption CSV tests.

use cityassist_core::{
    config::PortalConfig,
    consumption::{
        read_energy_consumption, read_renewable_share, read_water_consumption, ConsumptionData,
    },
};
use std::fs;

#[test]
fn water_rows_parse_and_skip_bad_lines() {
    let csv = "\
Year,Total_Demand_MLD,Domestic_Demand_MLD,Industrial_Demand_MLD
2021.0,735,556,179
2022,n/a,573,185
 2023 , 776 , 588 , 188
";
    let rows = read_water_consumption(csv.as_bytes()).unwrap();
    assert_eq!(rows.len(), 2, "the n/a row must be skipped");
    assert_eq!(rows[0].year, "2021");
    assert_eq!(rows[0].total, 735.0);
    assert_eq!((rows[1].year.as_str(), rows[1].domestic, rows[1].industrial), ("2023", 588.0, 188.0));
}

#[test]
fn missing_columns_leave_table_empty() {
    let csv = "Year,Total\n2021,700\n";
    assert!(read_water_consumption(csv.as_bytes()).unwrap().is_empty());
    assert!(read_energy_consumption(csv.as_bytes(), "Pimpri Chinchwad").unwrap().is_empty());
    assert_eq!(read_renewable_share(csv.as_bytes()).unwrap(), None);
}

#[test]
fn energy_rows_summed_per_year_for_one_city() {
    let csv = "\
City,Year,Consumption_MWh
Pimpri Chinchwad,2022,2480
Pune,2021,5000
Pimpri Chinchwad,2021,1210.5
Pimpri Chinchwad,2021,1189.5
";
    let rows = read_energy_consumption(csv.as_bytes(), "Pimpri Chinchwad").unwrap();
    assert_eq!(rows.len(), 2);
    let y2021 = &rows[0];
    assert_eq!(y2021.year, "2021", "years must be ascending");
    assert_eq!(
        (y2021.residential, y2021.industrial, y2021.commercial, y2021.total),
        (1080.0, 960.0, 360.0, 2400.0)
    );
    assert_eq!(rows[1].total, 2480.0);
}

#[test]
fn renewable_share_taken_from_latest_year() {
    let csv = "Year,Renewable_Percentage\n2023,13.5\n2021,10.5\n2023,99\n";
    assert_eq!(read_renewable_share(csv.as_bytes()).unwrap(), Some(13.5));
}

#[test]
fn shipped_data_directory_loads() {
    let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../data");
    let config = PortalConfig::load(data_dir).unwrap();
    assert_eq!(config.water, PortalConfig::default().water, "water.json out of sync with defaults");
    assert_eq!(config.energy, PortalConfig::default().energy, "energy.json out of sync with defaults");

    let data = ConsumptionData::load(&config).unwrap();
    assert_eq!(data.water.len(), 5);
    let years: Vec<&str> = data.energy.iter().map(|r| r.year.as_str()).collect();
    assert_eq!(years, vec!["2021", "2022", "2023"]);
    assert_eq!(data.renewable_share, Some(13.5));
}

#[test]
fn missing_files_yield_empty_data() {
    let dir = tempfile::tempdir().unwrap();
    let config = PortalConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..PortalConfig::default()
    };
    let data = ConsumptionData::load(&config).unwrap();
    assert_eq!(data, ConsumptionData::default());
}

#[test]
fn config_load_reports_unreadable_reference() {
    let dir = tempfile::tempdir().unwrap();
    let err = PortalConfig::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("Cannot read"), "got: {err}");

    let reference = dir.path().join("reference");
    fs::create_dir_all(&reference).unwrap();
    fs::write(reference.join("water.json"), "{ not json").unwrap();
    let err = PortalConfig::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("Cannot parse"), "got: {err}");
}

#[test]
fn config_load_from_custom_directory() {
    let dir = tempfile::tempdir().unwrap();
    let reference = dir.path().join("reference");
    fs::create_dir_all(&reference).unwrap();

    let mut water = PortalConfig::default().water;
    water.risk_areas.truncate(2);
    fs::write(reference.join("water.json"), serde_json::to_string(&water).unwrap()).unwrap();
    fs::write(
        reference.join("energy.json"),
        serde_json::to_string(&PortalConfig::default().energy).unwrap(),
    )
    .unwrap();

    let consumption = dir.path().join("consumption");
    fs::create_dir_all(&consumption).unwrap();
    fs::write(consumption.join("pcmc_green_city.csv"), "Year,Renewable_Percentage\n2024,16\n").unwrap();

    let config = PortalConfig::load(dir.path()).unwrap();
    assert_eq!(config.water.risk_areas.len(), 2);
    let data = ConsumptionData::load(&config).unwrap();
    assert!(data.water.is_empty());
    assert_eq!(data.renewable_share, Some(16.0));
}
