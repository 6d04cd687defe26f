//! Citizen advisory tests.

use chrono::NaiveDate;
use cityassist_core::{
    advisory::{energy_advisory, water_advisory},
    clock::{PortalClock, Season},
    config::{EnergyReference, WaterReference},
    consumption::{ConsumptionData, EnergyConsumptionRow, WaterConsumptionRow},
    resource::{energy_analytics, water_analytics, EnergyAnalytics, WaterAnalytics},
    rng::{RngBank, StreamSlot},
};

fn clock_at(month: u32) -> PortalClock {
    let at = NaiveDate::from_ymd_opt(2024, month, 10)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap();
    PortalClock::Fixed(at)
}

fn water_with(consumption: &ConsumptionData) -> WaterAnalytics {
    let mut rng = RngBank::new(42).for_slot(StreamSlot::Water);
    water_analytics(&WaterReference::default(), consumption, &mut rng)
}

fn energy_with(consumption: &ConsumptionData) -> EnergyAnalytics {
    let mut rng = RngBank::new(42).for_slot(StreamSlot::Energy);
    energy_analytics(&EnergyReference::default(), consumption, &mut rng)
}

fn water_years(totals: &[f64]) -> ConsumptionData {
    ConsumptionData {
        water: totals
            .iter()
            .enumerate()
            .map(|(i, &total)| WaterConsumptionRow {
                year: (2020 + i).to_string(),
                domestic: total * 0.75,
                industrial: total * 0.25,
                total,
            })
            .collect(),
        ..ConsumptionData::default()
    }
}

fn energy_years(totals: &[f64]) -> ConsumptionData {
    ConsumptionData {
        energy: totals
            .iter()
            .enumerate()
            .map(|(i, &total)| EnergyConsumptionRow {
                year: (2020 + i).to_string(),
                residential: total * 0.45,
                industrial: total * 0.40,
                commercial: total * 0.15,
                total,
            })
            .collect(),
        ..ConsumptionData::default()
    }
}

#[test]
fn seasons_follow_local_calendar() {
    assert_eq!(Season::of_month(1), Season::Winter);
    assert_eq!(Season::of_month(4), Season::Summer);
    assert_eq!(Season::of_month(7), Season::Monsoon);
    assert_eq!(Season::of_month(11), Season::Autumn);
    assert_eq!(Season::of_month(12), Season::Winter);
    assert_eq!(clock_at(4).month_name(), "April");
}

#[test]
fn summer_demand_triggers_supply_warnings() {
    let clock = clock_at(4);
    let water = water_advisory(&water_with(&ConsumptionData::default()), &[], &clock);
    assert!(water.seasonal.starts_with("During April, water demand typically increases"), "{}", water.seasonal);

    let energy = energy_advisory(&energy_with(&ConsumptionData::default()), &[], &clock);
    assert!(energy.seasonal.starts_with("During Summer, energy demand typically peaks"), "{}", energy.seasonal);
}

#[test]
fn unmatched_season_falls_back_to_regular_schedule() {
    let clock = clock_at(11);
    let energy = energy_advisory(&energy_with(&ConsumptionData::default()), &[], &clock);
    assert!(energy.seasonal.starts_with("Regular energy supply expected for Autumn"), "{}", energy.seasonal);
}

#[test]
fn monsoon_water_supply_is_stable() {
    let water = water_advisory(&water_with(&ConsumptionData::default()), &[], &clock_at(7));
    assert!(water.seasonal.starts_with("July typically has stable water supply"), "{}", water.seasonal);
}

#[test]
fn consumption_trend_drives_conservation_advice() {
    let clock = clock_at(4);
    let none = water_advisory(&water_with(&ConsumptionData::default()), &[], &clock);
    assert!(none.conservation.starts_with("Practice water conservation"));

    let rising = water_advisory(&water_with(&water_years(&[100.0, 120.0])), &[], &clock);
    assert!(rising.conservation.contains("trending upward"));

    let steady = water_advisory(&water_with(&water_years(&[100.0, 105.0])), &[], &clock);
    assert!(steady.conservation.starts_with("Maintain water conservation"));

    let energy_rising = energy_advisory(&energy_with(&energy_years(&[100.0, 106.0])), &[], &clock);
    assert!(energy_rising.consumption.contains("trending upward"));
    let energy_steady = energy_advisory(&energy_with(&energy_years(&[100.0, 104.0])), &[], &clock);
    assert!(energy_steady.consumption.starts_with("Maintain energy conservation"));
}

#[test]
fn latest_quality_reading_drives_quality_advice() {
    let clock = clock_at(4);
    let mut analytics = water_with(&ConsumptionData::default());
    let normal = water_advisory(&analytics, &[], &clock);
    assert!(normal.quality.contains("within acceptable limits"));

    if let Some(last) = analytics.water_quality.last_mut() {
        last.turbidity = 4.5;
    }
    assert!(water_advisory(&analytics, &[], &clock).quality.contains("turbidity"));

    if let Some(last) = analytics.water_quality.last_mut() {
        last.ph = 8.4;
    }
    assert!(water_advisory(&analytics, &[], &clock).quality.contains("pH levels are outside"));
}

#[test]
fn grid_losses_drive_efficiency_advice() {
    let clock = clock_at(4);
    let mut analytics = energy_with(&ConsumptionData::default());
    let normal = energy_advisory(&analytics, &[], &clock);
    assert!(normal.efficiency.starts_with("Grid efficiency is within normal parameters"));

    if let Some(last) = analytics.energy_efficiency.last_mut() {
        last.losses = 18.0;
    }
    assert!(energy_advisory(&analytics, &[], &clock).efficiency.contains("higher than optimal"));
}

#[test]
fn configured_actions_copied_verbatim() {
    let reference = WaterReference::default();
    let advisory = water_advisory(
        &water_with(&ConsumptionData::default()),
        &reference.advisory_actions,
        &clock_at(1),
    );
    assert_eq!(advisory.actions, reference.advisory_actions);
}
