//! Citizen advisories derived from the current resource analytics.

use crate::{
    clock::PortalClock,
    resource::{EnergyAnalytics, WaterAnalytics},
};
use serde::Serialize;

/// Month-over-month growth above which water use counts as trending up.
const WATER_TREND_THRESHOLD: f64 = 1.1;
const ENERGY_TREND_THRESHOLD: f64 = 1.05;
/// T&D losses (percent) above which the grid counts as inefficient.
const ENERGY_LOSS_THRESHOLD: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterAdvisory {
    pub quality:      String,
    pub conservation: String,
    pub seasonal:     String,
    pub actions:      Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyAdvisory {
    pub consumption: String,
    pub efficiency:  String,
    pub seasonal:    String,
    pub actions:     Vec<String>,
}

pub fn water_advisory(
    analytics: &WaterAnalytics,
    actions: &[String],
    clock: &PortalClock,
) -> WaterAdvisory {
    let month = clock.month_name();
    let season = clock.season().label();

    let quality = match analytics.water_quality.last() {
        Some(q) if q.ph > 8.0 || q.ph < 6.5 => {
            "Water pH levels are outside ideal range. Consider using water purifiers for drinking water."
        }
        Some(q) if q.turbidity > 4.0 => {
            "Water turbidity levels are elevated. Let tap water stand before use to allow particles to settle."
        }
        Some(_) => "Water quality parameters are within acceptable limits. Regular monitoring continues.",
        None => "Regular monitoring of water quality parameters continues.",
    };

    let conservation = match last_two(&analytics.water_consumption) {
        Some((prev, last)) if last.total > prev.total * WATER_TREND_THRESHOLD => {
            "Water consumption is trending upward. Consider installing water-efficient fixtures and checking for leaks."
        }
        Some(_) => {
            "Maintain water conservation practices such as reusing greywater for gardens and limiting shower duration."
        }
        None => "Practice water conservation by fixing leaks and using water-efficient appliances.",
    };

    let seasonal = match analytics
        .seasonal_demand
        .iter()
        .rev()
        .find(|s| s.name.eq_ignore_ascii_case(season))
    {
        Some(s) if s.demand > s.supply * 0.8 => format!(
            "During {month}, water demand typically increases. Expect potential supply adjustments and store water for essential use."
        ),
        Some(_) => format!(
            "{month} typically has stable water supply conditions. Report any supply issues promptly."
        ),
        None => format!(
            "Regular water supply schedules expected for {month}. Check PCMC notifications for any changes."
        ),
    };

    WaterAdvisory {
        quality: quality.into(),
        conservation: conservation.into(),
        seasonal,
        actions: actions.to_vec(),
    }
}

pub fn energy_advisory(
    analytics: &EnergyAnalytics,
    actions: &[String],
    clock: &PortalClock,
) -> EnergyAdvisory {
    let month = clock.month_name();
    let season = clock.season().label();

    let consumption = match last_two(&analytics.energy_consumption) {
        Some((prev, last)) if last.total > prev.total * ENERGY_TREND_THRESHOLD => {
            "Energy consumption is trending upward. Consider energy audits and using energy-efficient appliances."
        }
        Some(_) => {
            "Maintain energy conservation practices such as turning off unused lights and appliances."
        }
        None => "Monitor your energy consumption by checking your meter regularly.",
    };

    let efficiency = match analytics.energy_efficiency.last() {
        Some(e) if e.losses > ENERGY_LOSS_THRESHOLD => {
            "Energy distribution losses are higher than optimal. Report any localized voltage issues to improve grid efficiency."
        }
        Some(_) => {
            "Grid efficiency is within normal parameters. Continue using energy during non-peak hours when possible."
        }
        None => "Use energy-efficient appliances and LED lighting to reduce consumption.",
    };

    let seasonal = match analytics
        .seasonal_demand
        .iter()
        .rev()
        .find(|s| s.name.eq_ignore_ascii_case(season) || s.name.eq_ignore_ascii_case(month))
    {
        Some(s) if s.demand > s.capacity * 0.9 => format!(
            "During {season}, energy demand typically peaks. Avoid using heavy appliances between 6-10 PM to prevent potential outages."
        ),
        Some(_) => format!(
            "{season} typically has stable energy supply conditions. Report any outages promptly."
        ),
        None => format!(
            "Regular energy supply expected for {season}. Check MSEDCL notifications for any maintenance schedules."
        ),
    };

    EnergyAdvisory {
        consumption: consumption.into(),
        efficiency: efficiency.into(),
        seasonal,
        actions: actions.to_vec(),
    }
}

fn last_two<T>(rows: &[T]) -> Option<(&T, &T)> {
    match rows {
        [.., prev, last] => Some((prev, last)),
        _ => None,
    }
}
