//! Complaint aggregator: raw complaint records in, dashboard tables out.
//!
//! Every table is computed independently from the role-filtered working
//! set. A record missing a field a table needs is dropped from that table
//! only. Nothing here fails once the input has been decoded.
//!
//! Tables:
//!   1. Category distribution (count desc, ties by first encounter)
//!   2. Priority distribution (high, medium, low always present)
//!   3. Monthly trend (ascending `YYYY-MM`, water/energy/total)
//!   4. Mean resolution days by category
//!   5. Response-time distribution (percent per fixed bucket)
//!   6. Filing time-of-day distribution (counts, zero buckets omitted)

use crate::{
    buckets::{response_bucket, time_of_day_bucket, RESPONSE_TIME_BUCKETS, TIME_OF_DAY_BUCKETS},
    complaint::{decode_complaints, Category, ComplaintRecord, Priority},
    error::AnalyticsResult,
    role::Role,
    types::MonthKey,
    util::{mean, round_to},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

// ── Public types ─────────────────────────────────────────────────────────────

/// A `{name, value}` row with a measured value (mean, percentage, share).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name:  String,
    pub value: f64,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self { name: name.into(), value }
    }
}

/// A `{name, value}` row holding a record count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    pub name:  String,
    pub value: u64,
}

impl CountRow {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self { name: name.into(), value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendRow {
    /// Month in `YYYY-MM` form.
    pub date:   MonthKey,
    pub water:  u64,
    pub energy: u64,
    pub total:  u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTables {
    pub category_data:      Vec<CountRow>,
    pub priority_data:      Vec<CountRow>,
    pub trends_data:        Vec<TrendRow>,
    pub resolution_data:    Vec<NamedValue>,
    pub response_rate_data: Vec<NamedValue>,
    pub time_of_day_data:   Vec<CountRow>,
}

// ── Entry points ─────────────────────────────────────────────────────────────

/// Build every summary table for `role` from an already-decoded collection.
pub fn aggregate(complaints: &[ComplaintRecord], role: Role) -> SummaryTables {
    let working: Vec<&ComplaintRecord> = complaints.iter().filter(|c| role.admits(c)).collect();

    log::debug!(
        "aggregating {} of {} complaints for role {}",
        working.len(),
        complaints.len(),
        role.as_str()
    );

    SummaryTables {
        category_data: category_distribution(&working),
        priority_data: priority_distribution(&working),
        trends_data: monthly_trend(&working),
        resolution_data: resolution_time_by_category(&working),
        response_rate_data: response_time_distribution(&working),
        time_of_day_data: time_of_day_distribution(&working),
    }
}

/// Decode a JSON collection and aggregate it. Fails only when the value is
/// not an array of objects.
pub fn aggregate_value(complaints: &Value, role: Role) -> AnalyticsResult<SummaryTables> {
    let records = decode_complaints(complaints)?;
    Ok(aggregate(&records, role))
}

// ── Tables ───────────────────────────────────────────────────────────────────

pub fn category_distribution(records: &[&ComplaintRecord]) -> Vec<CountRow> {
    let mut groups: LabelGroups<'_, Category, u64> = LabelGroups::new();
    for &record in records {
        let Some(category) = record.category.as_ref() else {
            log::debug!("complaint {:?}: no category, skipped in category table", record.id);
            continue;
        };
        *groups.entry(category) += 1;
    }
    let mut counts = groups.into_rows();
    // Stable sort keeps first-encounter order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(category, n)| CountRow::new(category.as_str(), n))
        .collect()
}

pub fn priority_distribution(records: &[&ComplaintRecord]) -> Vec<CountRow> {
    let mut groups: LabelGroups<'_, Priority, u64> = LabelGroups::new();
    for priority in &CANONICAL_PRIORITIES {
        groups.entry(priority);
    }
    for &record in records {
        if let Some(priority) = record.priority.as_ref() {
            *groups.entry(priority) += 1;
        }
    }
    groups
        .into_rows()
        .into_iter()
        .map(|(priority, n)| CountRow::new(priority.as_str(), n))
        .collect()
}

pub fn monthly_trend(records: &[&ComplaintRecord]) -> Vec<TrendRow> {
    // `YYYY-MM` keys sort chronologically for four-digit years.
    let mut months: BTreeMap<MonthKey, (u64, u64)> = BTreeMap::new();
    for record in records {
        let (Some(month), Some(category)) = (record.month_key(), record.category.as_ref()) else {
            log::debug!("complaint {:?}: no date or category, skipped in trend", record.id);
            continue;
        };
        let entry = months.entry(month).or_default();
        match category {
            Category::Water => entry.0 += 1,
            Category::Energy => entry.1 += 1,
            Category::Other(_) => {}
        }
    }
    months
        .into_iter()
        .map(|(date, (water, energy))| TrendRow {
            date,
            water,
            energy,
            total: water + energy,
        })
        .collect()
}

pub fn resolution_time_by_category(records: &[&ComplaintRecord]) -> Vec<NamedValue> {
    let mut groups: LabelGroups<'_, Category, Vec<f64>> = LabelGroups::new();
    for &record in records {
        let (Some(category), Some(days)) = (record.category.as_ref(), record.resolution_days())
        else {
            if record.is_resolved() && record.resolution_duration().is_none() {
                log::debug!("complaint {:?}: invalid resolution interval", record.id);
            }
            continue;
        };
        groups.entry(category).push(days);
    }
    groups
        .into_rows()
        .into_iter()
        .map(|(category, days)| NamedValue::new(category.as_str(), round_to(mean(&days), 1)))
        .collect()
}

pub fn response_time_distribution(records: &[&ComplaintRecord]) -> Vec<NamedValue> {
    let mut counts = [0u64; RESPONSE_TIME_BUCKETS.len()];
    for hours in records.iter().filter_map(|r| r.resolution_hours()) {
        if let Some(idx) = response_bucket(hours) {
            counts[idx] += 1;
        }
    }
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return Vec::new();
    }
    RESPONSE_TIME_BUCKETS
        .iter()
        .zip(counts)
        .map(|(bucket, n)| NamedValue::new(bucket.label, round_to(n as f64 / total as f64 * 100.0, 1)))
        .collect()
}

pub fn time_of_day_distribution(records: &[&ComplaintRecord]) -> Vec<CountRow> {
    let mut counts = [0u64; TIME_OF_DAY_BUCKETS.len()];
    for hour in records.iter().filter_map(|r| r.hour_of_day()) {
        if let Some(idx) = time_of_day_bucket(hour) {
            counts[idx] += 1;
        }
    }
    TIME_OF_DAY_BUCKETS
        .iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .map(|(bucket, n)| CountRow::new(bucket.label, n))
        .collect()
}

// ── Grouping ─────────────────────────────────────────────────────────────────

static CANONICAL_PRIORITIES: [Priority; 3] = Priority::CANONICAL;

/// Per-label accumulators in first-insertion order.
/// Label sets are caller-controlled, so lookup goes through a hashed index.
struct LabelGroups<'a, K, A> {
    index: HashMap<&'a K, usize>,
    rows:  Vec<(&'a K, A)>,
}

impl<'a, K: Eq + Hash, A: Default> LabelGroups<'a, K, A> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            rows:  Vec::new(),
        }
    }

    fn entry(&mut self, key: &'a K) -> &mut A {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.rows.push((key, A::default()));
                let idx = self.rows.len() - 1;
                self.index.insert(key, idx);
                idx
            }
        };
        &mut self.rows[idx].1
    }

    fn into_rows(self) -> Vec<(&'a K, A)> {
        self.rows
    }
}
