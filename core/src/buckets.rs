//! Fixed bucket schemes for duration and time-of-day distributions.
//!
//! All intervals are half-open `[lower, upper)`; an unbounded upper edge
//! catches everything at or above `lower`.

use crate::types::Hour;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub label: &'static str,
    pub lower: f64,
    pub upper: Option<f64>,
}

impl Bucket {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && self.upper.is_none_or(|upper| value < upper)
    }
}

/// Resolution response-time buckets, in hours. Five-bucket scheme.
pub const RESPONSE_TIME_BUCKETS: [Bucket; 5] = [
    Bucket { label: "< 6 hours", lower: 0.0, upper: Some(6.0) },
    Bucket { label: "< 12 hours", lower: 6.0, upper: Some(12.0) },
    Bucket { label: "12-24 hours", lower: 12.0, upper: Some(24.0) },
    Bucket { label: "24-48 hours", lower: 24.0, upper: Some(48.0) },
    Bucket { label: "> 48 hours", lower: 48.0, upper: None },
];

/// Filing time-of-day quadrants. Night does not wrap past midnight.
pub const TIME_OF_DAY_BUCKETS: [Bucket; 4] = [
    Bucket { label: "Night (0-6)", lower: 0.0, upper: Some(6.0) },
    Bucket { label: "Morning (6-12)", lower: 6.0, upper: Some(12.0) },
    Bucket { label: "Afternoon (12-18)", lower: 12.0, upper: Some(18.0) },
    Bucket { label: "Evening (18-24)", lower: 18.0, upper: Some(24.0) },
];

/// Index of the response-time bucket holding `hours`, if any.
pub fn response_bucket(hours: f64) -> Option<usize> {
    RESPONSE_TIME_BUCKETS.iter().position(|b| b.contains(hours))
}

pub fn time_of_day_bucket(hour: Hour) -> Option<usize> {
    TIME_OF_DAY_BUCKETS
        .iter()
        .position(|b| b.contains(f64::from(hour)))
}
