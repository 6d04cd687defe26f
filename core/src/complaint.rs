//! Complaint records: the typed view of what citizens file.
//!
//! Records arrive as loosely-typed JSON objects. Decoding never rejects a
//! record for a bad field: the field becomes `None` and the aggregator drops
//! the record from whichever tables need it. Only a collection that is not
//! an array of objects is an error.

use crate::{
    error::{AnalyticsError, AnalyticsResult},
    types::{ComplaintId, Hour, MonthKey},
};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

// ── Category ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Water,
    Energy,
    /// Any other label, kept verbatim so it still shows up in counts.
    Other(String),
}

impl Category {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "water"  => Self::Water,
            "energy" => Self::Energy,
            _        => Self::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Water        => "water",
            Self::Energy       => "energy",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ── Priority ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
    Other(String),
}

impl Priority {
    /// Canonical display order for dashboards.
    pub const CANONICAL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "high"   => Self::High,
            "medium" => Self::Medium,
            "low"    => Self::Low,
            _        => Self::Other(trimmed.to_string()),
        }
    }

    /// Normalize a free-text reply from the priority classifier.
    ///
    /// An exact `low`/`medium`/`high` wins; otherwise the first of "low",
    /// then "high" found in the text; anything else is medium.
    pub fn from_model_reply(reply: &str) -> Self {
        let text = reply.trim().to_ascii_lowercase();
        match text.as_str() {
            "low"    => Self::Low,
            "medium" => Self::Medium,
            "high"   => Self::High,
            _ if text.contains("low") => Self::Low,
            _ if text.contains("high") => Self::High,
            _ => Self::Medium,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::High         => "high",
            Self::Medium       => "medium",
            Self::Low          => "low",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ── Record ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplaintRecord {
    pub id:          Option<ComplaintId>,
    pub category:    Option<Category>,
    pub priority:    Option<Priority>,
    pub created_at:  Option<DateTime<FixedOffset>>,
    /// Present only for resolved complaints.
    pub resolved_at: Option<DateTime<FixedOffset>>,
}

impl ComplaintRecord {
    /// Decode one record. Fails only when `value` is not a JSON object.
    pub fn from_json(value: &Value) -> AnalyticsResult<Self> {
        let obj = value.as_object().ok_or_else(|| AnalyticsError::MalformedInput {
            reason: format!("complaint must be an object, got {}", json_kind(value)),
        })?;

        let id = match obj.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        Ok(Self {
            id,
            category: text_field(obj, "category").map(Category::parse),
            priority: text_field(obj, "priority").map(Priority::parse),
            created_at: text_field(obj, "date").and_then(parse_timestamp),
            resolved_at: text_field(obj, "resolved_date").and_then(parse_timestamp),
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }

    /// Elapsed time from filing to resolution.
    /// `None` when either end is missing or resolution precedes filing.
    pub fn resolution_duration(&self) -> Option<Duration> {
        let elapsed = self.resolved_at? - self.created_at?;
        (elapsed >= Duration::zero()).then_some(elapsed)
    }

    pub fn resolution_hours(&self) -> Option<f64> {
        self.resolution_duration()
            .map(|d| d.num_milliseconds() as f64 / 3_600_000.0)
    }

    pub fn resolution_days(&self) -> Option<f64> {
        self.resolution_hours().map(|h| h / 24.0)
    }

    /// `YYYY-MM` of the filing time as written.
    pub fn month_key(&self) -> Option<MonthKey> {
        self.created_at.map(|dt| dt.format("%Y-%m").to_string())
    }

    pub fn hour_of_day(&self) -> Option<Hour> {
        self.created_at.map(|dt| dt.hour())
    }
}

/// Decode a complaint collection. The collection must be an array of
/// objects; individual fields are validated lazily by the aggregator.
pub fn decode_complaints(value: &Value) -> AnalyticsResult<Vec<ComplaintRecord>> {
    let items = value.as_array().ok_or_else(|| AnalyticsError::MalformedInput {
        reason: format!("complaints must be an array, got {}", json_kind(value)),
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            ComplaintRecord::from_json(item).map_err(|e| AnalyticsError::MalformedInput {
                reason: format!("complaint #{i}: {e}"),
            })
        })
        .collect()
}

// ── Timestamps ───────────────────────────────────────────────────────────────

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a filing/resolution timestamp.
///
/// Accepts RFC 3339, naive date-times (taken as UTC), date-times with a
/// short `+HH` offset, and bare `YYYY-MM-DD` dates (midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

fn text_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_)  => "an array",
        Value::Object(_) => "an object",
    }
}
