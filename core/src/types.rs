//! Shared primitive types used across the analytics core.

/// Identifier of a citizen-filed complaint, as supplied by the caller.
pub type ComplaintId = String;

/// Calendar month key in `YYYY-MM` form.
pub type MonthKey = String;

/// Hour of the day, 0..=23.
pub type Hour = u32;
