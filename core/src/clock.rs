//! Portal clock: the single source of "now" for advisories and timestamps.
//!
//! RULE: PortalClock is the only place in core that reads wall time, and
//! only in `System` mode. Callers hand the engine a PortalClock; tests pin
//! it with `Fixed`.

use chrono::{Datelike, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", content = "at", rename_all = "snake_case")]
pub enum PortalClock {
    System,
    Fixed(NaiveDateTime),
}

impl PortalClock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Self::System => Local::now().naive_local(),
            Self::Fixed(at) => *at,
        }
    }

    /// Full English month name of "now", e.g. `April`.
    pub fn month_name(&self) -> &'static str {
        month_name(self.now().month())
    }

    pub fn season(&self) -> Season {
        Season::of_month(self.now().month())
    }
}

impl Default for PortalClock {
    fn default() -> Self {
        Self::System
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Season {
    Winter,
    Summer,
    Monsoon,
    Autumn,
}

impl Season {
    /// Local climate calendar: Dec-Feb winter, Mar-May summer,
    /// Jun-Sep monsoon, Oct-Nov autumn.
    pub fn of_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Self::Winter,
            3..=5      => Self::Summer,
            6..=9      => Self::Monsoon,
            _          => Self::Autumn,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Winter  => "Winter",
            Self::Summer  => "Summer",
            Self::Monsoon => "Monsoon",
            Self::Autumn  => "Autumn",
        }
    }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1  => "January",
        2  => "February",
        3  => "March",
        4  => "April",
        5  => "May",
        6  => "June",
        7  => "July",
        8  => "August",
        9  => "September",
        10 => "October",
        11 => "November",
        _  => "December",
    }
}
