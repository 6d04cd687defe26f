//! Caller identity classes and the working-set filter they imply.

use crate::complaint::{Category, ComplaintRecord};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    #[default]
    Citizen,
    WaterAdmin,
    EnergyAdmin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Citizen     => "citizen",
            Self::WaterAdmin  => "water-admin",
            Self::EnergyAdmin => "energy-admin",
            Self::SuperAdmin  => "super-admin",
        }
    }

    /// Parse a role, treating anything unrecognised as a citizen.
    pub fn from_str_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            log::warn!("unknown role '{raw}', falling back to citizen view");
            Self::Citizen
        })
    }

    /// The category an admin role is scoped to, if any.
    pub fn scope(&self) -> Option<Category> {
        match self {
            Self::WaterAdmin                 => Some(Category::Water),
            Self::EnergyAdmin                => Some(Category::Energy),
            Self::Citizen | Self::SuperAdmin => None,
        }
    }

    /// Whether a record belongs to this role's working set.
    pub fn admits(&self, record: &ComplaintRecord) -> bool {
        match self.scope() {
            Some(scope) => record.category.as_ref() == Some(&scope),
            None => true,
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "citizen"      => Ok(Self::Citizen),
            "water-admin"  => Ok(Self::WaterAdmin),
            "energy-admin" => Ok(Self::EnergyAdmin),
            "super-admin"  => Ok(Self::SuperAdmin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}
