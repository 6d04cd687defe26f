use crate::{
    error::{AnalyticsError, AnalyticsResult},
    role::Role,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a dashboard analytics request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRequest {
    /// Raw complaint collection; validated by the aggregator.
    #[serde(default)]
    pub complaints: Value,
    #[serde(default = "default_role")]
    pub user_role:  String,
    /// Accepted for dashboard compatibility; does not change the output.
    #[serde(default = "default_view_type")]
    pub view_type:  String,
}

impl AnalyticsRequest {
    pub fn new(complaints: Value, role: Role) -> Self {
        Self {
            complaints,
            user_role: role.as_str().into(),
            view_type: default_view_type(),
        }
    }

    pub fn role(&self) -> Role {
        Role::from_str_lenient(&self.user_role)
    }

    /// Null or an empty array means "no complaint data supplied".
    /// Anything else is handed to the aggregator, which rejects non-arrays.
    pub fn has_complaints(&self) -> bool {
        match &self.complaints {
            Value::Null         => false,
            Value::Array(items) => !items.is_empty(),
            _                   => true,
        }
    }
}

impl Default for AnalyticsRequest {
    fn default() -> Self {
        Self::new(Value::Null, Role::Citizen)
    }
}

fn default_role() -> String {
    Role::Citizen.as_str().into()
}

fn default_view_type() -> String {
    "overview".into()
}

/// Body of a single-resource lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequest {
    #[serde(default)]
    pub resource_type: String,
    /// Re-read the consumption files before answering.
    #[serde(default)]
    pub force_refresh: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Water,
    Energy,
}

impl ResourceRequest {
    pub fn kind(&self) -> AnalyticsResult<ResourceKind> {
        match self.resource_type.trim() {
            "" => Err(AnalyticsError::MissingField {
                field: "resourceType".into(),
            }),
            "water" => Ok(ResourceKind::Water),
            "energy" => Ok(ResourceKind::Energy),
            other => Err(AnalyticsError::UnknownResource {
                resource: other.into(),
            }),
        }
    }
}
