use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{default_enabled, TargetRef};

/// ConditionRouteRequest creates or updates the routing conditions of a
/// service or application
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRouteRequest {
    /// Service or application the route applies to
    #[serde(flatten)]
    pub target: TargetRef,

    /// Predicates in `<consumer> => <provider>` form
    #[serde(default)]
    pub conditions: Vec<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Keep routing even when no provider matches
    #[serde(default)]
    pub force: bool,

    /// Evaluate the route on every invocation
    #[serde(default)]
    pub runtime: bool,

    #[serde(default)]
    pub priority: i32,
}

impl ConditionRouteRequest {
    /// Create an enabled request with default flags
    pub fn new(target: TargetRef, conditions: Vec<String>) -> Self {
        Self {
            target,
            conditions,
            enabled: true,
            ..Default::default()
        }
    }
}

/// A stored condition route as shown to API callers
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRouteResponse {
    /// Rule identifier used by delete/enable/disable/find
    pub id: String,

    #[serde(flatten)]
    pub target: TargetRef,

    /// Ordinary routing conditions; access list entries are not included
    pub conditions: Vec<String>,

    pub enabled: bool,

    pub force: bool,

    pub runtime: bool,

    pub priority: i32,
}
