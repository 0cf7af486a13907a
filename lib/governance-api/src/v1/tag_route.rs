use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{default_enabled, Tag, TargetRef};

/// TagRouteRequest replaces the tag routing of a service or application
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagRouteRequest {
    #[serde(flatten)]
    pub target: TargetRef,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub force: bool,

    #[serde(default)]
    pub runtime: bool,

    #[serde(default)]
    pub priority: i32,
}

impl TagRouteRequest {
    pub fn new(target: TargetRef, tags: Vec<Tag>) -> Self {
        Self {
            target,
            tags,
            enabled: true,
            ..Default::default()
        }
    }
}

/// A stored tag route as shown to API callers
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagRouteResponse {
    pub id: String,

    #[serde(flatten)]
    pub target: TargetRef,

    pub tags: Vec<Tag>,

    pub enabled: bool,

    pub force: bool,

    pub runtime: bool,

    pub priority: i32,
}
