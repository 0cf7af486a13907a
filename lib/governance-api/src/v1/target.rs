use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What a rule applies to, as submitted by API callers.
///
/// Exactly one of `service` and `application` is expected to be set;
/// the version and group only qualify a service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TargetRef {
    /// Service interface name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_group: Option<String>,

    /// Application name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
}

impl TargetRef {
    /// Target a single service interface
    pub fn service(interface: impl Into<String>) -> Self {
        Self {
            service: Some(interface.into()),
            ..Default::default()
        }
    }

    /// Target every service of an application
    pub fn application(name: impl Into<String>) -> Self {
        Self {
            application: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.service_group = Some(group.into());
        self
    }
}
