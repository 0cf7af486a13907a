use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::TargetRef;

/// AccessRequest sets the caller address allow/deny lists of a service
/// or application
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    #[serde(flatten)]
    pub target: TargetRef,

    /// Addresses denied access
    #[serde(default)]
    pub blacklist: Vec<String>,

    /// Addresses allowed access; everyone else is denied
    #[serde(default)]
    pub whitelist: Vec<String>,
}

impl AccessRequest {
    pub fn new(target: TargetRef) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    pub fn with_blacklist(mut self, addresses: Vec<String>) -> Self {
        self.blacklist = addresses;
        self
    }

    pub fn with_whitelist(mut self, addresses: Vec<String>) -> Self {
        self.whitelist = addresses;
        self
    }
}

/// Access lists currently stored for a rule identifier
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessResponse {
    pub id: String,

    #[serde(flatten)]
    pub target: TargetRef,

    pub blacklist: Vec<String>,

    pub whitelist: Vec<String>,

    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_request_from_json() {
        let request: AccessRequest = serde_json::from_str(
            r#"{"service":"com.example.Foo","serviceGroup":"g1","blacklist":["192.168.1.1"]}"#,
        )
        .unwrap();

        assert_eq!(
            request,
            AccessRequest::new(TargetRef::service("com.example.Foo").with_group("g1"))
                .with_blacklist(vec!["192.168.1.1".to_string()])
        );
        assert!(request.whitelist.is_empty());
    }

    #[test]
    fn test_access_request_has_no_enabled_flag() {
        let value = serde_json::to_value(AccessRequest::new(TargetRef::application("shop"))).unwrap();
        assert!(value.get("enabled").is_none());
        assert_eq!(value["application"], "shop");
    }
}
