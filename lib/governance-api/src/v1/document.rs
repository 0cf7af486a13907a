use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::default_enabled;

/// Whether a rule applies to one service or to a whole application
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Rule bound to a single service interface
    Service,
    /// Rule bound to every service of an application
    Application,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Service => "service",
            Scope::Application => "application",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical condition route document as kept in the configuration store.
///
/// Access list entries live in `conditions` next to the ordinary routing
/// conditions; they are told apart by their `host` marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoutingRuleDocument {
    /// Rule identifier with `/` escaped to `*`
    pub key: String,

    /// Scope of the rule
    pub scope: Scope,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub force: bool,

    #[serde(default)]
    pub runtime: bool,

    #[serde(default)]
    pub priority: i32,

    /// Predicates in `when => then` form, order significant
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl RoutingRuleDocument {
    /// Create an empty, enabled document
    pub fn new(key: impl Into<String>, scope: Scope) -> Self {
        Self {
            key: key.into(),
            scope,
            enabled: true,
            force: false,
            runtime: false,
            priority: 0,
            conditions: Vec::new(),
        }
    }
}

/// A labeled provider subset
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Tag {
    /// Tag name carried by requests
    pub name: String,

    /// Provider addresses selected by this tag
    #[serde(default)]
    pub addresses: Vec<String>,
}

/// Canonical tag route document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TagRouteDocument {
    pub key: String,

    pub scope: Scope,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub force: bool,

    #[serde(default)]
    pub runtime: bool,

    #[serde(default)]
    pub priority: i32,

    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Scope::Service).unwrap(), "\"service\"");
        assert_eq!(serde_json::to_string(&Scope::Application).unwrap(), "\"application\"");
        assert_eq!(Scope::Application.to_string(), "application");
    }

    #[test]
    fn test_routing_document_field_names() {
        let mut document = RoutingRuleDocument::new("com.example.Foo::", Scope::Service);
        document.conditions = vec!["region=hangzhou => region=hangzhou".to_string()];

        let yaml = serde_yaml::to_string(&document).unwrap();
        assert!(yaml.contains("com.example.Foo::"));
        assert!(yaml.contains("scope: service"));
        assert!(yaml.contains("enabled: true"));
        assert!(yaml.contains("conditions:"));

        let parsed: RoutingRuleDocument = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, document);
    }

    #[test]
    fn test_routing_document_defaults() {
        let yaml = "key: shop\nscope: application\n";
        let document: RoutingRuleDocument = serde_yaml::from_str(yaml).unwrap();

        assert!(document.enabled);
        assert!(!document.force);
        assert_eq!(document.priority, 0);
        assert!(document.conditions.is_empty());
    }

    #[test]
    fn test_tag_route_document_parses_tags() {
        let yaml = r#"
key: shop
scope: application
enabled: false
tags:
  - name: gray
    addresses: ["10.0.0.1:20880", "10.0.0.2:20880"]
  - name: stable
"#;
        let document: TagRouteDocument = serde_yaml::from_str(yaml).unwrap();

        assert!(!document.enabled);
        assert_eq!(document.tags.len(), 2);
        assert_eq!(document.tags[0].addresses.len(), 2);
        assert!(document.tags[1].addresses.is_empty());
    }
}
