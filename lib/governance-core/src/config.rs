//! Governance configuration
//!
//! Loaded from a YAML file; every field has a default. Environment variables
//! override the file.

use crate::{GovernanceError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Path of the YAML configuration file
pub const CONFIG_PATH_ENV: &str = "GOVERNANCE_CONFIG";
/// Overrides `legacy.enabled`
pub const LEGACY_ENABLED_ENV: &str = "GOVERNANCE_LEGACY_ENABLED";
/// Overrides `logging.filter`
pub const LOG_FILTER_ENV: &str = "GOVERNANCE_LOG";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    pub legacy: LegacyConfig,
    pub logging: LoggingConfig,
}

/// Mirroring of service rules into the service registry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyConfig {
    /// Publish legacy entries at all
    pub enabled: bool,
    /// URL scheme of published entries
    pub protocol: String,
    /// Host part of published entries
    pub address: String,
}

impl Default for LegacyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            protocol: "route".to_string(),
            address: "0.0.0.0".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives
    pub filter: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl GovernanceConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)
            .map_err(|e| GovernanceError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            GovernanceError::InvalidConfiguration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&text)
    }

    /// Load the file named by `GOVERNANCE_CONFIG` (defaults when unset) and
    /// apply environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup(LEGACY_ENABLED_ENV) {
            self.legacy.enabled = value.trim().parse().map_err(|_| {
                GovernanceError::InvalidConfiguration(format!(
                    "{} must be true or false, got {:?}",
                    LEGACY_ENABLED_ENV, value
                ))
            })?;
        }
        if let Some(filter) = lookup(LOG_FILTER_ENV) {
            self.logging.filter = filter;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        let protocol = self.legacy.protocol.trim();
        if protocol.is_empty() || protocol.contains("://") {
            return Err(GovernanceError::InvalidConfiguration(format!(
                "legacy.protocol must be a bare scheme, got {:?}",
                self.legacy.protocol
            )));
        }
        if self.legacy.address.trim().is_empty() {
            return Err(GovernanceError::InvalidConfiguration(
                "legacy.address must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = GovernanceConfig::from_yaml("{}").unwrap();
        assert!(config.legacy.enabled);
        assert_eq!(config.legacy.protocol, "route");
        assert_eq!(config.legacy.address, "0.0.0.0");
        assert_eq!(config.logging.filter, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_partial_yaml() {
        let config = GovernanceConfig::from_yaml(
            "legacy:\n  enabled: false\nlogging:\n  json: true\n",
        )
        .unwrap();
        assert!(!config.legacy.enabled);
        assert_eq!(config.legacy.protocol, "route");
        assert!(config.logging.json);
    }

    #[test]
    fn test_rejects_bad_protocol() {
        let err = GovernanceConfig::from_yaml("legacy:\n  protocol: \"route://\"\n").unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_rejects_unparsable_yaml() {
        let err = GovernanceConfig::from_yaml("legacy: [").unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (LEGACY_ENABLED_ENV, "false"),
            (LOG_FILTER_ENV, "governance_core=debug"),
        ]);
        let mut config = GovernanceConfig::default();
        config
            .apply_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert!(!config.legacy.enabled);
        assert_eq!(config.logging.filter, "governance_core=debug");
    }

    #[test]
    fn test_env_override_rejects_non_bool() {
        let mut config = GovernanceConfig::default();
        let err = config
            .apply_overrides(|name| (name == LEGACY_ENABLED_ENV).then(|| "sometimes".to_string()))
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidConfiguration(_)));
    }
}
