//! Legacy mirroring of service scoped rules
//!
//! Older runtime clients only watch the service registry. For them every
//! routing condition of a service scoped document is published as its own
//! registry entry, and the access lists of the document as one combined
//! entry. Application scoped documents are never mirrored.

use crate::access_list;
use crate::backend::Registry;
use crate::config::LegacyConfig;
use crate::expression;
use crate::key::{unescape_key, ServiceRef};
use crate::metrics::SyncMetrics;
use crate::{GovernanceError, Result};
use governance_api::{RoutingRuleDocument, Scope};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Registry category of routing rules
pub const ROUTERS_CATEGORY: &str = "routers";
/// Marks entries mirrored from canonical documents
pub const COMPATIBLE_CONFIG: &str = "compatible-config";

/// A single legacy registry entry
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LegacyRule {
    pub service: ServiceRef,
    pub enabled: bool,
    pub force: bool,
    pub runtime: bool,
    pub priority: i32,
    /// Encoded `when => then` expression
    pub rule: String,
    /// Whether the entry carries `compatible-config=true`
    pub compatible: bool,
}

impl LegacyRule {
    /// Host exclusion rules are unregistered without `compatible-config`
    pub fn is_host_exclusion(&self) -> bool {
        self.rule.contains("host") && self.rule.contains("false")
    }
}

/// LegacySync derives legacy entries and keeps the registry in step with
/// canonical documents
#[derive(Clone)]
pub struct LegacySync {
    registry: Arc<dyn Registry>,
    settings: LegacyConfig,
    metrics: SyncMetrics,
}

impl LegacySync {
    pub fn new(registry: Arc<dyn Registry>, settings: LegacyConfig, metrics: SyncMetrics) -> Self {
        Self {
            registry,
            settings,
            metrics,
        }
    }

    /// One entry per routing condition of a service scoped document, in
    /// document order. Duplicate conditions give duplicate entries.
    pub fn derive(&self, document: &RoutingRuleDocument) -> Vec<LegacyRule> {
        if document.scope != Scope::Service {
            return Vec::new();
        }
        let service = ServiceRef::from_id(&unescape_key(&document.key));
        let (_, routing) = access_list::extract(&document.conditions);

        routing
            .iter()
            .map(|condition| LegacyRule {
                service: service.clone(),
                enabled: document.enabled,
                force: document.force,
                runtime: document.runtime,
                priority: document.priority,
                rule: expression::normalize(condition),
                compatible: true,
            })
            .collect()
    }

    /// The combined access list entry of a service scoped document
    pub fn derive_access(&self, document: &RoutingRuleDocument) -> Option<LegacyRule> {
        if document.scope != Scope::Service {
            return None;
        }
        let (entries, _) = access_list::extract(&document.conditions);
        if entries.is_empty() {
            return None;
        }
        let (blacklist, whitelist) = access_list::to_lists(&entries);
        Some(LegacyRule {
            service: ServiceRef::from_id(&unescape_key(&document.key)),
            enabled: true,
            force: true,
            runtime: false,
            priority: 0,
            rule: access_list::to_expression(&blacklist, &whitelist),
            compatible: false,
        })
    }

    /// Registry URL of an entry as published
    pub fn publication_url(&self, rule: &LegacyRule) -> Result<Url> {
        self.entry_url(rule, rule.compatible)
    }

    /// Registry URL used to retract an entry. Host exclusion rules leave out
    /// `compatible-config` even when they were published with it.
    pub fn retraction_url(&self, rule: &LegacyRule) -> Result<Url> {
        let compatible = rule.compatible && !rule.is_host_exclusion();
        if rule.compatible && !compatible {
            warn!(
                "Retracting host exclusion rule for {} without {}",
                rule.service.interface, COMPATIBLE_CONFIG
            );
        }
        self.entry_url(rule, compatible)
    }

    fn entry_url(&self, rule: &LegacyRule, compatible: bool) -> Result<Url> {
        let base = format!(
            "{}://{}/{}",
            self.settings.protocol, self.settings.address, rule.service.interface
        );
        let mut url = Url::parse(&base).map_err(|e| {
            GovernanceError::InvalidRequest(format!("cannot build registry entry {}: {}", base, e))
        })?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("category", ROUTERS_CATEGORY)
                .append_pair("router", "condition")
                .append_pair("enabled", bool_str(rule.enabled))
                .append_pair("force", bool_str(rule.force))
                .append_pair("runtime", bool_str(rule.runtime))
                .append_pair("priority", &rule.priority.to_string())
                .append_pair("dynamic", "false")
                .append_pair("rule", &rule.rule);
            if let Some(group) = &rule.service.group {
                query.append_pair("group", group);
            }
            if let Some(version) = &rule.service.version {
                query.append_pair("version", version);
            }
            if compatible {
                query.append_pair(COMPATIBLE_CONFIG, "true");
            }
        }
        Ok(url)
    }

    pub async fn publish(&self, rule: &LegacyRule) -> Result<()> {
        let url = self.publication_url(rule)?;
        self.metrics.registry_call("register");
        self.registry
            .register(&url)
            .await
            .map_err(GovernanceError::Registry)?;
        debug!("Published legacy rule {}", url);
        Ok(())
    }

    pub async fn retract(&self, rule: &LegacyRule) -> Result<()> {
        let url = self.retraction_url(rule)?;
        self.metrics.registry_call("unregister");
        self.registry
            .unregister(&url)
            .await
            .map_err(GovernanceError::Registry)?;
        debug!("Retracted legacy rule {}", url);
        Ok(())
    }

    /// Move the registry from the `before` entries to the `after` entries.
    ///
    /// Entries present in both are left alone; the others are retracted
    /// first, then published. Each call is independent, so a failure leaves
    /// the registry partly updated.
    pub async fn reconcile(&self, before: &[LegacyRule], after: &[LegacyRule]) -> Result<()> {
        if !self.settings.enabled {
            debug!("Legacy mirroring disabled, skipping registry update");
            return Ok(());
        }
        for rule in before.iter().filter(|rule| !after.contains(rule)) {
            self.retract(rule).await?;
        }
        for rule in after.iter().filter(|rule| !before.contains(rule)) {
            self.publish(rule).await?;
        }
        Ok(())
    }

    /// Retract every `before` entry, then publish every `after` entry.
    ///
    /// Unlike [`LegacySync::reconcile`] nothing is skipped, so repeating the
    /// call republishes entries a failed earlier call never registered.
    pub async fn replace(&self, before: &[LegacyRule], after: &[LegacyRule]) -> Result<()> {
        if !self.settings.enabled {
            debug!("Legacy mirroring disabled, skipping registry update");
            return Ok(());
        }
        for rule in before {
            self.retract(rule).await?;
        }
        for rule in after {
            self.publish(rule).await?;
        }
        Ok(())
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
