//! Condition route management
//!
//! Every mutation is a read-modify-write of the canonical document followed
//! by a reconciliation of its legacy registry entries. The two steps are not
//! atomic: a registry failure after a successful write leaves them diverged.

use crate::access_list;
use crate::key::{resolve_path, RuleKind, RuleTarget};
use crate::legacy::LegacySync;
use crate::metrics::SyncMetrics;
use crate::store::RuleStore;
use crate::{GovernanceError, Result};
use governance_api::{ConditionRouteRequest, ConditionRouteResponse, RoutingRuleDocument};
use tracing::info;

const KIND: &str = "condition_route";

/// ConditionRouteManager implements create/update/delete/enable/disable/find
/// for condition routes
#[derive(Clone)]
pub struct ConditionRouteManager {
    store: RuleStore,
    legacy: LegacySync,
    metrics: SyncMetrics,
}

impl ConditionRouteManager {
    pub fn new(store: RuleStore, legacy: LegacySync, metrics: SyncMetrics) -> Self {
        Self {
            store,
            legacy,
            metrics,
        }
    }

    /// Append the request's conditions to the route, creating it if needed
    pub async fn create(&self, request: &ConditionRouteRequest) -> Result<()> {
        let target = RuleTarget::from_ref(&request.target)?;
        let path = target.path(RuleKind::ConditionRoute)?;

        let existing = self.store.load_routing(&path).await?;
        let before = existing
            .as_ref()
            .map(|document| self.legacy.derive(document))
            .unwrap_or_default();

        let mut document = existing
            .unwrap_or_else(|| RoutingRuleDocument::new(target.key(), target.scope()));
        document.conditions.extend(request.conditions.iter().cloned());
        apply_flags(&mut document, request);

        self.store.save_routing(&path, &document).await?;
        self.legacy
            .reconcile(&before, &self.legacy.derive(&document))
            .await?;

        self.metrics.rule_operation(KIND, "create");
        info!(
            "Created condition route {} ({} conditions)",
            target.id(),
            request.conditions.len()
        );
        Ok(())
    }

    /// Replace the routing conditions of an existing route. Access list
    /// entries sharing the document keep their place.
    pub async fn update(&self, request: &ConditionRouteRequest) -> Result<()> {
        let target = RuleTarget::from_ref(&request.target)?;
        let id = target.id();
        let path = target.path(RuleKind::ConditionRoute)?;

        let mut document = self.load_existing(&id, &path).await?;
        let before = self.legacy.derive(&document);

        document.conditions =
            access_list::replace_routing(&document.conditions, request.conditions.clone());
        apply_flags(&mut document, request);

        self.store.save_routing(&path, &document).await?;
        self.legacy
            .replace(&before, &self.legacy.derive(&document))
            .await?;

        self.metrics.rule_operation(KIND, "update");
        info!("Updated condition route {}", id);
        Ok(())
    }

    /// Remove the whole document, including access list entries, after
    /// retracting everything it published
    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = resolve_path(id, RuleKind::ConditionRoute)?;
        let document = self.load_existing(id, &path).await?;

        let mut published = self.legacy.derive(&document);
        published.extend(self.legacy.derive_access(&document));
        self.legacy.replace(&published, &[]).await?;

        self.store.remove(&path).await?;

        self.metrics.rule_operation(KIND, "delete");
        info!("Deleted condition route {}", id);
        Ok(())
    }

    pub async fn enable(&self, id: &str) -> Result<()> {
        self.set_enabled(id, true).await
    }

    pub async fn disable(&self, id: &str) -> Result<()> {
        self.set_enabled(id, false).await
    }

    async fn set_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        let path = resolve_path(id, RuleKind::ConditionRoute)?;
        let mut document = self.load_existing(id, &path).await?;
        let before = self.legacy.derive(&document);

        document.enabled = enabled;
        self.store.save_routing(&path, &document).await?;
        self.legacy
            .replace(&before, &self.legacy.derive(&document))
            .await?;

        let op = if enabled { "enable" } else { "disable" };
        self.metrics.rule_operation(KIND, op);
        info!("Condition route {} enabled={}", id, enabled);
        Ok(())
    }

    /// Find a route by identifier. A document without routing conditions
    /// counts as no route.
    pub async fn find(&self, id: &str) -> Result<Option<ConditionRouteResponse>> {
        let path = resolve_path(id, RuleKind::ConditionRoute)?;
        let Some(document) = self.store.load_routing(&path).await? else {
            return Ok(None);
        };

        let (_, conditions) = access_list::extract(&document.conditions);
        if conditions.is_empty() {
            return Ok(None);
        }

        Ok(Some(ConditionRouteResponse {
            id: id.to_string(),
            target: RuleTarget::from_id(id, document.scope).to_ref(),
            conditions,
            enabled: document.enabled,
            force: document.force,
            runtime: document.runtime,
            priority: document.priority,
        }))
    }

    /// Find the route a request refers to
    pub async fn find_for(&self, request: &ConditionRouteRequest) -> Result<Option<ConditionRouteResponse>> {
        let target = RuleTarget::from_ref(&request.target)?;
        self.find(&target.id()).await
    }

    async fn load_existing(&self, id: &str, path: &str) -> Result<RoutingRuleDocument> {
        self.store
            .load_routing(path)
            .await?
            .ok_or_else(|| GovernanceError::NotFound(format!("condition route {}", id)))
    }
}

fn apply_flags(document: &mut RoutingRuleDocument, request: &ConditionRouteRequest) {
    document.enabled = request.enabled;
    document.force = request.force;
    document.runtime = request.runtime;
    document.priority = request.priority;
}
