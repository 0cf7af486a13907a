//! Access list management
//!
//! Access lists are stored as `host` entries inside the condition route
//! document of the same identifier. Service scoped lists are mirrored to the
//! registry as one combined entry.

use crate::access_list;
use crate::key::{resolve_path, RuleKind, RuleTarget};
use crate::legacy::{LegacyRule, LegacySync};
use crate::metrics::SyncMetrics;
use crate::store::RuleStore;
use crate::{GovernanceError, Result};
use governance_api::{AccessRequest, AccessResponse, RoutingRuleDocument};
use tracing::{info, warn};

const KIND: &str = "access";

#[derive(Clone)]
pub struct AccessManager {
    store: RuleStore,
    legacy: LegacySync,
    metrics: SyncMetrics,
}

impl AccessManager {
    pub fn new(store: RuleStore, legacy: LegacySync, metrics: SyncMetrics) -> Self {
        Self {
            store,
            legacy,
            metrics,
        }
    }

    /// Add the request's lists to the document, creating it if needed.
    /// Routing conditions already in the document are left untouched.
    pub async fn create(&self, request: &AccessRequest) -> Result<()> {
        let target = RuleTarget::from_ref(&request.target)?;
        let path = target.path(RuleKind::ConditionRoute)?;
        let entries = access_list::to_entries(request);
        if entries.is_empty() {
            return Err(GovernanceError::InvalidRequest(
                "blacklist and whitelist must not both be empty".to_string(),
            ));
        }

        let existing = self.store.load_routing(&path).await?;
        let before = existing
            .as_ref()
            .and_then(|document| self.legacy.derive_access(document));

        let document = match existing {
            Some(mut document) => {
                let (mut access, _) = access_list::extract(&document.conditions);
                access.extend(entries);
                document.conditions = access_list::inject(&document.conditions, access);
                document
            }
            None => {
                let mut document = RoutingRuleDocument::new(target.key(), target.scope());
                document.conditions = entries;
                document
            }
        };

        self.store.save_routing(&path, &document).await?;
        self.reconcile(before, self.legacy.derive_access(&document))
            .await?;

        self.metrics.rule_operation(KIND, "create");
        info!("Created access lists for {}", target.id());
        Ok(())
    }

    /// Replace the access lists of an existing document.
    ///
    /// Unlike condition route updates, a missing document is not an error:
    /// the call does nothing.
    pub async fn update(&self, request: &AccessRequest) -> Result<()> {
        let target = RuleTarget::from_ref(&request.target)?;
        let path = target.path(RuleKind::ConditionRoute)?;

        let Some(mut document) = self.store.load_routing(&path).await? else {
            warn!("No rule document for {}, access update ignored", target.id());
            return Ok(());
        };
        let before = self.legacy.derive_access(&document);

        document.conditions =
            access_list::inject(&document.conditions, access_list::to_entries(request));

        self.store.save_routing(&path, &document).await?;
        self.reconcile(before, self.legacy.derive_access(&document))
            .await?;

        self.metrics.rule_operation(KIND, "update");
        info!("Updated access lists for {}", target.id());
        Ok(())
    }

    /// Strip the access lists from a document. The document is removed when
    /// no routing conditions remain.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = resolve_path(id, RuleKind::ConditionRoute)?;
        let Some(mut document) = self.store.load_routing(&path).await? else {
            return Err(GovernanceError::NotFound(format!("access lists {}", id)));
        };
        let before = self.legacy.derive_access(&document);

        let (_, routing) = access_list::extract(&document.conditions);
        if routing.is_empty() {
            self.store.remove(&path).await?;
        } else {
            document.conditions = routing;
            self.store.save_routing(&path, &document).await?;
        }
        self.reconcile(before, None).await?;

        self.metrics.rule_operation(KIND, "delete");
        info!("Deleted access lists for {}", id);
        Ok(())
    }

    pub async fn find(&self, id: &str) -> Result<Option<AccessResponse>> {
        let path = resolve_path(id, RuleKind::ConditionRoute)?;
        let Some(document) = self.store.load_routing(&path).await? else {
            return Ok(None);
        };

        let (entries, _) = access_list::extract(&document.conditions);
        if entries.is_empty() {
            return Ok(None);
        }
        let (blacklist, whitelist) = access_list::to_lists(&entries);

        Ok(Some(AccessResponse {
            id: id.to_string(),
            target: RuleTarget::from_id(id, document.scope).to_ref(),
            blacklist,
            whitelist,
            enabled: document.enabled,
        }))
    }

    /// Retract the previous combined entry, then publish the new one
    async fn reconcile(
        &self,
        before: Option<LegacyRule>,
        after: Option<LegacyRule>,
    ) -> Result<()> {
        let before: Vec<_> = before.into_iter().collect();
        let after: Vec<_> = after.into_iter().collect();
        self.legacy.replace(&before, &after).await
    }
}
