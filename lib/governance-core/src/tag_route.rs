//! Tag route management. Tag routes are replaced wholesale and never
//! mirrored to the registry.

use crate::key::{resolve_path, RuleKind, RuleTarget};
use crate::metrics::SyncMetrics;
use crate::store::RuleStore;
use crate::{GovernanceError, Result};
use governance_api::{TagRouteDocument, TagRouteRequest, TagRouteResponse};
use tracing::info;

const KIND: &str = "tag_route";

#[derive(Clone)]
pub struct TagRouteManager {
    store: RuleStore,
    metrics: SyncMetrics,
}

impl TagRouteManager {
    pub fn new(store: RuleStore, metrics: SyncMetrics) -> Self {
        Self { store, metrics }
    }

    /// Write the tag route, replacing any existing one
    pub async fn create(&self, request: &TagRouteRequest) -> Result<()> {
        let target = RuleTarget::from_ref(&request.target)?;
        let path = target.path(RuleKind::TagRoute)?;

        self.store.save_tag(&path, &to_document(&target, request)).await?;

        self.metrics.rule_operation(KIND, "create");
        info!("Created tag route {} ({} tags)", target.id(), request.tags.len());
        Ok(())
    }

    pub async fn update(&self, request: &TagRouteRequest) -> Result<()> {
        let target = RuleTarget::from_ref(&request.target)?;
        let id = target.id();
        let path = target.path(RuleKind::TagRoute)?;

        self.load_existing(&id, &path).await?;
        self.store.save_tag(&path, &to_document(&target, request)).await?;

        self.metrics.rule_operation(KIND, "update");
        info!("Updated tag route {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = resolve_path(id, RuleKind::TagRoute)?;
        self.load_existing(id, &path).await?;
        self.store.remove(&path).await?;

        self.metrics.rule_operation(KIND, "delete");
        info!("Deleted tag route {}", id);
        Ok(())
    }

    pub async fn enable(&self, id: &str) -> Result<()> {
        self.set_enabled(id, true).await
    }

    pub async fn disable(&self, id: &str) -> Result<()> {
        self.set_enabled(id, false).await
    }

    async fn set_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        let path = resolve_path(id, RuleKind::TagRoute)?;
        let mut document = self.load_existing(id, &path).await?;

        document.enabled = enabled;
        self.store.save_tag(&path, &document).await?;

        let op = if enabled { "enable" } else { "disable" };
        self.metrics.rule_operation(KIND, op);
        info!("Tag route {} enabled={}", id, enabled);
        Ok(())
    }

    pub async fn find(&self, id: &str) -> Result<Option<TagRouteResponse>> {
        let path = resolve_path(id, RuleKind::TagRoute)?;
        let document = self.store.load_tag(&path).await?;

        Ok(document.map(|document| TagRouteResponse {
            id: id.to_string(),
            target: RuleTarget::from_id(id, document.scope).to_ref(),
            tags: document.tags,
            enabled: document.enabled,
            force: document.force,
            runtime: document.runtime,
            priority: document.priority,
        }))
    }

    async fn load_existing(&self, id: &str, path: &str) -> Result<TagRouteDocument> {
        self.store
            .load_tag(path)
            .await?
            .ok_or_else(|| GovernanceError::NotFound(format!("tag route {}", id)))
    }
}

fn to_document(target: &RuleTarget, request: &TagRouteRequest) -> TagRouteDocument {
    TagRouteDocument {
        key: target.key(),
        scope: target.scope(),
        enabled: request.enabled,
        force: request.force,
        runtime: request.runtime,
        priority: request.priority,
        tags: request.tags.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryConfigStore, StoreEvent};
    use governance_api::{Tag, TargetRef};
    use std::sync::Arc;

    fn manager() -> (TagRouteManager, MemoryConfigStore) {
        let store = MemoryConfigStore::new();
        let metrics = SyncMetrics::new().unwrap();
        let manager = TagRouteManager::new(
            RuleStore::new(Arc::new(store.clone()), metrics.clone()),
            metrics,
        );
        (manager, store)
    }

    fn gray(addresses: &[&str]) -> TagRouteRequest {
        TagRouteRequest::new(
            TargetRef::application("shop"),
            vec![Tag {
                name: "gray".to_string(),
                addresses: addresses.iter().map(|a| a.to_string()).collect(),
            }],
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (manager, _) = manager();
        manager.create(&gray(&["10.0.0.1:20880"])).await.unwrap();

        let found = manager.find("shop").await.unwrap().unwrap();
        assert_eq!(found.id, "shop");
        assert_eq!(found.target, TargetRef::application("shop"));
        assert_eq!(found.tags[0].addresses, vec!["10.0.0.1:20880"]);
        assert!(found.enabled);
    }

    #[tokio::test]
    async fn test_update_replaces_wholesale() {
        let (manager, _) = manager();
        manager.create(&gray(&["10.0.0.1:20880", "10.0.0.2:20880"])).await.unwrap();

        let mut request = gray(&["10.0.0.3:20880"]);
        request.priority = 5;
        manager.update(&request).await.unwrap();

        let found = manager.find("shop").await.unwrap().unwrap();
        assert_eq!(found.tags.len(), 1);
        assert_eq!(found.tags[0].addresses, vec!["10.0.0.3:20880"]);
        assert_eq!(found.priority, 5);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (manager, store) = manager();
        let err = manager.update(&gray(&[])).await.unwrap_err();

        assert!(matches!(err, GovernanceError::NotFound(_)));
        assert!(store.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_enable_disable() {
        let (manager, _) = manager();
        manager.create(&gray(&[])).await.unwrap();

        manager.disable("shop").await.unwrap();
        assert!(!manager.find("shop").await.unwrap().unwrap().enabled);

        manager.enable("shop").await.unwrap();
        assert!(manager.find("shop").await.unwrap().unwrap().enabled);

        assert!(matches!(
            manager.disable("other").await,
            Err(GovernanceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let (manager, store) = manager();
        manager.create(&gray(&[])).await.unwrap();
        manager.delete("shop").await.unwrap();

        assert!(manager.find("shop").await.unwrap().is_none());
        assert_eq!(
            store.history().await.last(),
            Some(&StoreEvent::Delete("shop.tag-router".to_string()))
        );
        assert!(matches!(
            manager.delete("shop").await,
            Err(GovernanceError::NotFound(_))
        ));
    }
}
