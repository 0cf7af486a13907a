use crate::access::AccessManager;
use crate::backend::{ConfigStore, Registry};
use crate::condition_route::ConditionRouteManager;
use crate::config::GovernanceConfig;
use crate::legacy::LegacySync;
use crate::metrics::SyncMetrics;
use crate::store::RuleStore;
use crate::tag_route::TagRouteManager;
use crate::Result;
use std::sync::Arc;
use tracing::info;

/// All rule managers wired to one pair of collaborators
#[derive(Clone)]
pub struct GovernanceService {
    pub condition_routes: ConditionRouteManager,
    pub access: AccessManager,
    pub tag_routes: TagRouteManager,
    metrics: SyncMetrics,
}

impl GovernanceService {
    pub fn new(
        config_store: Arc<dyn ConfigStore>,
        registry: Arc<dyn Registry>,
        config: &GovernanceConfig,
    ) -> Result<Self> {
        let metrics = SyncMetrics::new()?;
        let store = RuleStore::new(config_store, metrics.clone());
        let legacy = LegacySync::new(registry, config.legacy.clone(), metrics.clone());

        info!(
            "Governance service ready (legacy mirroring: {})",
            config.legacy.enabled
        );

        Ok(Self {
            condition_routes: ConditionRouteManager::new(
                store.clone(),
                legacy.clone(),
                metrics.clone(),
            ),
            access: AccessManager::new(store.clone(), legacy, metrics.clone()),
            tag_routes: TagRouteManager::new(store, metrics.clone()),
            metrics,
        })
    }

    pub fn metrics(&self) -> &SyncMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryConfigStore, MemoryRegistry};
    use governance_api::{AccessRequest, ConditionRouteRequest, TargetRef};

    #[tokio::test]
    async fn test_managers_share_collaborators() {
        let store = MemoryConfigStore::new();
        let registry = MemoryRegistry::new();
        let service = GovernanceService::new(
            Arc::new(store.clone()),
            Arc::new(registry.clone()),
            &GovernanceConfig::default(),
        )
        .unwrap();

        let target = TargetRef::service("com.example.Foo");
        service
            .condition_routes
            .create(&ConditionRouteRequest::new(
                target.clone(),
                vec!["a => b".to_string()],
            ))
            .await
            .unwrap();
        service
            .access
            .create(&AccessRequest::new(target).with_blacklist(vec!["10.0.0.9".to_string()]))
            .await
            .unwrap();

        assert_eq!(store.documents().await.len(), 1);
        assert_eq!(registry.entries().await.len(), 2);

        let text = service.metrics().gather().unwrap();
        assert!(text.contains("governance_rule_operations_total"));
        assert!(text.contains("kind=\"access\""));
    }

    #[tokio::test]
    async fn test_legacy_mirroring_disabled() {
        let registry = MemoryRegistry::new();
        let mut config = GovernanceConfig::default();
        config.legacy.enabled = false;
        let service = GovernanceService::new(
            Arc::new(MemoryConfigStore::new()),
            Arc::new(registry.clone()),
            &config,
        )
        .unwrap();

        service
            .condition_routes
            .create(&ConditionRouteRequest::new(
                TargetRef::service("com.example.Foo"),
                vec!["a => b".to_string()],
            ))
            .await
            .unwrap();

        assert!(registry.history().await.is_empty());
    }
}
