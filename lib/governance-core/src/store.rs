//! Typed access to rule documents in the configuration store

use crate::backend::ConfigStore;
use crate::metrics::SyncMetrics;
use crate::{GovernanceError, Result};
use governance_api::{RoutingRuleDocument, TagRouteDocument};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// RuleStore reads and writes YAML rule documents.
///
/// Store failures are returned as-is; nothing is retried here.
#[derive(Clone)]
pub struct RuleStore {
    backend: Arc<dyn ConfigStore>,
    metrics: SyncMetrics,
}

impl RuleStore {
    pub fn new(backend: Arc<dyn ConfigStore>, metrics: SyncMetrics) -> Self {
        Self { backend, metrics }
    }

    pub async fn load_routing(&self, path: &str) -> Result<Option<RoutingRuleDocument>> {
        self.load(path).await
    }

    pub async fn save_routing(&self, path: &str, document: &RoutingRuleDocument) -> Result<()> {
        self.save(path, document).await
    }

    pub async fn load_tag(&self, path: &str) -> Result<Option<TagRouteDocument>> {
        self.load(path).await
    }

    pub async fn save_tag(&self, path: &str, document: &TagRouteDocument) -> Result<()> {
        self.save(path, document).await
    }

    /// Delete the document at `path`
    pub async fn remove(&self, path: &str) -> Result<()> {
        self.metrics.store_call("delete");
        self.backend
            .delete(path)
            .await
            .map_err(GovernanceError::ConfigStore)?;
        debug!("Removed rule document {}", path);
        Ok(())
    }

    async fn load<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.metrics.store_call("get");
        let content = self
            .backend
            .get(path)
            .await
            .map_err(GovernanceError::ConfigStore)?;

        match content {
            Some(content) => serde_yaml::from_str(&content)
                .map(Some)
                .map_err(|source| GovernanceError::MalformedDocument {
                    path: path.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    async fn save<T: Serialize>(&self, path: &str, document: &T) -> Result<()> {
        let content = serde_yaml::to_string(document)?;
        self.metrics.store_call("set");
        self.backend
            .set(path, &content)
            .await
            .map_err(GovernanceError::ConfigStore)?;
        debug!("Wrote rule document {}", path);
        Ok(())
    }
}
