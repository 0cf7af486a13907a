use anyhow::{Context, Result};
use governance_api::{AccessRequest, ConditionRouteRequest, TagRouteRequest};
use governance_core::GovernanceService;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// One step of a manifest, tagged by `op`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Operation {
    CreateConditionRoute(ConditionRouteRequest),
    UpdateConditionRoute(ConditionRouteRequest),
    DeleteConditionRoute { id: String },
    EnableConditionRoute { id: String },
    DisableConditionRoute { id: String },
    CreateAccess(AccessRequest),
    UpdateAccess(AccessRequest),
    DeleteAccess { id: String },
    CreateTagRoute(TagRouteRequest),
    UpdateTagRoute(TagRouteRequest),
    DeleteTagRoute { id: String },
    EnableTagRoute { id: String },
    DisableTagRoute { id: String },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateConditionRoute(_) => "createConditionRoute",
            Operation::UpdateConditionRoute(_) => "updateConditionRoute",
            Operation::DeleteConditionRoute { .. } => "deleteConditionRoute",
            Operation::EnableConditionRoute { .. } => "enableConditionRoute",
            Operation::DisableConditionRoute { .. } => "disableConditionRoute",
            Operation::CreateAccess(_) => "createAccess",
            Operation::UpdateAccess(_) => "updateAccess",
            Operation::DeleteAccess { .. } => "deleteAccess",
            Operation::CreateTagRoute(_) => "createTagRoute",
            Operation::UpdateTagRoute(_) => "updateTagRoute",
            Operation::DeleteTagRoute { .. } => "deleteTagRoute",
            Operation::EnableTagRoute { .. } => "enableTagRoute",
            Operation::DisableTagRoute { .. } => "disableTagRoute",
        }
    }
}

pub fn parse(text: &str) -> Result<Vec<Operation>> {
    serde_yaml::from_str(text).context("Failed to parse manifest")
}

pub fn load(path: impl AsRef<Path>) -> Result<Vec<Operation>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    parse(&text)
}

/// Run a single operation against the service
pub async fn apply(service: &GovernanceService, operation: &Operation) -> Result<()> {
    debug!("Applying {}", operation.name());

    match operation {
        Operation::CreateConditionRoute(request) => service.condition_routes.create(request).await?,
        Operation::UpdateConditionRoute(request) => service.condition_routes.update(request).await?,
        Operation::DeleteConditionRoute { id } => service.condition_routes.delete(id).await?,
        Operation::EnableConditionRoute { id } => service.condition_routes.enable(id).await?,
        Operation::DisableConditionRoute { id } => service.condition_routes.disable(id).await?,
        Operation::CreateAccess(request) => service.access.create(request).await?,
        Operation::UpdateAccess(request) => service.access.update(request).await?,
        Operation::DeleteAccess { id } => service.access.delete(id).await?,
        Operation::CreateTagRoute(request) => service.tag_routes.create(request).await?,
        Operation::UpdateTagRoute(request) => service.tag_routes.update(request).await?,
        Operation::DeleteTagRoute { id } => service.tag_routes.delete(id).await?,
        Operation::EnableTagRoute { id } => service.tag_routes.enable(id).await?,
        Operation::DisableTagRoute { id } => service.tag_routes.disable(id).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use governance_api::TargetRef;
    use governance_core::{GovernanceConfig, MemoryConfigStore, MemoryRegistry};
    use std::sync::Arc;

    const MANIFEST: &str = r#"
- op: createConditionRoute
  service: com.example.Foo
  serviceVersion: 1.0.0
  conditions:
    - region=hangzhou => region=hangzhou
- op: createAccess
  application: shop
  blacklist: ["192.168.1.1"]
- op: disableConditionRoute
  id: "com.example.Foo:1.0.0:"
- op: createTagRoute
  application: shop
  tags:
    - name: gray
      addresses: ["10.0.0.1:20880"]
- op: deleteTagRoute
  id: shop
"#;

    #[test]
    fn test_parse_manifest() {
        let operations = parse(MANIFEST).unwrap();

        assert_eq!(operations.len(), 5);
        match &operations[0] {
            Operation::CreateConditionRoute(request) => {
                assert_eq!(
                    request.target,
                    TargetRef::service("com.example.Foo").with_version("1.0.0")
                );
                assert!(request.enabled);
            }
            other => panic!("unexpected operation {:?}", other),
        }
        assert_eq!(
            operations[2],
            Operation::DisableConditionRoute {
                id: "com.example.Foo:1.0.0:".to_string()
            }
        );
        assert_eq!(operations[4].name(), "deleteTagRoute");
    }

    #[test]
    fn test_parse_rejects_unknown_op() {
        assert!(parse("- op: renameRoute\n  id: x\n").is_err());
    }

    #[tokio::test]
    async fn test_apply_manifest() {
        let store = MemoryConfigStore::new();
        let registry = MemoryRegistry::new();
        let service = GovernanceService::new(
            Arc::new(store.clone()),
            Arc::new(registry.clone()),
            &GovernanceConfig::default(),
        )
        .unwrap();

        for operation in parse(MANIFEST).unwrap() {
            apply(&service, &operation).await.unwrap();
        }

        let documents = store.documents().await;
        assert_eq!(documents.len(), 2);
        assert!(documents.contains_key("com.example.Foo:1.0.0:.condition-router"));
        assert!(documents.contains_key("shop.condition-router"));

        let entries = registry.entries().await;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].as_str().contains("enabled=false"));
    }

    #[tokio::test]
    async fn test_apply_reports_missing_rule() {
        let service = GovernanceService::new(
            Arc::new(MemoryConfigStore::new()),
            Arc::new(MemoryRegistry::new()),
            &GovernanceConfig::default(),
        )
        .unwrap();

        let operation = Operation::EnableTagRoute {
            id: "shop".to_string(),
        };
        let err = apply(&service, &operation).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
