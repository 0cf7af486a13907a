//! Contracts of the external collaborators
//!
//! Both collaborators are remote services owned by other teams. Their
//! clients decide about timeouts; nothing here retries.

use async_trait::async_trait;
use url::Url;

/// Key-path document store holding canonical rule documents
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the content stored at `path`, `None` when nothing is stored
    async fn get(&self, path: &str) -> anyhow::Result<Option<String>>;

    /// Store `content` at `path`, replacing what was there
    async fn set(&self, path: &str, content: &str) -> anyhow::Result<()>;

    /// Remove whatever is stored at `path`
    async fn delete(&self, path: &str) -> anyhow::Result<()>;
}

/// Service registry watched by legacy runtime clients
#[async_trait]
pub trait Registry: Send + Sync {
    async fn register(&self, entry: &Url) -> anyhow::Result<()>;

    async fn unregister(&self, entry: &Url) -> anyhow::Result<()>;
}
