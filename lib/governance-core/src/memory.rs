//! In-memory configuration store and service registry
//!
//! Both keep an ordered history of the calls they received so callers can
//! inspect exactly which writes an operation produced.

use crate::backend::{ConfigStore, Registry};
use anyhow::bail;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

/// A write received by [`MemoryConfigStore`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    Set(String),
    Delete(String),
}

#[derive(Default)]
struct StoreState {
    documents: BTreeMap<String, String>,
    history: Vec<StoreEvent>,
}

/// MemoryConfigStore keeps documents in a map keyed by path
#[derive(Clone, Default)]
pub struct MemoryConfigStore {
    state: Arc<RwLock<StoreState>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail, or recover
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Store content directly, bypassing history
    pub async fn seed(&self, path: &str, content: &str) {
        let mut state = self.state.write().await;
        state.documents.insert(path.to_string(), content.to_string());
    }

    /// Copy of all stored documents
    pub async fn documents(&self) -> BTreeMap<String, String> {
        self.state.read().await.documents.clone()
    }

    /// Writes received so far, in order
    pub async fn history(&self) -> Vec<StoreEvent> {
        self.state.read().await.history.clone()
    }

    fn check_available(&self) -> anyhow::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            bail!("configuration store unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get(&self, path: &str) -> anyhow::Result<Option<String>> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state.documents.get(path).cloned())
    }

    async fn set(&self, path: &str, content: &str) -> anyhow::Result<()> {
        self.check_available()?;
        let mut state = self.state.write().await;
        state.documents.insert(path.to_string(), content.to_string());
        state.history.push(StoreEvent::Set(path.to_string()));
        debug!("Stored document: {}", path);
        Ok(())
    }

    async fn delete(&self, path: &str) -> anyhow::Result<()> {
        self.check_available()?;
        let mut state = self.state.write().await;
        state.documents.remove(path);
        state.history.push(StoreEvent::Delete(path.to_string()));
        debug!("Deleted document: {}", path);
        Ok(())
    }
}

/// A call received by [`MemoryRegistry`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    Register(Url),
    Unregister(Url),
}

#[derive(Default)]
struct RegistryState {
    entries: BTreeSet<String>,
    history: Vec<RegistryEvent>,
}

/// MemoryRegistry keeps registered entries as a set of URLs.
///
/// Unregistering only removes an entry whose URL matches exactly.
#[derive(Clone, Default)]
pub struct MemoryRegistry {
    state: Arc<RwLock<RegistryState>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Currently registered entries, sorted
    pub async fn entries(&self) -> Vec<Url> {
        let state = self.state.read().await;
        state
            .entries
            .iter()
            .filter_map(|entry| Url::parse(entry).ok())
            .collect()
    }

    /// Calls received so far, in order
    pub async fn history(&self) -> Vec<RegistryEvent> {
        self.state.read().await.history.clone()
    }

    fn check_available(&self) -> anyhow::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            bail!("service registry unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn register(&self, entry: &Url) -> anyhow::Result<()> {
        self.check_available()?;
        let mut state = self.state.write().await;
        state.entries.insert(entry.to_string());
        state.history.push(RegistryEvent::Register(entry.clone()));
        debug!("Registered entry: {}", entry);
        Ok(())
    }

    async fn unregister(&self, entry: &Url) -> anyhow::Result<()> {
        self.check_available()?;
        let mut state = self.state.write().await;
        state.entries.remove(entry.as_str());
        state.history.push(RegistryEvent::Unregister(entry.clone()));
        debug!("Unregistered entry: {}", entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_set_get_delete() {
        let store = MemoryConfigStore::new();
        assert_eq!(store.get("a.condition-router").await.unwrap(), None);

        store.set("a.condition-router", "key: a").await.unwrap();
        assert_eq!(
            store.get("a.condition-router").await.unwrap().as_deref(),
            Some("key: a")
        );

        store.delete("a.condition-router").await.unwrap();
        assert_eq!(store.get("a.condition-router").await.unwrap(), None);
        assert_eq!(
            store.history().await,
            vec![
                StoreEvent::Set("a.condition-router".to_string()),
                StoreEvent::Delete("a.condition-router".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_store_seed_skips_history() {
        let store = MemoryConfigStore::new();
        store.seed("a.tag-router", "key: a").await;
        assert_eq!(store.documents().await.len(), 1);
        assert!(store.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_store_unavailable() {
        let store = MemoryConfigStore::new();
        store.set_unavailable(true);
        assert!(store.get("a").await.is_err());
        assert!(store.set("a", "b").await.is_err());

        store.set_unavailable(false);
        assert!(store.get("a").await.is_ok());
    }

    #[tokio::test]
    async fn test_registry_exact_match_unregister() {
        let registry = MemoryRegistry::new();
        let entry = Url::parse("route://0.0.0.0/com.example.Foo?rule=a").unwrap();
        let other = Url::parse("route://0.0.0.0/com.example.Foo?rule=b").unwrap();

        registry.register(&entry).await.unwrap();
        registry.register(&entry).await.unwrap();
        assert_eq!(registry.entries().await.len(), 1);

        registry.unregister(&other).await.unwrap();
        assert_eq!(registry.entries().await, vec![entry.clone()]);

        registry.unregister(&entry).await.unwrap();
        assert!(registry.entries().await.is_empty());
        assert_eq!(registry.history().await.len(), 4);
    }

    #[tokio::test]
    async fn test_registry_unavailable() {
        let registry = MemoryRegistry::new();
        registry.set_unavailable(true);
        let entry = Url::parse("route://0.0.0.0/com.example.Foo").unwrap();
        assert!(registry.register(&entry).await.is_err());
        assert!(registry.history().await.is_empty());
    }
}
