//! Rule translation and legacy synchronization for mesh governance rules
//!
//! This library provides:
//! - Key resolution and condition expression translation
//! - Access list projection over shared condition documents
//! - Typed document storage over a configuration store
//! - Legacy mirroring of service rules into a service registry
//! - Condition route, access list and tag route managers

pub mod access;
pub mod access_list;
pub mod backend;
pub mod condition_route;
pub mod config;
pub mod error;
pub mod expression;
pub mod key;
pub mod legacy;
pub mod memory;
pub mod metrics;
pub mod service;
pub mod store;
pub mod tag_route;

pub use access::AccessManager;
pub use backend::{ConfigStore, Registry};
pub use condition_route::ConditionRouteManager;
pub use config::GovernanceConfig;
pub use error::{GovernanceError, Result};
pub use key::{RuleKind, RuleTarget, ServiceRef};
pub use legacy::{LegacyRule, LegacySync};
pub use memory::{MemoryConfigStore, MemoryRegistry};
pub use metrics::SyncMetrics;
pub use service::GovernanceService;
pub use store::RuleStore;
pub use tag_route::TagRouteManager;
