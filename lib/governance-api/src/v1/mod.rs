/// Version 1 of the governance rule types

pub mod access;
pub mod condition_route;
pub mod document;
pub mod tag_route;
pub mod target;

pub use access::{AccessRequest, AccessResponse};
pub use condition_route::{ConditionRouteRequest, ConditionRouteResponse};
pub use document::{RoutingRuleDocument, Scope, Tag, TagRouteDocument};
pub use tag_route::{TagRouteRequest, TagRouteResponse};
pub use target::TargetRef;

/// Storage path suffix for condition routes and access lists
pub const CONDITION_RULE_SUFFIX: &str = ".condition-router";
/// Storage path suffix for tag routes
pub const TAG_RULE_SUFFIX: &str = ".tag-router";

pub(crate) fn default_enabled() -> bool {
    true
}
