//! Mesh governance API types
//!
//! This library defines the rule shapes exchanged with the governance core:
//! - RoutingRuleDocument: canonical condition route / access list document
//! - TagRouteDocument: canonical tag route document
//! - ConditionRouteRequest, TagRouteRequest, AccessRequest: management API inputs
//! - ConditionRouteResponse, TagRouteResponse, AccessResponse: management API outputs

pub mod v1;

pub use v1::{
    AccessRequest, AccessResponse, ConditionRouteRequest, ConditionRouteResponse,
    RoutingRuleDocument, Scope, Tag, TagRouteDocument, TagRouteRequest, TagRouteResponse,
    TargetRef,
};
