//! Prometheus counters for rule operations and collaborator calls

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Shared metrics collector. Clones share the same counters.
#[derive(Clone)]
pub struct SyncMetrics {
    /// Configuration store calls by operation
    pub store_operations_total: IntCounterVec,
    /// Service registry calls by operation
    pub registry_operations_total: IntCounterVec,
    /// Completed rule operations by rule kind and operation
    pub rule_operations_total: IntCounterVec,
    registry: Arc<Registry>,
}

impl SyncMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let store_operations_total = IntCounterVec::new(
            Opts::new(
                "governance_store_operations_total",
                "Configuration store calls",
            ),
            &["op"],
        )?;

        let registry_operations_total = IntCounterVec::new(
            Opts::new(
                "governance_registry_operations_total",
                "Service registry calls",
            ),
            &["op"],
        )?;

        let rule_operations_total = IntCounterVec::new(
            Opts::new(
                "governance_rule_operations_total",
                "Completed rule operations",
            ),
            &["kind", "op"],
        )?;

        registry.register(Box::new(store_operations_total.clone()))?;
        registry.register(Box::new(registry_operations_total.clone()))?;
        registry.register(Box::new(rule_operations_total.clone()))?;

        Ok(Self {
            store_operations_total,
            registry_operations_total,
            rule_operations_total,
            registry,
        })
    }

    pub(crate) fn store_call(&self, op: &str) {
        self.store_operations_total.with_label_values(&[op]).inc();
    }

    pub(crate) fn registry_call(&self, op: &str) {
        self.registry_operations_total.with_label_values(&[op]).inc();
    }

    pub(crate) fn rule_operation(&self, kind: &str, op: &str) {
        self.rule_operations_total.with_label_values(&[kind, op]).inc();
    }

    /// Gather all metrics in Prometheus text format
    pub fn gather(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = vec![];
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_render() {
        let metrics = SyncMetrics::new().unwrap();
        metrics.store_call("set");
        metrics.registry_call("register");
        metrics.rule_operation("condition_route", "create");

        let text = metrics.gather().unwrap();
        assert!(text.contains("# TYPE governance_store_operations_total counter"));
        assert!(text.contains("governance_registry_operations_total{op=\"register\"} 1"));
        assert!(text.contains("kind=\"condition_route\""));
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = SyncMetrics::new().unwrap();
        let clone = metrics.clone();
        clone.store_call("get");
        clone.store_call("get");

        assert_eq!(
            metrics.store_operations_total.with_label_values(&["get"]).get(),
            2
        );
    }
}
