use anyhow::{bail, Result};
use governance_core::config::LoggingConfig;
use governance_core::{GovernanceConfig, GovernanceService, MemoryConfigStore, MemoryRegistry};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod manifest;

#[tokio::main]
async fn main() -> Result<()> {
    let config = GovernanceConfig::from_env()?;
    init_logging(&config.logging);

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: governance-plan <manifest.yaml>");
    };

    let operations = manifest::load(&path)?;
    info!("Planning {} operations from {}", operations.len(), path);

    let store = MemoryConfigStore::new();
    let registry = MemoryRegistry::new();
    let service = GovernanceService::new(
        Arc::new(store.clone()),
        Arc::new(registry.clone()),
        &config,
    )?;

    for (index, operation) in operations.iter().enumerate() {
        if let Err(e) = manifest::apply(&service, operation).await {
            error!("Operation {} ({}) failed: {}", index + 1, operation.name(), e);
            return Err(e);
        }
    }

    println!("# Configuration store");
    for (path, content) in store.documents().await {
        println!("--- {}", path);
        print!("{}", content);
    }

    println!("\n# Service registry");
    for entry in registry.entries().await {
        println!("{}", entry);
    }

    println!("\n# Metrics");
    print!("{}", service.metrics().gather()?);

    Ok(())
}

/// Install the subscriber. `RUST_LOG` wins over the configured filter.
/// Logs go to stderr so the plan on stdout stays clean.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
