//! Catalog provider CLI.
//!
//! # Overview
//!
//! ```text
//!   registry snapshot (JSON)          provider config (TOML)
//!            │                                 │
//!            ▼                                 ▼
//!   ┌─────────────────┐   items   ┌──────────────────────────┐
//!   │     catalog     │──────────▶│         provider         │
//!   │ tags → labels   │           │ filter → decode →        │
//!   └─────────────────┘           │ complete → routers       │
//!                                 └────────────┬─────────────┘
//!                                              │ node-name-id → fragment
//!                                              ▼
//!                                 ┌──────────────────────────┐
//!                                 │          merge           │──▶ stdout (JSON)
//!                                 └──────────────────────────┘
//! ```
//!
//! With `--watch` the config file is watched and every valid change
//! triggers a new pass over the same snapshot.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::{json, Value};

use catalog_provider::catalog::{load_snapshot, CatalogEntry, RegistryItem};
use catalog_provider::config::watcher::ConfigWatcher;
use catalog_provider::config::{load_config, ProviderConfig};
use catalog_provider::observability::{logging, metrics};
use catalog_provider::Provider;

#[derive(Parser)]
#[command(name = "catalog-provider")]
#[command(about = "Build reverse proxy routing configuration from a service catalog snapshot", long_about = None)]
struct Cli {
    /// Provider configuration file (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Registry snapshot: a JSON array of catalog entries.
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Print per-item fragments and skip reasons instead of the merged configuration.
    #[arg(long)]
    fragments: bool,

    /// Rebuild whenever the configuration file changes.
    #[arg(long, requires = "config")]
    watch: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProviderConfig::default(),
    };
    logging::init_logging(&config.observability.log_level);

    let entries = load_snapshot(&cli.snapshot)?;
    tracing::info!(
        snapshot = ?cli.snapshot,
        entries = entries.len(),
        constraints = %config.provider.constraints,
        "Snapshot loaded"
    );

    match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(watch(path, config, &entries, cli.fragments))
        }
        _ => run_pass(&config, &entries, cli.fragments),
    }
}

async fn watch(
    path: &Path,
    config: ProviderConfig,
    entries: &[CatalogEntry],
    fragments: bool,
) -> Result<(), Box<dyn Error>> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    run_pass(&config, entries, fragments)?;

    let (watcher, mut updates) = ConfigWatcher::new(path, config);
    let _watcher = watcher.run()?;

    loop {
        tokio::select! {
            Some(new_config) = updates.recv() => {
                if let Err(e) = run_pass(&new_config, entries, fragments) {
                    tracing::error!(error = %e, "Build pass failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

fn run_pass(config: &ProviderConfig, entries: &[CatalogEntry], fragments: bool) -> Result<(), Box<dyn Error>> {
    let provider = Provider::new(&config.provider)?;
    let items: Vec<RegistryItem> = entries
        .iter()
        .cloned()
        .map(|entry| RegistryItem::from_entry(entry, &config.provider.prefix, config.provider.exposed_by_default))
        .collect();

    let output: Value = if fragments {
        let report = provider.assemble(&items);
        let skipped: Vec<Value> = report
            .skipped
            .iter()
            .map(|s| json!({ "key": s.key, "reason": s.reason.to_string() }))
            .collect();
        json!({ "configurations": report.configurations, "skipped": skipped })
    } else {
        serde_json::to_value(provider.build_configuration(&items))?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
