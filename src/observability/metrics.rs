//! Metrics collection and exposition.
//!
//! # Metrics
//! - `catalog_build_passes_total` (counter): build passes run
//! - `catalog_items_built_total` (counter): items that produced a fragment
//! - `catalog_items_skipped_total` (counter): skipped items by `reason`
//!
//! Without an installed recorder the macros are no-ops, so library users
//! and tests pay nothing.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_pass() {
    metrics::counter!("catalog_build_passes_total").increment(1);
}

pub fn record_built() {
    metrics::counter!("catalog_items_built_total").increment(1);
}

pub fn record_skipped(reason: &'static str) {
    metrics::counter!("catalog_items_skipped_total", "reason" => reason).increment(1);
}
