//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::provider::template::DEFAULT_RULE;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Catalog interpretation settings.
    pub provider: ProviderSettings,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// How catalog items are turned into routing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Tag prefix whose tags become labels (e.g. "traefik").
    pub prefix: String,

    /// Expose items that carry no enable label.
    pub exposed_by_default: bool,

    /// Tag expression items must satisfy. Empty matches all.
    pub constraints: String,

    /// Rule template for routers declared without a rule.
    pub default_rule: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            prefix: "traefik".to_string(),
            exposed_by_default: true,
            constraints: String::new(),
            default_rule: DEFAULT_RULE.to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus endpoint in watch mode.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
