//! Service catalog provider for the reverse proxy.
//!
//! Turns a snapshot of service registry entries into routing configuration:
//! filters ineligible entries, decodes their labels, fills in defaults,
//! resolves endpoints and merges everything into one configuration.

pub mod catalog;
pub mod config;
pub mod constraints;
pub mod dynamic;
pub mod label;
pub mod observability;
pub mod provider;

pub use catalog::RegistryItem;
pub use config::ProviderConfig;
pub use dynamic::{Configuration, GlobalConfiguration};
pub use provider::{BuildReport, Provider};
