//! HTTP section completion.

use tracing::debug;

use crate::catalog::RegistryItem;
use crate::dynamic::{HttpConfiguration, Service};
use crate::provider::endpoint::resolve_http_service;
use crate::provider::error::ProviderError;

/// Give the HTTP section at least one service and bind every declared
/// service to the item's endpoint. The first failure aborts the item.
pub fn complete_http(item: &RegistryItem, config: &mut HttpConfiguration) -> Result<(), ProviderError> {
    if config.services.is_empty() {
        config.services.insert(item.name.clone(), Service::default());
    }

    for (name, service) in config.services.iter_mut() {
        resolve_http_service(service, item).inspect_err(|e| {
            debug!(service = %name, error = %e, "Cannot resolve HTTP server");
        })?;
    }

    Ok(())
}

/// A default router is synthesized only for items whose labels declared
/// no HTTP routers, middlewares or services. Check before completion.
pub fn needs_default_router(config: &HttpConfiguration) -> bool {
    config.is_empty()
}
