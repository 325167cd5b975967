//! TCP section completion.

use tracing::debug;

use crate::catalog::RegistryItem;
use crate::dynamic::{TcpConfiguration, TcpService};
use crate::provider::endpoint::resolve_tcp_service;
use crate::provider::error::ProviderError;

/// Give the TCP section at least one service and bind every declared
/// service to the item's endpoint. The first failure aborts the item.
pub fn complete_tcp(item: &RegistryItem, config: &mut TcpConfiguration) -> Result<(), ProviderError> {
    if config.services.is_empty() {
        config.services.insert(item.name.clone(), TcpService::default());
    }

    for (name, service) in config.services.iter_mut() {
        resolve_tcp_service(service, item).inspect_err(|e| {
            debug!(service = %name, error = %e, "Cannot resolve TCP server");
        })?;
    }

    Ok(())
}
