//! Endpoint resolution for load balancer server slots.
//!
//! # Responsibilities
//! - Make sure slot 0 exists, built from the slot type's defaults
//! - Pick the port: the item's own, else the one already on slot 0
//! - Fold address, port (and scheme for HTTP) into one connection string
//!
//! # Design Decisions
//! - Only slot 0 is touched; further slots are left as declared
//! - The item's port always wins over a slot port
//! - Resolution is single-shot: the slot's port and scheme are cleared
//!   once folded, so a resolved load balancer must not be resolved again

use crate::catalog::RegistryItem;
use crate::dynamic::http::DEFAULT_SCHEME;
use crate::dynamic::{
    join_host_port, Server, ServersLoadBalancer, Service, TcpServer, TcpServersLoadBalancer, TcpService,
};
use crate::provider::error::ProviderError;

pub fn resolve_http_service(service: &mut Service, item: &RegistryItem) -> Result<(), ProviderError> {
    let lb = service
        .load_balancer
        .as_mut()
        .ok_or(ProviderError::LoadBalancerUndefined)?;
    resolve_http(lb, item)
}

pub fn resolve_tcp_service(service: &mut TcpService, item: &RegistryItem) -> Result<(), ProviderError> {
    let lb = service
        .load_balancer
        .as_mut()
        .ok_or(ProviderError::LoadBalancerUndefined)?;
    resolve_tcp(lb, item)
}

/// Resolve slot 0 of an HTTP load balancer into `scheme://host:port`.
pub fn resolve_http(lb: &mut ServersLoadBalancer, item: &RegistryItem) -> Result<(), ProviderError> {
    if item.address.is_empty() {
        return Err(ProviderError::MissingAddress);
    }

    if lb.servers.is_empty() {
        lb.servers.push(Server::default());
    }
    let server = &mut lb.servers[0];

    let port = choose_port(&item.port, &mut server.port)?;
    let scheme = match std::mem::take(&mut server.scheme) {
        s if s.is_empty() => DEFAULT_SCHEME.to_string(),
        s => s,
    };

    server.url = format!("{}://{}", scheme, join_host_port(&item.address, &port));
    Ok(())
}

/// Resolve slot 0 of a TCP load balancer into `host:port`.
pub fn resolve_tcp(lb: &mut TcpServersLoadBalancer, item: &RegistryItem) -> Result<(), ProviderError> {
    if item.address.is_empty() {
        return Err(ProviderError::MissingAddress);
    }

    if lb.servers.is_empty() {
        lb.servers.push(TcpServer::default());
    }
    let server = &mut lb.servers[0];

    let port = choose_port(&item.port, &mut server.port)?;
    server.address = join_host_port(&item.address, &port);
    Ok(())
}

/// Item port wins; otherwise the slot's. The slot's field is cleared either way.
fn choose_port(item_port: &str, slot_port: &mut String) -> Result<String, ProviderError> {
    let slot = std::mem::take(slot_port);
    let port = if item_port.is_empty() { slot } else { item_port.to_string() };

    if port.is_empty() {
        return Err(ProviderError::MissingPort);
    }
    Ok(port)
}
