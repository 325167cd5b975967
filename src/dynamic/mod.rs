//! Dynamic routing configuration model.
//!
//! # Data Flow
//! ```text
//! labels ──▶ label decoder ──▶ Configuration (fragment)
//!                                 ├── http: routers / services / middlewares
//!                                 └── tcp:  routers / services
//!     per-entry fragments ──▶ merge ──▶ Configuration (global)
//! ```
//!
//! # Design Decisions
//! - Maps are `BTreeMap` so serialized output is stable across passes
//! - Defaults live on `Default` impls and are constructed fresh per use
//! - Empty fields are skipped on serialization

pub mod http;
pub mod tcp;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use http::{
    AddPrefix, HttpConfiguration, Middleware, RedirectScheme, Router, RouterTls, Server,
    ServersLoadBalancer, Service, StripPrefix,
};
pub use tcp::{TcpConfiguration, TcpRouter, TcpRouterTls, TcpServer, TcpServersLoadBalancer, TcpService};

/// A routing configuration fragment covering both planes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Application-layer section.
    pub http: HttpConfiguration,

    /// Transport-layer section.
    pub tcp: TcpConfiguration,
}

/// Per-entry fragments keyed by `node-service-instance`.
pub type GlobalConfiguration = BTreeMap<String, Configuration>;

impl Configuration {
    /// True when neither plane declares anything.
    pub fn is_empty(&self) -> bool {
        self.http.is_empty() && self.tcp.is_empty()
    }
}

/// Joins a host and a port the way socket addresses are written,
/// bracketing IPv6 literals.
pub fn join_host_port(host: &str, port: &str) -> String {
    if host.contains(':') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}
