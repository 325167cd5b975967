//! Transport-layer (TCP) configuration types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default grace period in milliseconds before closing a terminated connection.
pub const DEFAULT_TERMINATION_DELAY_MS: i64 = 100;

/// TCP section of a fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpConfiguration {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub routers: BTreeMap<String, TcpRouter>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub services: BTreeMap<String, TcpService>,
}

impl TcpConfiguration {
    pub fn is_empty(&self) -> bool {
        self.routers.is_empty() && self.services.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpRouter {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_points: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub service: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TcpRouterTls>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpRouterTls {
    pub passthrough: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpService {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<TcpServersLoadBalancer>,
}

impl Default for TcpService {
    fn default() -> Self {
        Self {
            load_balancer: Some(TcpServersLoadBalancer::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpServersLoadBalancer {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<TcpServer>,

    /// Milliseconds.
    pub termination_delay: i64,
}

impl Default for TcpServersLoadBalancer {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            termination_delay: DEFAULT_TERMINATION_DELAY_MS,
        }
    }
}

impl TcpServersLoadBalancer {
    pub fn mergeable(&self, other: &TcpServersLoadBalancer) -> bool {
        self.termination_delay == other.termination_delay
    }
}

/// One upstream TCP server. After resolution `address` holds `host:port`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpServer {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub port: String,
}
