//! Application-layer (HTTP) configuration types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Scheme given to a server slot when nothing else is declared.
pub const DEFAULT_SCHEME: &str = "http";

/// HTTP section of a fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfiguration {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub routers: BTreeMap<String, Router>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub middlewares: BTreeMap<String, Middleware>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub services: BTreeMap<String, Service>,
}

impl HttpConfiguration {
    /// True when there are no routers, middlewares or services.
    pub fn is_empty(&self) -> bool {
        self.routers.is_empty() && self.middlewares.is_empty() && self.services.is_empty()
    }
}

/// Routes matching requests to a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Router {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_points: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub middlewares: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub service: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule: String,

    #[serde(skip_serializing_if = "is_zero")]
    pub priority: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<RouterTls>,
}

/// TLS termination on a router.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterTls {}

/// A service wraps exactly one load balancer.
///
/// `None` means the load balancer was never declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<ServersLoadBalancer>,
}

impl Default for Service {
    fn default() -> Self {
        Self {
            load_balancer: Some(ServersLoadBalancer::default()),
        }
    }
}

/// Load balancer over HTTP servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServersLoadBalancer {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    pub pass_host_header: bool,
}

impl Default for ServersLoadBalancer {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            pass_host_header: true,
        }
    }
}

impl ServersLoadBalancer {
    /// Two load balancers can be merged when they only differ by servers.
    pub fn mergeable(&self, other: &ServersLoadBalancer) -> bool {
        self.pass_host_header == other.pass_host_header
    }
}

/// One upstream HTTP server.
///
/// Before resolution `scheme` and `port` are set; afterwards only `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub scheme: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub port: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            url: String::new(),
            scheme: DEFAULT_SCHEME.to_string(),
            port: String::new(),
        }
    }
}

/// Request middleware. Exactly one field is expected to be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Middleware {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_prefix: Option<AddPrefix>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_prefix: Option<StripPrefix>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_scheme: Option<RedirectScheme>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddPrefix {
    pub prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripPrefix {
    pub prefixes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectScheme {
    pub scheme: String,
    pub permanent: bool,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}
