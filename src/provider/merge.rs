//! Folding per-item fragments into one configuration.
//!
//! # Responsibilities
//! - Union routers, middlewares and services across fragments
//! - Pool servers of same-named services whose load balancers agree
//! - Drop any name defined differently by two fragments
//!
//! # Design Decisions
//! - Fragments are visited in key order, so the result does not depend
//!   on the order items arrived in
//! - A conflict removes the element entirely rather than picking a winner

use std::collections::{BTreeMap, BTreeSet};

use tracing::error;

use crate::dynamic::{Configuration, GlobalConfiguration, Service, TcpService};

/// Combines per-item fragments into the configuration handed to the proxy.
pub trait ConfigurationMerger: Send + Sync + std::fmt::Debug {
    fn merge(&self, configurations: GlobalConfiguration) -> Configuration;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMerger;

impl ConfigurationMerger for DefaultMerger {
    fn merge(&self, configurations: GlobalConfiguration) -> Configuration {
        let mut merged = Configuration::default();

        let mut http_routers = Origins::default();
        let mut http_middlewares = Origins::default();
        let mut http_services = Origins::default();
        let mut tcp_routers = Origins::default();
        let mut tcp_services = Origins::default();

        for (key, config) in configurations {
            for (name, router) in config.http.routers {
                let ok = add_equal(&mut merged.http.routers, &name, router);
                http_routers.record(name, &key, ok);
            }
            for (name, middleware) in config.http.middlewares {
                let ok = add_equal(&mut merged.http.middlewares, &name, middleware);
                http_middlewares.record(name, &key, ok);
            }
            for (name, service) in config.http.services {
                let ok = add_service(&mut merged.http.services, &name, service);
                http_services.record(name, &key, ok);
            }
            for (name, router) in config.tcp.routers {
                let ok = add_equal(&mut merged.tcp.routers, &name, router);
                tcp_routers.record(name, &key, ok);
            }
            for (name, service) in config.tcp.services {
                let ok = add_service(&mut merged.tcp.services, &name, service);
                tcp_services.record(name, &key, ok);
            }
        }

        http_routers.prune("HTTP router", &mut merged.http.routers);
        http_middlewares.prune("HTTP middleware", &mut merged.http.middlewares);
        http_services.prune("HTTP service", &mut merged.http.services);
        tcp_routers.prune("TCP router", &mut merged.tcp.routers);
        tcp_services.prune("TCP service", &mut merged.tcp.services);

        merged
    }
}

/// Which fragments defined each name, and which names conflicted.
#[derive(Debug, Default)]
struct Origins {
    keys: BTreeMap<String, Vec<String>>,
    conflicts: BTreeSet<String>,
}

impl Origins {
    fn record(&mut self, name: String, key: &str, ok: bool) {
        if !ok {
            self.conflicts.insert(name.clone());
        }
        self.keys.entry(name).or_default().push(key.to_string());
    }

    fn prune<V>(self, kind: &str, elements: &mut BTreeMap<String, V>) {
        for name in self.conflicts {
            elements.remove(&name);
            let keys = self.keys.get(&name).cloned().unwrap_or_default();
            error!(kind, name = %name, keys = ?keys, "Defined multiple times with different configurations");
        }
    }
}

fn add_equal<V: PartialEq>(elements: &mut BTreeMap<String, V>, name: &str, value: V) -> bool {
    match elements.get(name) {
        Some(existing) => *existing == value,
        None => {
            elements.insert(name.to_string(), value);
            true
        }
    }
}

/// Services that can pool their servers with a same-named peer.
trait ServerPool: Sized {
    /// Take `other`'s servers if the load balancers agree otherwise.
    fn absorb(&mut self, other: Self) -> bool;
}

impl ServerPool for Service {
    fn absorb(&mut self, other: Self) -> bool {
        match (self.load_balancer.as_mut(), other.load_balancer) {
            (Some(lb), Some(other)) if lb.mergeable(&other) => {
                lb.servers.extend(other.servers);
                true
            }
            (None, None) => true,
            _ => false,
        }
    }
}

impl ServerPool for TcpService {
    fn absorb(&mut self, other: Self) -> bool {
        match (self.load_balancer.as_mut(), other.load_balancer) {
            (Some(lb), Some(other)) if lb.mergeable(&other) => {
                lb.servers.extend(other.servers);
                true
            }
            (None, None) => true,
            _ => false,
        }
    }
}

fn add_service<S: ServerPool>(services: &mut BTreeMap<String, S>, name: &str, service: S) -> bool {
    match services.get_mut(name) {
        Some(existing) => existing.absorb(service),
        None => {
            services.insert(name.to_string(), service);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::{Router, Server, ServersLoadBalancer, TcpServer, TcpServersLoadBalancer};

    fn http_fragment(service: &str, url: &str, rule: &str) -> Configuration {
        let mut config = Configuration::default();
        config.http.services.insert(service.into(), Service {
            load_balancer: Some(ServersLoadBalancer {
                servers: vec![Server {
                    url: url.into(),
                    scheme: String::new(),
                    port: String::new(),
                }],
                pass_host_header: true,
            }),
        });
        config.http.routers.insert(service.into(), Router {
            rule: rule.into(),
            service: service.into(),
            ..Default::default()
        });
        config
    }

    #[test]
    fn test_servers_pooled() {
        let mut all = GlobalConfiguration::new();
        all.insert("n2-web-2".into(), http_fragment("web", "http://10.0.0.2:80", "Host(`web`)"));
        all.insert("n1-web-1".into(), http_fragment("web", "http://10.0.0.1:80", "Host(`web`)"));

        let merged = DefaultMerger.merge(all);

        let servers = &merged.http.services["web"].load_balancer.as_ref().unwrap().servers;
        let urls: Vec<&str> = servers.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["http://10.0.0.1:80", "http://10.0.0.2:80"]);
        assert_eq!(merged.http.routers.len(), 1);
    }

    #[test]
    fn test_conflicting_router_removed() {
        let mut all = GlobalConfiguration::new();
        all.insert("a".into(), http_fragment("web", "http://10.0.0.1:80", "Host(`a`)"));
        all.insert("b".into(), http_fragment("web", "http://10.0.0.2:80", "Host(`b`)"));

        let merged = DefaultMerger.merge(all);
        assert!(merged.http.routers.is_empty());
        assert!(merged.http.services.contains_key("web"));
    }

    #[test]
    fn test_conflicting_service_removed() {
        let mut a = http_fragment("web", "http://10.0.0.1:80", "Host(`web`)");
        a.http
            .services
            .get_mut("web")
            .and_then(|s| s.load_balancer.as_mut())
            .unwrap()
            .pass_host_header = false;

        let mut all = GlobalConfiguration::new();
        all.insert("a".into(), a);
        all.insert("b".into(), http_fragment("web", "http://10.0.0.2:80", "Host(`web`)"));
        all.insert("c".into(), http_fragment("web", "http://10.0.0.3:80", "Host(`web`)"));

        let merged = DefaultMerger.merge(all);
        assert!(!merged.http.services.contains_key("web"));
    }

    #[test]
    fn test_tcp_services_pooled() {
        let fragment = |address: &str| {
            let mut config = Configuration::default();
            config.tcp.services.insert("db".into(), TcpService {
                load_balancer: Some(TcpServersLoadBalancer {
                    servers: vec![TcpServer {
                        address: address.into(),
                        port: String::new(),
                    }],
                    termination_delay: 100,
                }),
            });
            config
        };

        let mut all = GlobalConfiguration::new();
        all.insert("a".into(), fragment("10.0.0.1:5432"));
        all.insert("b".into(), fragment("10.0.0.2:5432"));

        let merged = DefaultMerger.merge(all);
        assert_eq!(merged.tcp.services["db"].load_balancer.as_ref().unwrap().servers.len(), 2);
        assert!(merged.http.is_empty());
    }
}
