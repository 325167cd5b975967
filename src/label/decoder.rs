//! Decoder for dotted `traefik.*` labels.

use std::collections::BTreeMap;

use crate::dynamic::{
    AddPrefix, Configuration, HttpConfiguration, Middleware, RedirectScheme, Router, RouterTls, Server,
    StripPrefix, TcpConfiguration, TcpRouter, TcpRouterTls, TcpServer,
};
use crate::label::{DecodeError, LabelDecoder};

const ROOT: &str = "traefik";

#[derive(Debug, Clone, Copy, Default)]
pub struct DottedLabelDecoder;

impl DottedLabelDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl LabelDecoder for DottedLabelDecoder {
    fn decode(&self, labels: &BTreeMap<String, String>) -> Result<Configuration, DecodeError> {
        let mut config = Configuration::default();

        for (key, value) in labels {
            let segments: Vec<&str> = key.split('.').collect();
            if segments.len() < 2 || !segments[0].eq_ignore_ascii_case(ROOT) {
                continue;
            }

            match segments[1].to_ascii_lowercase().as_str() {
                "http" => decode_http(&mut config.http, key, &segments[2..], value)?,
                "tcp" => decode_tcp(&mut config.tcp, key, &segments[2..], value)?,
                _ => continue,
            }
        }

        Ok(config)
    }
}

/// Splits `<kind>.<name>.<field...>` into its parts, lowercasing the field path.
fn element<'a>(key: &str, segments: &[&'a str]) -> Result<(String, &'a str, String), DecodeError> {
    match segments {
        [kind, name, field @ ..] if !name.is_empty() && !field.is_empty() => Ok((
            kind.to_ascii_lowercase(),
            *name,
            field.join(".").to_ascii_lowercase(),
        )),
        _ => Err(DecodeError::UnknownKey(key.to_string())),
    }
}

fn decode_http(
    config: &mut HttpConfiguration,
    key: &str,
    segments: &[&str],
    value: &str,
) -> Result<(), DecodeError> {
    let (kind, name, field) = element(key, segments)?;

    match kind.as_str() {
        "routers" => {
            let router = config.routers.entry(name.to_string()).or_insert_with(Router::default);
            match field.as_str() {
                "rule" => router.rule = value.to_string(),
                "service" => router.service = value.to_string(),
                "entrypoints" => router.entry_points = split_list(value),
                "middlewares" => router.middlewares = split_list(value),
                "priority" => router.priority = parse_int(key, value)?,
                "tls" => router.tls = parse_bool(key, value)?.then(RouterTls::default),
                _ => return Err(DecodeError::UnknownKey(key.to_string())),
            }
        }
        "services" => {
            let service = config.services.entry(name.to_string()).or_default();
            let lb = service.load_balancer.get_or_insert_with(Default::default);
            match field.as_str() {
                "loadbalancer.passhostheader" => lb.pass_host_header = parse_bool(key, value)?,
                "loadbalancer.server.port" => {
                    first_server(&mut lb.servers).port = parse_port(key, value)?;
                }
                "loadbalancer.server.scheme" => first_server(&mut lb.servers).scheme = value.to_string(),
                _ => return Err(DecodeError::UnknownKey(key.to_string())),
            }
        }
        "middlewares" => {
            let middleware = config.middlewares.entry(name.to_string()).or_insert_with(Middleware::default);
            match field.as_str() {
                "addprefix.prefix" => {
                    middleware.add_prefix = Some(AddPrefix {
                        prefix: value.to_string(),
                    });
                }
                "stripprefix.prefixes" => {
                    middleware.strip_prefix = Some(StripPrefix {
                        prefixes: split_list(value),
                    });
                }
                "redirectscheme.scheme" => {
                    middleware.redirect_scheme.get_or_insert_with(RedirectScheme::default).scheme =
                        value.to_string();
                }
                "redirectscheme.permanent" => {
                    middleware.redirect_scheme.get_or_insert_with(RedirectScheme::default).permanent =
                        parse_bool(key, value)?;
                }
                _ => return Err(DecodeError::UnknownKey(key.to_string())),
            }
        }
        _ => return Err(DecodeError::UnknownKey(key.to_string())),
    }

    Ok(())
}

fn decode_tcp(
    config: &mut TcpConfiguration,
    key: &str,
    segments: &[&str],
    value: &str,
) -> Result<(), DecodeError> {
    let (kind, name, field) = element(key, segments)?;

    match kind.as_str() {
        "routers" => {
            let router = config.routers.entry(name.to_string()).or_insert_with(TcpRouter::default);
            match field.as_str() {
                "rule" => router.rule = value.to_string(),
                "service" => router.service = value.to_string(),
                "entrypoints" => router.entry_points = split_list(value),
                "tls.passthrough" => {
                    router.tls = Some(TcpRouterTls {
                        passthrough: parse_bool(key, value)?,
                    });
                }
                _ => return Err(DecodeError::UnknownKey(key.to_string())),
            }
        }
        "services" => {
            let service = config.services.entry(name.to_string()).or_default();
            let lb = service.load_balancer.get_or_insert_with(Default::default);
            match field.as_str() {
                "loadbalancer.terminationdelay" => lb.termination_delay = parse_int(key, value)?,
                "loadbalancer.server.port" => {
                    if lb.servers.is_empty() {
                        lb.servers.push(TcpServer::default());
                    }
                    lb.servers[0].port = parse_port(key, value)?;
                }
                _ => return Err(DecodeError::UnknownKey(key.to_string())),
            }
        }
        _ => return Err(DecodeError::UnknownKey(key.to_string())),
    }

    Ok(())
}

fn first_server(servers: &mut Vec<Server>) -> &mut Server {
    if servers.is_empty() {
        servers.push(Server::default());
    }
    &mut servers[0]
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool, DecodeError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "t" => Ok(true),
        "false" | "0" | "f" => Ok(false),
        _ => Err(invalid(key, value, "bool")),
    }
}

fn parse_int(key: &str, value: &str) -> Result<i64, DecodeError> {
    value.trim().parse().map_err(|_| invalid(key, value, "integer"))
}

fn parse_port(key: &str, value: &str) -> Result<String, DecodeError> {
    value
        .trim()
        .parse::<u16>()
        .map(|p| p.to_string())
        .map_err(|_| invalid(key, value, "port number"))
}

fn invalid(key: &str, value: &str, expected: &'static str) -> DecodeError {
    DecodeError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn decode(pairs: &[(&str, &str)]) -> Result<Configuration, DecodeError> {
        DottedLabelDecoder::new().decode(&labels(pairs))
    }

    #[test]
    fn test_ignores_foreign_labels() {
        let config = decode(&[("traefik.enable", "true"), ("maintainer", "ops")]).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_http_router() {
        let config = decode(&[
            ("traefik.http.routers.Web.rule", "Host(`a.com`)"),
            ("traefik.http.routers.Web.EntryPoints", "web, websecure"),
            ("traefik.http.routers.Web.middlewares", "strip"),
            ("traefik.http.routers.Web.priority", "10"),
            ("traefik.http.routers.Web.tls", "true"),
        ])
        .unwrap();

        let router = &config.http.routers["Web"];
        assert_eq!(router.rule, "Host(`a.com`)");
        assert_eq!(router.entry_points, vec!["web", "websecure"]);
        assert_eq!(router.middlewares, vec!["strip"]);
        assert_eq!(router.priority, 10);
        assert!(router.tls.is_some());
        assert!(config.http.services.is_empty());
    }

    #[test]
    fn test_http_service_starts_from_defaults() {
        let config = decode(&[("traefik.http.services.api.loadbalancer.server.port", "80")]).unwrap();

        let lb = config.http.services["api"].load_balancer.as_ref().unwrap();
        assert!(lb.pass_host_header);
        assert_eq!(lb.servers.len(), 1);
        assert_eq!(lb.servers[0].port, "80");
        assert_eq!(lb.servers[0].scheme, "http");
    }

    #[test]
    fn test_middlewares() {
        let config = decode(&[
            ("traefik.http.middlewares.strip.stripprefix.prefixes", "/api,/v1"),
            ("traefik.http.middlewares.https.redirectscheme.scheme", "https"),
            ("traefik.http.middlewares.https.redirectscheme.permanent", "true"),
        ])
        .unwrap();

        assert_eq!(
            config.http.middlewares["strip"].strip_prefix.as_ref().unwrap().prefixes,
            vec!["/api", "/v1"]
        );
        let redirect = config.http.middlewares["https"].redirect_scheme.as_ref().unwrap();
        assert_eq!(redirect.scheme, "https");
        assert!(redirect.permanent);
    }

    #[test]
    fn test_tcp_section() {
        let config = decode(&[
            ("traefik.tcp.routers.db.rule", "HostSNI(`*`)"),
            ("traefik.tcp.routers.db.tls.passthrough", "true"),
            ("traefik.tcp.services.db.loadbalancer.terminationdelay", "250"),
            ("traefik.tcp.services.db.loadbalancer.server.port", "5432"),
        ])
        .unwrap();

        assert!(config.http.is_empty());
        assert!(config.tcp.routers["db"].tls.as_ref().unwrap().passthrough);
        let lb = config.tcp.services["db"].load_balancer.as_ref().unwrap();
        assert_eq!(lb.termination_delay, 250);
        assert_eq!(lb.servers[0].port, "5432");
    }

    #[test]
    fn test_unknown_field() {
        let err = decode(&[("traefik.http.routers.web.rul", "x")]).unwrap_err();
        assert_eq!(err, DecodeError::UnknownKey("traefik.http.routers.web.rul".into()));

        assert!(decode(&[("traefik.http.routers.web", "x")]).is_err());
        assert!(decode(&[("traefik.http.widgets.web.rule", "x")]).is_err());
    }

    #[test]
    fn test_invalid_values() {
        let err = decode(&[("traefik.http.services.api.loadbalancer.server.port", "http")]).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidValue { expected: "port number", .. }));

        assert!(decode(&[("traefik.http.routers.web.priority", "high")]).is_err());
        assert!(decode(&[("traefik.http.services.api.loadbalancer.passhostheader", "yes")]).is_err());
    }
}
