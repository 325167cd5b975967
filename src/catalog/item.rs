//! Registry entries and their conversion into build-pass items.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root every label is re-keyed under, whatever the configured tag prefix.
pub const LABEL_ROOT: &str = "traefik";

/// Label holding the per-item enable directive.
pub const ENABLE_LABEL: &str = "traefik.enable";

/// Health status as reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Passing,
    Warning,
    Critical,
    Maintenance,
    #[default]
    #[serde(other)]
    Unknown,
}

impl HealthStatus {
    /// Passing and warning instances stay routable.
    pub fn is_routable(self) -> bool {
        matches!(self, HealthStatus::Passing | HealthStatus::Warning)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Passing => "passing",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
            HealthStatus::Maintenance => "maintenance",
            HealthStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One raw catalog record, field names as the registry API emits them.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CatalogEntry {
    pub node: String,

    /// Node address, used when the service has none of its own.
    pub address: String,

    #[serde(rename = "ServiceID")]
    pub service_id: String,

    pub service_name: String,

    pub service_address: String,

    pub service_port: u16,

    pub service_tags: Vec<String>,

    pub status: HealthStatus,
}

/// Directives pre-parsed from an item's labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraConf {
    pub enable: bool,
}

/// One service instance as seen by a build pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryItem {
    pub node: String,
    pub name: String,
    pub id: String,
    pub address: String,
    /// Empty means "use the load balancer's own port".
    pub port: String,
    pub status: HealthStatus,
    pub tags: Vec<String>,
    pub labels: BTreeMap<String, String>,
    pub extra_conf: ExtraConf,
}

impl RegistryItem {
    /// Converts a catalog record.
    ///
    /// Tags of the form `<prefix>.<path>=<value>` become `traefik.<path>`
    /// labels. The enable directive defaults to `exposed_by_default`.
    pub fn from_entry(entry: CatalogEntry, prefix: &str, exposed_by_default: bool) -> Self {
        let labels = tags_to_labels(&entry.service_tags, prefix);
        let extra_conf = extra_conf(&labels, exposed_by_default);

        let address = if entry.service_address.is_empty() {
            entry.address
        } else {
            entry.service_address
        };

        let port = match entry.service_port {
            0 => String::new(),
            p => p.to_string(),
        };

        Self {
            node: entry.node,
            name: entry.service_name,
            id: entry.service_id,
            address,
            port,
            status: entry.status,
            tags: entry.service_tags,
            labels,
            extra_conf,
        }
    }

    /// Disambiguation key: `node-name-id`.
    pub fn key(&self) -> String {
        format!("{}-{}-{}", self.node, self.name, self.id)
    }
}

fn tags_to_labels(tags: &[String], prefix: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    let head = format!("{}.", prefix);

    for tag in tags {
        let Some(rest) = tag.strip_prefix(&head) else {
            continue;
        };
        let (path, value) = rest.split_once('=').unwrap_or((rest, ""));
        labels.insert(format!("{}.{}", LABEL_ROOT, path.trim()), value.to_string());
    }

    labels
}

fn extra_conf(labels: &BTreeMap<String, String>, exposed_by_default: bool) -> ExtraConf {
    let enable = match labels.get(ENABLE_LABEL) {
        None => exposed_by_default,
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "t" => true,
            "false" | "0" | "f" => false,
            _ => {
                tracing::warn!(value = %raw, "Invalid enable label, treating item as disabled");
                false
            }
        },
    };

    ExtraConf { enable }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tags: &[&str]) -> CatalogEntry {
        CatalogEntry {
            node: "n1".into(),
            address: "192.168.1.10".into(),
            service_id: "i1".into(),
            service_name: "svc".into(),
            service_address: String::new(),
            service_port: 8080,
            service_tags: tags.iter().map(|t| t.to_string()).collect(),
            status: HealthStatus::Passing,
        }
    }

    #[test]
    fn test_tags_become_labels() {
        let item = RegistryItem::from_entry(
            entry(&["traefik.http.routers.web.rule=Host(`a.com`)", "env=prod", "traefik.enable=true"]),
            "traefik",
            false,
        );

        assert_eq!(item.labels.len(), 2);
        assert_eq!(item.labels["traefik.http.routers.web.rule"], "Host(`a.com`)");
        assert!(item.extra_conf.enable);
        assert_eq!(item.tags.len(), 3);
    }

    #[test]
    fn test_custom_prefix_is_rerooted() {
        let item = RegistryItem::from_entry(entry(&["edge.tcp.routers.db.rule=HostSNI(`*`)"]), "edge", true);
        assert_eq!(item.labels["traefik.tcp.routers.db.rule"], "HostSNI(`*`)");
    }

    #[test]
    fn test_value_keeps_equal_signs() {
        let item = RegistryItem::from_entry(entry(&["traefik.http.routers.r.rule=Query(`a=b`)"]), "traefik", true);
        assert_eq!(item.labels["traefik.http.routers.r.rule"], "Query(`a=b`)");
    }

    #[test]
    fn test_enable_defaults() {
        assert!(RegistryItem::from_entry(entry(&[]), "traefik", true).extra_conf.enable);
        assert!(!RegistryItem::from_entry(entry(&[]), "traefik", false).extra_conf.enable);
        assert!(!RegistryItem::from_entry(entry(&["traefik.enable=false"]), "traefik", true).extra_conf.enable);
        assert!(!RegistryItem::from_entry(entry(&["traefik.enable=maybe"]), "traefik", true).extra_conf.enable);
    }

    #[test]
    fn test_address_and_port_fallbacks() {
        let item = RegistryItem::from_entry(entry(&[]), "traefik", true);
        assert_eq!(item.address, "192.168.1.10");
        assert_eq!(item.port, "8080");

        let mut e = entry(&[]);
        e.service_address = "10.0.0.5".into();
        e.service_port = 0;
        let item = RegistryItem::from_entry(e, "traefik", true);
        assert_eq!(item.address, "10.0.0.5");
        assert!(item.port.is_empty());
    }

    #[test]
    fn test_key() {
        let item = RegistryItem::from_entry(entry(&[]), "traefik", true);
        assert_eq!(item.key(), "n1-svc-i1");
    }

    #[test]
    fn test_status_deserialization() {
        let status: HealthStatus = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(status, HealthStatus::Warning);
        let status: HealthStatus = serde_json::from_str("\"flapping\"").unwrap();
        assert_eq!(status, HealthStatus::Unknown);
        assert!(!HealthStatus::Critical.is_routable());
    }
}
