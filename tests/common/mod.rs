//! Shared helpers for integration tests.

use std::collections::BTreeMap;

use catalog_provider::catalog::{ExtraConf, HealthStatus, RegistryItem};
use catalog_provider::config::ProviderSettings;
use catalog_provider::Provider;

/// A passing, enabled item with no labels.
pub fn item(node: &str, name: &str, id: &str, address: &str, port: &str) -> RegistryItem {
    RegistryItem {
        node: node.into(),
        name: name.into(),
        id: id.into(),
        address: address.into(),
        port: port.into(),
        status: HealthStatus::Passing,
        tags: Vec::new(),
        labels: BTreeMap::new(),
        extra_conf: ExtraConf { enable: true },
    }
}

/// Builder-style tweaks for test items.
pub trait ItemExt: Sized {
    fn label(self, key: &str, value: &str) -> Self;
    fn tag(self, tag: &str) -> Self;
    fn status(self, status: HealthStatus) -> Self;
}

impl ItemExt for RegistryItem {
    fn label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.into());
        self
    }

    fn status(mut self, status: HealthStatus) -> Self {
        self.status = status;
        self
    }
}

pub fn provider() -> Provider {
    provider_with(ProviderSettings::default())
}

#[allow(dead_code)]
pub fn provider_with(settings: ProviderSettings) -> Provider {
    Provider::new(&settings).expect("default settings are valid")
}
