//! Build pass: registry items in, routing configuration out.

use tracing::{error, info, info_span, warn};

use crate::catalog::RegistryItem;
use crate::config::schema::ProviderSettings;
use crate::constraints::{ConstraintMatcher, TagConstraints};
use crate::dynamic::{Configuration, GlobalConfiguration};
use crate::label::{DottedLabelDecoder, LabelDecoder};
use crate::observability::metrics;
use crate::provider::error::{ProviderError, SkipReason};
use crate::provider::filter::keep;
use crate::provider::http::{complete_http, needs_default_router};
use crate::provider::merge::{ConfigurationMerger, DefaultMerger};
use crate::provider::routers::{build_router_configuration, build_tcp_router_configuration};
use crate::provider::tcp::complete_tcp;
use crate::provider::template::{RuleModel, RuleTemplate, TemplateError};

/// An item that produced no fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub key: String,
    pub reason: SkipReason,
}

/// Outcome of one pass before merging.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// One fragment per kept item, keyed by `node-name-id`.
    pub configurations: GlobalConfiguration,

    /// Items left out, in input order.
    pub skipped: Vec<SkippedItem>,
}

/// Turns catalog items into proxy configuration.
#[derive(Debug)]
pub struct Provider {
    decoder: Box<dyn LabelDecoder>,
    constraints: Box<dyn ConstraintMatcher>,
    merger: Box<dyn ConfigurationMerger>,
    default_rule: RuleTemplate,
}

impl Provider {
    /// Create a provider with the built-in collaborators.
    pub fn new(settings: &ProviderSettings) -> Result<Self, TemplateError> {
        Ok(Self {
            decoder: Box::new(DottedLabelDecoder::new()),
            constraints: Box::new(TagConstraints::new(settings.constraints.clone())),
            merger: Box::new(DefaultMerger),
            default_rule: RuleTemplate::parse(&settings.default_rule)?,
        })
    }

    pub fn with_decoder(mut self, decoder: impl LabelDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    pub fn with_constraints(mut self, constraints: impl ConstraintMatcher + 'static) -> Self {
        self.constraints = Box::new(constraints);
        self
    }

    pub fn with_merger(mut self, merger: impl ConfigurationMerger + 'static) -> Self {
        self.merger = Box::new(merger);
        self
    }

    /// Run one pass and return the merged configuration. Never fails;
    /// items that cannot be built are left out.
    pub fn build_configuration(&self, items: &[RegistryItem]) -> Configuration {
        let report = self.assemble(items);
        self.merger.merge(report.configurations)
    }

    /// Run one pass, keeping per-item fragments and skip reasons.
    pub fn assemble(&self, items: &[RegistryItem]) -> BuildReport {
        let mut report = BuildReport::default();
        metrics::record_pass();

        for item in items {
            let key = item.key();
            let _span = info_span!("item", service_name = %key).entered();

            match self.build_item(item) {
                Ok(config) => {
                    metrics::record_built();
                    if report.configurations.insert(key.clone(), config).is_some() {
                        warn!("Duplicate item key, keeping the last one");
                    }
                }
                Err(reason) => {
                    if let SkipReason::Failed(e) = &reason {
                        error!(error = %e, "Skipping item");
                    }
                    metrics::record_skipped(reason.as_label());
                    report.skipped.push(SkippedItem { key, reason });
                }
            }
        }

        info!(
            built = report.configurations.len(),
            skipped = report.skipped.len(),
            "Build pass complete"
        );
        report
    }

    fn build_item(&self, item: &RegistryItem) -> Result<Configuration, SkipReason> {
        keep(item, self.constraints.as_ref())?;

        let mut config = self
            .decoder
            .decode(&item.labels)
            .map_err(ProviderError::from)?;

        if !config.tcp.is_empty() {
            complete_tcp(item, &mut config.tcp)?;
            build_tcp_router_configuration(&mut config.tcp);

            if config.http.is_empty() {
                return Ok(config);
            }
        }

        let default_router = needs_default_router(&config.http).then_some(item.name.as_str());
        complete_http(item, &mut config.http)?;

        let model = RuleModel {
            name: &item.name,
            labels: &item.labels,
        };
        build_router_configuration(&mut config.http, default_router, &self.default_rule, &model);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ExtraConf, HealthStatus};
    use std::collections::BTreeMap;

    fn item(labels: &[(&str, &str)]) -> RegistryItem {
        RegistryItem {
            node: "n1".into(),
            name: "svc".into(),
            id: "i1".into(),
            address: "10.0.0.5".into(),
            port: "8080".into(),
            status: HealthStatus::Passing,
            tags: Vec::new(),
            labels: labels.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            extra_conf: ExtraConf { enable: true },
        }
    }

    fn provider() -> Provider {
        Provider::new(&ProviderSettings::default()).unwrap()
    }

    #[test]
    fn test_plain_item() {
        let report = provider().assemble(&[item(&[])]);

        let config = &report.configurations["n1-svc-i1"];
        assert_eq!(config.http.routers["svc"].rule, "Host(`svc`)");
        assert_eq!(config.http.routers["svc"].service, "svc");
        assert!(config.tcp.is_empty());
    }

    #[test]
    fn test_declared_service_gets_no_default_router() {
        let report = provider().assemble(&[item(&[("traefik.http.services.api.loadbalancer.server.port", "9000")])]);

        let config = &report.configurations["n1-svc-i1"];
        assert!(config.http.routers.is_empty());
        assert_eq!(
            config.http.services["api"].load_balancer.as_ref().unwrap().servers[0].url,
            "http://10.0.0.5:8080"
        );
    }

    #[test]
    fn test_router_without_rule_gets_template() {
        let report = provider().assemble(&[item(&[("traefik.http.routers.web.entrypoints", "web")])]);

        let router = &report.configurations["n1-svc-i1"].http.routers["web"];
        assert_eq!(router.rule, "Host(`svc`)");
        assert_eq!(router.service, "svc");
    }

    #[test]
    fn test_tcp_and_http() {
        let report = provider().assemble(&[item(&[
            ("traefik.tcp.routers.raw.rule", "HostSNI(`*`)"),
            ("traefik.http.routers.web.rule", "Path(`/`)"),
        ])]);

        let config = &report.configurations["n1-svc-i1"];
        assert_eq!(config.tcp.routers["raw"].service, "svc");
        assert_eq!(config.tcp.services["svc"].load_balancer.as_ref().unwrap().servers[0].address, "10.0.0.5:8080");
        assert_eq!(config.http.routers["web"].service, "svc");
    }

    #[test]
    fn test_decode_error_skips_item() {
        let report = provider().assemble(&[item(&[("traefik.http.routers.web.bogus", "x")]), item(&[])]);

        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::Failed(ProviderError::Decode(_))
        ));
        assert_eq!(report.configurations.len(), 1);
    }

    #[test]
    fn test_custom_template() {
        let settings = ProviderSettings {
            default_rule: r#"PathPrefix(`/{{ index .Labels "traefik.path" }}`)"#.into(),
            ..Default::default()
        };
        let provider = Provider::new(&settings).unwrap();
        let report = provider.assemble(&[item(&[("traefik.path", "svc")])]);

        assert_eq!(
            report.configurations["n1-svc-i1"].http.routers["svc"].rule,
            "PathPrefix(`/svc`)"
        );
    }

    #[test]
    fn test_invalid_template_rejected() {
        let settings = ProviderSettings {
            default_rule: "{{ .Nope }}".into(),
            ..Default::default()
        };
        assert!(Provider::new(&settings).is_err());
    }

    #[derive(Debug)]
    struct FailingDecoder;

    impl LabelDecoder for FailingDecoder {
        fn decode(&self, _: &BTreeMap<String, String>) -> Result<Configuration, crate::label::DecodeError> {
            Err(crate::label::DecodeError::UnknownKey("traefik.x".into()))
        }
    }

    #[test]
    fn test_custom_decoder() {
        let report = provider().with_decoder(FailingDecoder).assemble(&[item(&[])]);
        assert!(report.configurations.is_empty());
        assert_eq!(report.skipped[0].key, "n1-svc-i1");
    }
}
