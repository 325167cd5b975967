//! Router synthesis.
//!
//! Fills in what label authors usually leave out: a default HTTP router,
//! a default rule, and the service a router forwards to when the section
//! has exactly one. Running either function on a complete section is a no-op.

use std::collections::BTreeMap;

use tracing::{error, info};

use crate::dynamic::{HttpConfiguration, Router, TcpConfiguration};
use crate::provider::template::{RuleModel, RuleTemplate};

/// Wire TCP routers to services. Routers without a rule are dropped, as are
/// routers whose service cannot be inferred.
pub fn build_tcp_router_configuration(config: &mut TcpConfiguration) {
    let single = single_name(&config.services);
    let services = config.services.len();

    config.routers.retain(|name, router| {
        if router.rule.is_empty() {
            error!(router = %name, "Empty rule");
            return false;
        }

        if router.service.is_empty() {
            if services > 1 {
                error!(router = %name, "Could not define the service name for the router: too many services");
                return false;
            }
            if let Some(service) = &single {
                router.service = service.clone();
            }
        }

        true
    });
}

/// Wire HTTP routers to services.
///
/// With `default_router` set and no routers declared, a router of that name
/// is created unless several services make the target ambiguous. Routers
/// without a rule get the rendered template; an empty rendering drops them.
pub fn build_router_configuration(
    config: &mut HttpConfiguration,
    default_router: Option<&str>,
    template: &RuleTemplate,
    model: &RuleModel<'_>,
) {
    if let Some(name) = default_router {
        if config.routers.is_empty() {
            if config.services.len() > 1 {
                info!("Could not create a router for the item: too many services");
            } else {
                config.routers.insert(name.to_string(), Router::default());
            }
        }
    }

    let single = single_name(&config.services);
    let services = config.services.len();

    config.routers.retain(|name, router| {
        if router.rule.is_empty() {
            router.rule = template.render(model);
            if router.rule.is_empty() {
                error!(router = %name, template = %template.source(), "Undefined rule");
                return false;
            }
        }

        if router.service.is_empty() {
            if services > 1 {
                error!(router = %name, "Could not define the service name for the router: too many services");
            } else if let Some(service) = &single {
                router.service = service.clone();
            }
        }

        true
    });
}

fn single_name<V>(map: &BTreeMap<String, V>) -> Option<String> {
    match map.len() {
        1 => map.keys().next().cloned(),
        _ => None,
    }
}
