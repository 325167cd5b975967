//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject constraint expressions and rule templates that do not parse
//! - Validate observability values
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProviderConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProviderConfig;
use crate::constraints::{self, ConstraintError};
use crate::provider::template::{RuleTemplate, TemplateError};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("provider.prefix must not be empty")]
    EmptyPrefix,

    #[error("provider.prefix {0:?} must not start or end with '.'")]
    DottedPrefix(String),

    #[error("provider.constraints: {0}")]
    Constraints(ConstraintError),

    #[error("provider.default_rule: {0}")]
    DefaultRule(TemplateError),

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    LogLevel(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

pub fn validate_config(config: &ProviderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let provider = &config.provider;
    let observability = &config.observability;

    if provider.prefix.is_empty() {
        errors.push(ValidationError::EmptyPrefix);
    } else if provider.prefix.starts_with('.') || provider.prefix.ends_with('.') {
        errors.push(ValidationError::DottedPrefix(provider.prefix.clone()));
    }

    if let Err(e) = constraints::parse(&provider.constraints) {
        errors.push(ValidationError::Constraints(e));
    }

    if let Err(e) = RuleTemplate::parse(&provider.default_rule) {
        errors.push(ValidationError::DefaultRule(e));
    }

    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::LogLevel(observability.log_level.clone()));
    }

    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::MetricsAddress(observability.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
