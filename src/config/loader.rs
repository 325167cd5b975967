//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProviderConfig;
use crate::config::validation::{validate_config, ValidationError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProviderConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ProviderConfig, ConfigError> {
    let config: ProviderConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, ProviderConfig::default());
        assert_eq!(config.provider.prefix, "traefik");
        assert!(config.provider.exposed_by_default);
    }

    #[test]
    fn test_partial_config() {
        let config = parse_config(
            r#"
            [provider]
            exposed_by_default = false
            constraints = "tag==env=prod"

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(!config.provider.exposed_by_default);
        assert_eq!(config.provider.constraints, "tag==env=prod");
        assert_eq!(config.provider.prefix, "traefik");
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse_config("[provider"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_error_lists_all() {
        let err = parse_config(
            r#"
            [provider]
            prefix = ""
            constraints = "tag=="
            "#,
        )
        .unwrap_err();

        match &err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("Validation failed: provider.prefix"));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("catalog-provider-{}.toml", std::process::id()));
        fs::write(&path, "[provider]\nprefix = \"edge\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.provider.prefix, "edge");

        fs::remove_file(&path).unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Io(_))));
    }
}
