//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: `{value}`")]
    Env { key: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay recognized environment variables onto `config`.
///
/// `lookup` resolves a variable name to its value; unset names are skipped.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("GATEWAY_BIND_ADDRESS") {
        config.listener.bind_address = v;
    }

    if let Some(v) = lookup("PGBOUNCER_HOST") {
        config.database.host = v;
    }
    if let Some(v) = lookup("PGBOUNCER_PORT") {
        config.database.port = parse_env("PGBOUNCER_PORT", v)?;
    }
    if let Some(v) = lookup("DB_USER") {
        config.database.user = v;
    }
    if let Some(v) = lookup("DB_PASSWORD") {
        config.database.password = v;
    }

    if let Some(v) = lookup("DB_READ_NAMES") {
        config.replicas.read = v
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
    }
    if let Some(v) = lookup("DB_WRITE_NAME") {
        config.replicas.write = v;
    }

    if let Some(v) = lookup("DB_NAME") {
        config.health_check.database = v;
    }
    if let Some(v) = lookup("PRIMARY_HOST") {
        config.health_check.primary_host = v;
    }
    if let Some(v) = lookup("SECONDARY1_HOST") {
        config.health_check.secondary1_host = v;
    }
    if let Some(v) = lookup("SECONDARY2_HOST") {
        config.health_check.secondary2_host = v;
    }

    if let Some(v) = lookup("LOG_LEVEL") {
        config.observability.log_level = v;
    }

    Ok(())
}

fn parse_env<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env { key, value })
}
