//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (pool sizes, limits, timeouts)
//! - Reject table names that are not plain SQL identifiers
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("at least one read replica is required")]
    NoReadReplicas,

    #[error("replica name must not be empty")]
    EmptyReplicaName,

    #[error("replica name `{0}` is configured more than once")]
    DuplicateReplica(String),

    #[error("pool sizes must satisfy 1 <= min ({min}) <= max ({max})")]
    PoolSize { min: u32, max: u32 },

    #[error("pool.connect_timeout_secs must be greater than 0")]
    ZeroConnectTimeout,

    #[error("startup.max_attempts must be at least 1")]
    NoStartupAttempts,

    #[error("health_check.{0} must not be empty")]
    EmptyHealthHost(&'static str),

    #[error("health_check.timeout_ms must be greater than 0")]
    ZeroHealthTimeout,

    #[error("data.table `{0}` must be `schema.table` made of [A-Za-z0-9_]")]
    InvalidTable(String),

    #[error("data limits must satisfy 1 <= default_limit ({default}) <= max_limit ({max})")]
    Limits { default: u32, max: u32 },

    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.replicas.read.is_empty() {
        errors.push(ValidationError::NoReadReplicas);
    }
    let mut seen = HashSet::new();
    for name in config.replicas.read.iter().chain(std::iter::once(&config.replicas.write)) {
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyReplicaName);
        } else if !seen.insert(name.as_str()) {
            errors.push(ValidationError::DuplicateReplica(name.clone()));
        }
    }

    let pool = &config.pool;
    if pool.min_connections == 0 || pool.min_connections > pool.max_connections {
        errors.push(ValidationError::PoolSize {
            min: pool.min_connections,
            max: pool.max_connections,
        });
    }

    if pool.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }

    if config.startup.max_attempts == 0 {
        errors.push(ValidationError::NoStartupAttempts);
    }

    let health = &config.health_check;
    for (field, host) in [
        ("primary_host", &health.primary_host),
        ("secondary1_host", &health.secondary1_host),
        ("secondary2_host", &health.secondary2_host),
    ] {
        if host.trim().is_empty() {
            errors.push(ValidationError::EmptyHealthHost(field));
        }
    }
    if health.timeout_ms == 0 {
        errors.push(ValidationError::ZeroHealthTimeout);
    }

    if !is_qualified_table(&config.data.table) {
        errors.push(ValidationError::InvalidTable(config.data.table.clone()));
    }
    let data = &config.data;
    if data.default_limit == 0 || data.default_limit > data.max_limit {
        errors.push(ValidationError::Limits {
            default: data.default_limit,
            max: data.max_limit,
        });
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The table name is interpolated into SQL, so only `ident.ident` is accepted.
fn is_qualified_table(table: &str) -> bool {
    let mut parts = table.split('.');
    let (Some(schema), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    [schema, name].iter().all(|part| {
        !part.is_empty()
            && !part.starts_with(|c: char| c.is_ascii_digit())
            && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}
