//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the market data gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Pooled access through the connection-pooling intermediary.
    pub database: DatabaseConfig,

    /// Logical database names of the read and write replicas.
    pub replicas: ReplicaConfig,

    /// Per-replica pool sizing.
    pub pool: PoolConfig,

    /// Bounded retry used while establishing pools.
    pub startup: StartupConfig,

    /// Direct-host liveness probes.
    pub health_check: HealthCheckConfig,

    /// Market data query settings.
    pub data: DataConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Connection settings for the pooling intermediary.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Intermediary host.
    pub host: String,

    /// Intermediary port.
    pub port: u16,

    /// Database user, shared by pooled and direct connections.
    pub user: String,

    /// Database password.
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "pgbouncer".to_string(),
            port: 6432,
            user: "postgres".to_string(),
            password: String::new(),
        }
    }
}

/// Replica database names as exposed by the intermediary.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplicaConfig {
    /// Read replicas, in round-robin order.
    pub read: Vec<String>,

    /// The single write replica.
    pub write: String,
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            read: vec!["bitcoin_read_1".to_string(), "bitcoin_read_2".to_string()],
            write: "bitcoin_write".to_string(),
        }
    }
}

/// Pool sizing applied to every replica pool.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Connections kept open at all times.
    pub min_connections: u32,

    /// Upper bound on open connections.
    pub max_connections: u32,

    /// Server-side prepared statement cache size. Must stay 0 behind a
    /// transaction-pooling intermediary.
    pub statement_cache_capacity: usize,

    /// How long a request may wait for a free connection.
    pub acquire_timeout_secs: u64,

    /// Deadline for the single connection opened by each startup attempt.
    pub connect_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_connections: 1,
            max_connections: 10,
            statement_cache_capacity: 0,
            acquire_timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}

/// Startup retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Attempts per pool before startup is aborted.
    pub max_attempts: u32,

    /// Fixed delay between attempts in seconds.
    pub retry_delay_secs: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay_secs: 2,
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Primary database host.
    pub primary_host: String,

    /// First secondary host.
    pub secondary1_host: String,

    /// Second secondary host.
    pub secondary2_host: String,

    /// Port used for direct connections.
    pub port: u16,

    /// Database probed on each host.
    pub database: String,

    /// Per-probe deadline in milliseconds.
    pub timeout_ms: u64,
}

impl HealthCheckConfig {
    /// Hosts in reporting order: primary, secondary1, secondary2.
    pub fn hosts(&self) -> Vec<String> {
        vec![
            self.primary_host.clone(),
            self.secondary1_host.clone(),
            self.secondary2_host.clone(),
        ]
    }
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            primary_host: "primary".to_string(),
            secondary1_host: "secondary1".to_string(),
            secondary2_host: "secondary2".to_string(),
            port: 5432,
            database: "postgres".to_string(),
            timeout_ms: 3000,
        }
    }
}

/// Market data query configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// Fully qualified table (`schema.table`).
    pub table: String,

    /// Row count used when the request does not name one.
    pub default_limit: u32,

    /// Largest accepted `limit`.
    pub max_limit: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            table: "public.data_bitcoin".to_string(),
            default_limit: 500,
            max_limit: 10_000,
        }
    }
}

/// Timeout configuration for request handling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
