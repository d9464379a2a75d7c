//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (PGBOUNCER_HOST, DB_USER, PRIMARY_HOST, ...)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → handed to startup, which builds the subsystems from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; replicas are fixed for the process lifetime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    DataConfig, DatabaseConfig, GatewayConfig, HealthCheckConfig, ListenerConfig,
    ObservabilityConfig, PoolConfig, ReplicaConfig, StartupConfig, TimeoutConfig,
};
