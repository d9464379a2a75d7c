//! Replica abstraction.
//!
//! # Responsibilities
//! - Describe one database reachable through the pooling intermediary
//! - Build connection options for it
//!
//! Descriptors are immutable once built from configuration.

use std::fmt;

use sqlx::postgres::PgConnectOptions;

use crate::config::GatewayConfig;

/// Whether a replica serves reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplicaRole {
    Read,
    Write,
}

impl fmt::Display for ReplicaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplicaRole::Read => f.write_str("read"),
            ReplicaRole::Write => f.write_str("write"),
        }
    }
}

/// A single replica: its name plus the target needed to connect to it.
#[derive(Clone, PartialEq, Eq)]
pub struct ReplicaDescriptor {
    /// Identifier; also the database name exposed by the intermediary.
    pub name: String,
    pub role: ReplicaRole,
    pub host: String,
    pub port: u16,
    pub user: String,
    password: String,
}

impl ReplicaDescriptor {
    pub fn new(
        name: impl Into<String>,
        role: ReplicaRole,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
        }
    }

    /// Build the read descriptors (in configured order) and the write descriptor.
    pub fn from_config(config: &GatewayConfig) -> (Vec<ReplicaDescriptor>, ReplicaDescriptor) {
        let db = &config.database;
        let make = |name: &str, role| {
            ReplicaDescriptor::new(name, role, &db.host, db.port, &db.user, &db.password)
        };

        let read = config
            .replicas
            .read
            .iter()
            .map(|name| make(name, ReplicaRole::Read))
            .collect();
        let write = make(&config.replicas.write, ReplicaRole::Write);
        (read, write)
    }

    /// Connection options targeting this replica's database.
    pub fn connect_options(&self, statement_cache_capacity: usize) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .statement_cache_capacity(statement_cache_capacity)
            .application_name("market-gateway")
    }
}

// Hand-written so the password never reaches logs.
impl fmt::Debug for ReplicaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplicaDescriptor")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}
