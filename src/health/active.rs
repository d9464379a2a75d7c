//! Active health checking.
//!
//! # Responsibilities
//! - Probe every database host directly, bypassing the pooling intermediary
//! - Run all probes concurrently, each under its own deadline
//! - Report one `NodeStatus` per host, in input order

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use futures_util::future::join_all;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use tokio::time::Instant;

use crate::config::{DatabaseConfig, HealthCheckConfig};
use crate::health::status::NodeStatus;
use crate::observability::metrics;
use crate::resilience::{with_deadline, Deadline};

/// A liveness check against a single host.
pub trait Probe: Send + Sync {
    type Error: Display + Send;

    /// Connect to `host`, run a trivial query and disconnect.
    fn probe(&self, host: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Direct, non-pooled Postgres connection running `SELECT 1`.
#[derive(Clone)]
pub struct PgProbe {
    port: u16,
    user: String,
    password: String,
    database: String,
}

impl PgProbe {
    pub fn new(health: &HealthCheckConfig, credentials: &DatabaseConfig) -> Self {
        Self {
            port: health.port,
            user: credentials.user.clone(),
            password: credentials.password.clone(),
            database: health.database.clone(),
        }
    }
}

impl Probe for PgProbe {
    type Error = sqlx::Error;

    async fn probe(&self, host: &str) -> Result<(), sqlx::Error> {
        let options = PgConnectOptions::new()
            .host(host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database);

        let mut conn = PgConnection::connect_with(&options).await?;
        sqlx::query("SELECT 1").execute(&mut conn).await?;
        conn.close().await
    }
}

/// Fans out probes to a fixed host list and gathers the results.
pub struct HealthAggregator<P> {
    probe: P,
    hosts: Vec<String>,
    timeout: Duration,
}

impl<P: Probe> HealthAggregator<P> {
    pub fn new(probe: P, hosts: Vec<String>, timeout: Duration) -> Self {
        Self {
            probe,
            hosts,
            timeout,
        }
    }

    /// Hosts probed by [`check_configured`](Self::check_configured).
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Probe the configured hosts.
    pub async fn check_configured(&self) -> Vec<NodeStatus> {
        self.check_all(&self.hosts).await
    }

    /// Probe `hosts` concurrently.
    ///
    /// Always yields exactly one status per host, in input order. Returns once
    /// every probe has finished or hit its deadline, so the slowest probe
    /// (at most the timeout) bounds the total.
    pub async fn check_all(&self, hosts: &[String]) -> Vec<NodeStatus> {
        join_all(hosts.iter().map(|host| self.check_node(host))).await
    }

    async fn check_node(&self, host: &str) -> NodeStatus {
        let start = Instant::now();

        let status = match with_deadline(self.timeout, self.probe.probe(host)).await {
            Ok(()) => NodeStatus::up(host, start.elapsed()),
            Err(Deadline::Failed(e)) => {
                tracing::warn!(host = %host, error = %e, "Health probe failed");
                NodeStatus::down(host)
            }
            Err(Deadline::Elapsed(limit)) => {
                tracing::warn!(host = %host, timeout = ?limit, "Health probe timed out");
                NodeStatus::down(host)
            }
        };

        metrics::record_node_health(host, status.up, status.latency_ms);
        status
    }
}

impl HealthAggregator<PgProbe> {
    /// Aggregator over the configured primary and secondaries.
    pub fn from_config(health: &HealthCheckConfig, credentials: &DatabaseConfig) -> Self {
        Self::new(
            PgProbe::new(health, credentials),
            health.hosts(),
            Duration::from_millis(health.timeout_ms),
        )
    }
}
