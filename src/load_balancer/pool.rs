//! Replica pool management.
//!
//! # Responsibilities
//! - Create one connection pool per read replica plus the write pool
//! - Retry pool creation a bounded number of times at startup
//! - Hand out read pools in round-robin order
//! - Close every pool on shutdown
//!
//! A `PoolRegistry` only exists fully populated: `init` either returns every
//! configured pool or closes what it opened and fails.

use std::error::Error as StdError;
use std::future::Future;
use std::io;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Connection, PgConnection};
use thiserror::Error;

use crate::config::PoolConfig;
use crate::load_balancer::{replica::ReplicaDescriptor, round_robin::RoundRobin};
use crate::observability::metrics;
use crate::resilience::{with_deadline, Deadline, RetryPolicy};

/// Creates and closes pools for replicas.
///
/// The seam between the registry's bookkeeping and the database driver.
pub trait PoolFactory: Send + Sync {
    type Pool: Send + Sync;
    type Error: StdError + Send + Sync + 'static;

    /// Establish a pool for `replica`. Must fail if the replica is unreachable.
    fn create(
        &self,
        replica: &ReplicaDescriptor,
    ) -> impl Future<Output = Result<Self::Pool, Self::Error>> + Send;

    /// Close `pool`, releasing its connections.
    fn close(&self, pool: &Self::Pool) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Postgres pools created through sqlx.
#[derive(Debug, Clone)]
pub struct PgPoolFactory {
    config: PoolConfig,
    lazy: bool,
}

impl PgPoolFactory {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            lazy: false,
        }
    }

    /// Pools that connect on first use, so creation never fails.
    ///
    /// For tooling and tests that must come up without a reachable database.
    pub fn lazy(config: PoolConfig) -> Self {
        Self { config, lazy: true }
    }

    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(self.config.min_connections)
            .max_connections(self.config.max_connections)
            .acquire_timeout(Duration::from_secs(self.config.acquire_timeout_secs))
    }
}

impl PoolFactory for PgPoolFactory {
    type Pool = PgPool;
    type Error = sqlx::Error;

    async fn create(&self, replica: &ReplicaDescriptor) -> Result<PgPool, sqlx::Error> {
        let connect = replica.connect_options(self.config.statement_cache_capacity);
        if !self.lazy {
            // Exactly one direct connection per attempt, bounded by
            // `connect_timeout_secs` rather than the acquire timeout.
            let limit = Duration::from_secs(self.config.connect_timeout_secs);
            let conn = match with_deadline(limit, PgConnection::connect_with(&connect)).await {
                Ok(conn) => conn,
                Err(Deadline::Failed(e)) => return Err(e),
                Err(Deadline::Elapsed(limit)) => {
                    return Err(sqlx::Error::Io(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("connect to replica `{}` timed out after {limit:?}", replica.name),
                    )))
                }
            };
            conn.close().await?;
        }
        // Reachability is established; the pool fills to `min_connections`
        // in the background.
        Ok(self.options().connect_lazy_with(connect))
    }

    async fn close(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        pool.close().await;
        Ok(())
    }
}

/// A live pool together with the replica it serves.
#[derive(Debug)]
pub struct ReplicaPool<P> {
    descriptor: ReplicaDescriptor,
    pool: P,
}

impl<P> ReplicaPool<P> {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }
}

/// Pool creation gave up for one replica.
#[derive(Debug, Error)]
#[error("failed to create pool for replica `{replica}` after {attempts} attempts: {source}")]
pub struct PoolInitError {
    pub replica: String,
    pub attempts: u32,
    #[source]
    pub source: Box<dyn StdError + Send + Sync>,
}

/// Owns every replica pool for the lifetime of the process.
pub struct PoolRegistry<F: PoolFactory> {
    factory: F,
    read: RoundRobin<ReplicaPool<F::Pool>>,
    write: ReplicaPool<F::Pool>,
}

/// The registry used by the running service.
pub type PgPoolRegistry = PoolRegistry<PgPoolFactory>;

impl<F: PoolFactory> PoolRegistry<F> {
    /// Create the read pools in configured order, then the write pool.
    ///
    /// Each pool gets `retry.max_attempts` tries with `retry.delay` between
    /// them. On the first pool that cannot be created, pools opened so far
    /// are closed and the error is returned.
    pub async fn init(
        factory: F,
        read: Vec<ReplicaDescriptor>,
        write: ReplicaDescriptor,
        retry: RetryPolicy,
    ) -> Result<Self, PoolInitError> {
        if read.is_empty() {
            return Err(PoolInitError {
                replica: write.name,
                attempts: 0,
                source: "no read replicas configured".into(),
            });
        }

        let mut read_pools = Vec::with_capacity(read.len());
        for descriptor in read {
            match Self::open(&factory, descriptor, retry).await {
                Ok(pool) => read_pools.push(pool),
                Err(e) => {
                    close_all(&factory, &read_pools).await;
                    return Err(e);
                }
            }
        }

        let write = match Self::open(&factory, write, retry).await {
            Ok(pool) => pool,
            Err(e) => {
                close_all(&factory, &read_pools).await;
                return Err(e);
            }
        };

        let Some(read) = RoundRobin::new(read_pools) else {
            close_all(&factory, std::slice::from_ref(&write)).await;
            return Err(PoolInitError {
                replica: write.descriptor.name,
                attempts: 0,
                source: "no read replicas configured".into(),
            });
        };

        Ok(Self {
            factory,
            read,
            write,
        })
    }

    async fn open(
        factory: &F,
        descriptor: ReplicaDescriptor,
        retry: RetryPolicy,
    ) -> Result<ReplicaPool<F::Pool>, PoolInitError> {
        let pool = Self::create_with_retry(factory, &descriptor, retry).await?;
        tracing::info!(
            replica = %descriptor.name,
            role = %descriptor.role,
            "Replica pool ready"
        );
        Ok(ReplicaPool { descriptor, pool })
    }

    async fn create_with_retry(
        factory: &F,
        descriptor: &ReplicaDescriptor,
        retry: RetryPolicy,
    ) -> Result<F::Pool, PoolInitError> {
        retry
            .run(&descriptor.name, |_| factory.create(descriptor))
            .await
            .map_err(|e| PoolInitError {
                replica: descriptor.name.clone(),
                attempts: e.attempts,
                source: Box::new(e.last_error),
            })
    }

    /// Next read pool in round-robin order, regardless of replica health.
    pub fn next_read_pool(&self) -> &ReplicaPool<F::Pool> {
        let selected = self.read.next();
        metrics::record_read_dispatch(selected.name());
        selected
    }

    /// Look up a read pool by replica name.
    pub fn read_pool(&self, name: &str) -> Option<&ReplicaPool<F::Pool>> {
        self.read.items().iter().find(|p| p.name() == name)
    }

    pub fn write_pool(&self) -> &ReplicaPool<F::Pool> {
        &self.write
    }

    /// Read replica names in rotation order.
    pub fn read_replica_names(&self) -> Vec<&str> {
        self.read.items().iter().map(ReplicaPool::name).collect()
    }

    /// Close every read pool and the write pool.
    ///
    /// Best effort: a pool that fails to close is logged and skipped.
    pub async fn shutdown(&self) {
        close_all(&self.factory, self.read.items()).await;
        close_all(&self.factory, std::slice::from_ref(&self.write)).await;
        tracing::info!("All replica pools closed");
    }
}

async fn close_all<F: PoolFactory>(factory: &F, pools: &[ReplicaPool<F::Pool>]) {
    for p in pools {
        match factory.close(&p.pool).await {
            Ok(()) => tracing::info!(replica = %p.name(), "Replica pool closed"),
            Err(e) => tracing::warn!(replica = %p.name(), error = %e, "Failed to close replica pool"),
        }
    }
}
