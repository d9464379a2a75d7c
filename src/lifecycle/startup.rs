//! Startup orchestration.
//!
//! # Responsibilities
//! - Create every replica pool before anything can serve traffic
//! - Build the fetcher and health aggregator on top of them
//! - Serve, then close the pools once the server has drained
//!
//! # Design Decisions
//! - Fail fast: a pool that cannot be created aborts startup
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::health::HealthAggregator;
use crate::http::{AppState, HttpServer};
use crate::lifecycle::ShutdownSignal;
use crate::load_balancer::{PgPoolFactory, PgPoolRegistry, PoolInitError, ReplicaDescriptor};
use crate::market::DataFetcher;
use crate::resilience::RetryPolicy;

/// A gateway whose pools are all live.
pub struct Gateway {
    config: GatewayConfig,
    registry: Arc<PgPoolRegistry>,
    state: AppState,
}

impl Gateway {
    /// Connect every replica pool and assemble the request-serving state.
    pub async fn start(config: GatewayConfig) -> Result<Self, PoolInitError> {
        let factory = PgPoolFactory::new(config.pool.clone());
        Self::start_with(config, factory).await
    }

    /// [`start`](Self::start) with an explicit pool factory.
    pub async fn start_with(config: GatewayConfig, factory: PgPoolFactory) -> Result<Self, PoolInitError> {
        let (read, write) = ReplicaDescriptor::from_config(&config);
        let retry = RetryPolicy::from(&config.startup);

        tracing::info!(
            read_replicas = read.len(),
            max_attempts = retry.max_attempts,
            retry_delay = ?retry.delay,
            "Creating replica pools"
        );
        let registry = Arc::new(PgPoolRegistry::init(factory, read, write, retry).await?);

        let state = AppState {
            fetcher: Arc::new(DataFetcher::new(registry.clone(), &config.data.table)),
            health: Arc::new(HealthAggregator::from_config(
                &config.health_check,
                &config.database,
            )),
            data: config.data.clone(),
        };

        Ok(Self {
            config,
            registry,
            state,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve on `listener` until `shutdown` fires, then close all pools.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let server = HttpServer::new(&self.config, self.state);
        let served = server.run(listener, shutdown).await;

        self.registry.shutdown().await;
        served
    }
}
