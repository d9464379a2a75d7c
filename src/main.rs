//! Market data gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                  MARKET GATEWAY                  │
//!                         │                                                  │
//!   GET /data             │  ┌────────┐   ┌──────────┐   ┌───────────────┐   │     ┌───────────┐
//!   ──────────────────────┼─▶│  http  │──▶│  market  │──▶│ load_balancer │───┼────▶│ pgbouncer │──▶ read replicas
//!                         │  │ server │   │ fetcher  │   │ round robin   │   │     └───────────┘
//!                         │  └───┬────┘   └──────────┘   └───────────────┘   │
//!   GET /health           │      │        ┌──────────┐                       │
//!   ──────────────────────┼──────┴───────▶│  health  │───────────────────────┼────▶ primary, secondary1, secondary2
//!                         │               │  active  │    (direct, 3 at once)│
//!                         │               └──────────┘                       │
//!                         │                                                  │
//!                         │   config · lifecycle · resilience · observability│
//!                         └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use market_gateway::config::load_config;
use market_gateway::lifecycle::{signals, Gateway, Shutdown};
use market_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "market-gateway")]
#[command(about = "Market data gateway over replicated Postgres", long_about = None)]
struct Args {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init(&config.observability)?;
    tracing::info!("market-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        intermediary = %format!("{}:{}", config.database.host, config.database.port),
        read_replicas = ?config.replicas.read,
        write_replica = %config.replicas.write,
        health_hosts = ?config.health_check.hosts(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Pools first: no listener is bound unless every replica is reachable.
    let gateway = Gateway::start(config).await?;

    let listener = TcpListener::bind(&gateway.config().listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    gateway.serve(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
