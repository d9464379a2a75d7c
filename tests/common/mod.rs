//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

use market_gateway::config::GatewayConfig;
use market_gateway::lifecycle::{Gateway, Shutdown};
use market_gateway::load_balancer::PgPoolFactory;

/// A loopback port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Start a backend that accepts connections and never answers.
#[allow(dead_code)]
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        // Read and discard until the client gives up.
                        let mut buf = [0u8; 1024];
                        while let Ok(n) = socket.read(&mut buf).await {
                            if n == 0 {
                                break;
                            }
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Config pointing every database endpoint at `db_port` on loopback.
pub fn local_config(db_port: u16) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();

    config.database.host = "127.0.0.1".into();
    config.database.port = db_port;
    config.pool.min_connections = 0;
    config.pool.acquire_timeout_secs = 1;

    config.health_check.primary_host = "127.0.0.1".into();
    config.health_check.secondary1_host = "localhost".into();
    config.health_check.secondary2_host = "127.0.0.1".into();
    config.health_check.port = db_port;
    config.health_check.timeout_ms = 500;

    config.startup.retry_delay_secs = 0;
    config
}

/// Start a gateway whose pools connect lazily. Returns its address and the
/// shutdown handle that stops it.
pub async fn start_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let factory = PgPoolFactory::lazy(config.pool.clone());
    let gateway = Gateway::start_with(config, factory).await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = gateway.serve(listener, server_shutdown).await;
    });

    // Give the server a moment to start accepting.
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
