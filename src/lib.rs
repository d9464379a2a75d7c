//! Market data gateway library.
//!
//! Serves recent candles from a round-robin pool of read replicas and probes
//! the primary and secondary database hosts for liveness.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod market;
pub mod observability;
pub mod resilience;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::{Gateway, Shutdown};
