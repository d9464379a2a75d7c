//! Per-host health result.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Outcome of probing one database host.
///
/// Built fresh for every check; `latency_ms` is present only when `up`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStatus {
    pub host: String,
    pub up: bool,
    pub latency_ms: Option<f64>,
}

impl NodeStatus {
    /// A reachable host with its round-trip time.
    pub fn up(host: impl Into<String>, latency: Duration) -> Self {
        Self {
            host: host.into(),
            up: true,
            latency_ms: Some(round_ms(latency)),
        }
    }

    /// An unreachable, failing or timed-out host.
    pub fn down(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            up: false,
            latency_ms: None,
        }
    }
}

/// Milliseconds rounded to two decimals.
fn round_ms(latency: Duration) -> f64 {
    (latency.as_nanos() as f64 / 10_000.0).round() / 100.0
}
