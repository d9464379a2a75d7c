//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by endpoint, status
//! - `gateway_request_duration_seconds` (histogram): latency by endpoint
//! - `gateway_read_dispatch_total` (counter): reads routed to each replica
//! - `gateway_node_up` (gauge): 1=up, 0=down, per probed host
//! - `gateway_node_latency_ms` (gauge): last probe round trip, per host
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime. Failure is logged, not fatal.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished HTTP request.
pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record that a read was dispatched to `replica`.
pub fn record_read_dispatch(replica: &str) {
    counter!("gateway_read_dispatch_total", "replica" => replica.to_string()).increment(1);
}

/// Record the outcome of one host probe.
pub fn record_node_health(host: &str, up: bool, latency_ms: Option<f64>) {
    gauge!("gateway_node_up", "host" => host.to_string()).set(if up { 1.0 } else { 0.0 });
    if let Some(latency) = latency_ms {
        gauge!("gateway_node_latency_ms", "host" => host.to_string()).set(latency);
    }
}
