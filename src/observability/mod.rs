//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (replica, host, attempt, error) on every event
//! - Request ID flows from the HTTP layer into request spans
//! - Metrics are cheap and silently dropped when no exporter is installed

pub mod logging;
pub mod metrics;
