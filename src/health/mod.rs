//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health
//!     → active.rs check_all(hosts)
//!         → one probe per host, all in flight at once
//!         → each probe: direct connect + SELECT 1 under its own deadline
//!     → join: wait for every probe (or its timeout)
//!     → status.rs NodeStatus per host, in input order
//! ```
//!
//! # Design Decisions
//! - Probes bypass the replica pools and the intermediary entirely
//! - A failing host never fails the check as a whole; it is reported down
//! - No retries inside a single check

pub mod active;
pub mod status;

pub use active::{HealthAggregator, PgProbe, Probe};
pub use status::NodeStatus;
