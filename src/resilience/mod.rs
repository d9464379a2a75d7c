//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Startup pool creation:
//!     → retries.rs (fixed attempts, fixed delay, last error surfaced)
//!
//! Health probe:
//!     → timeouts.rs (per-probe deadline, timeout kept distinct from failure)
//! ```
//!
//! # Design Decisions
//! - Every external call made by a probe has a deadline
//! - Retries exist only at startup; steady-state failures propagate
//! - No circuit breaking

pub mod retries;
pub mod timeouts;

pub use retries::{RetryError, RetryPolicy};
pub use timeouts::{with_deadline, Deadline};
