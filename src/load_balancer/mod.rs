//! Read/write replica pools and read dispatch.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     GatewayConfig → replica.rs (one descriptor per replica)
//!     → pool.rs (create each pool, bounded retry, abort on exhaustion)
//!     → PoolRegistry (fully populated or not at all)
//!
//! Read request:
//!     → pool.rs next_read_pool()
//!     → round_robin.rs (atomic cyclic advance)
//!     → caller acquires a connection from the selected pool
//! ```
//!
//! # Design Decisions
//! - Selection is purely cyclic; replica health does not affect it
//! - The registry is an explicit object shared via Arc, never a global
//! - Pools are created once at startup and closed once at shutdown

pub mod pool;
pub mod replica;
pub mod round_robin;

pub use pool::{PgPoolFactory, PgPoolRegistry, PoolFactory, PoolInitError, PoolRegistry, ReplicaPool};
pub use replica::{ReplicaDescriptor, ReplicaRole};
pub use round_robin::RoundRobin;
