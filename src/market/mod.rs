//! Market data access.
//!
//! # Data Flow
//! ```text
//! GET /data?limit=N
//!     → fetcher.rs (next read pool → acquire → SELECT ... LIMIT N)
//!     → record.rs (RawRow → DataRecord, open_time to ISO-8601)
//!     → {count, data}
//! ```

pub mod fetcher;
pub mod record;

pub use fetcher::{DataFetcher, FetchError};
pub use record::{open_time_to_iso, DataRecord, RawRow, MILLISECONDS_THRESHOLD};
