//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap an async operation with a deadline
//! - Keep timeouts distinct from the operation's own errors
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; dropping the future cancels the work
//! - Each caller owns its deadline, nothing is cancelled globally

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Outcome of a deadline-bounded operation that did not succeed.
#[derive(Debug, Error)]
pub enum Deadline<E> {
    #[error("timed out after {0:?}")]
    Elapsed(Duration),

    #[error(transparent)]
    Failed(E),
}

/// Run `fut` with a deadline of `limit`.
pub async fn with_deadline<T, E, Fut>(limit: Duration, fut: Fut) -> Result<T, Deadline<E>>
where
    Fut: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(Deadline::Failed(e)),
        Err(_) => Err(Deadline::Elapsed(limit)),
    }
}
