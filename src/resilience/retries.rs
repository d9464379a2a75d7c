//! Retry logic.
//!
//! # Responsibilities
//! - Run a fallible async operation up to a fixed number of attempts
//! - Sleep a fixed delay between failed attempts
//! - Surface the last error once attempts are exhausted
//!
//! # Design Decisions
//! - Only used during startup; request handling never retries
//! - Delay is constant, not exponential: attempts are few and startup is one-shot
//! - No delay after the final attempt

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::config::StartupConfig;

/// Bounded retry with a constant delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Pause after each failed attempt except the last.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Run `op` until it succeeds or the attempts run out.
    ///
    /// `op` receives the 1-based attempt number. `label` names the operation
    /// in log events.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, RetryError<E>>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) if attempt >= self.max_attempts => {
                    tracing::error!(
                        operation = %label,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %error,
                        "Giving up after final attempt"
                    );
                    return Err(RetryError {
                        attempts: attempt,
                        last_error: error,
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        operation = %label,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay = ?self.delay,
                        error = %error,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl From<&StartupConfig> for RetryPolicy {
    fn from(config: &StartupConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_secs(config.retry_delay_secs))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&StartupConfig::default())
    }
}

/// All attempts failed.
#[derive(Debug)]
pub struct RetryError<E> {
    pub attempts: u32,
    pub last_error: E,
}
