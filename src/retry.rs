//! Retry Module
//!
//! Re-runs a fallible async operation a bounded number of times with a fixed
//! delay between attempts.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

/// Default number of attempts per call site
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default pause between two attempts
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

// == Retry Policy ==
/// Fixed-delay retry policy (no backoff, no jitter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Pause between two consecutive attempts
    pub delay: Duration,
}

impl RetryPolicy {
    // == Constructor ==
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    // == Run ==
    /// Runs `operation` until it succeeds or the attempts are exhausted.
    ///
    /// Each failure is logged with its attempt number. When every attempt
    /// fails, the error of the last attempt is returned. A policy with zero
    /// attempts still runs the operation once.
    ///
    /// The delay suspends the calling task, so a request handler using this
    /// is held for up to `(max_attempts - 1) * delay`.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < max_attempts => {
                    warn!("Retry attempt {}/{} failed: {}", attempt, max_attempts, err);
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if max_attempts > 1 {
                        warn!("Retry attempt {}/{} failed: {}", attempt, max_attempts, err);
                    }
                    error!("All retry attempts failed: {}", err);
                    return Err(err);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_DELAY)
    }
}
