//! Retry policy with exponential backoff
//!
//! The delay before retry `n` (0-based attempt that just failed) is
//! `base_delay * 2^n`: 1s, 2s, 4s, ... for the default 1s base. No delay
//! follows the final attempt.
//!
//! Sleeping goes through `tokio::time`, so tests run under a paused clock.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Default attempt budget for model calls
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base backoff delay in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Cap for a single backoff sleep
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// How many times to try and how long to wait between tries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_RETRIES,
            Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        )
    }
}

/// Result of running an operation under a policy
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    /// Number of times the operation was invoked
    pub attempts: u32,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Single attempt, no backoff
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Backoff after the 0-based `attempt` failed
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(MAX_BACKOFF)
            .min(MAX_BACKOFF)
    }

    /// Run `op` until it succeeds, the budget is spent, or `is_retryable`
    /// rejects an error. `op` receives the 0-based attempt number.
    pub async fn run<T, E, F, Fut, R>(&self, mut op: F, is_retryable: R) -> RetryOutcome<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        loop {
            match op(attempt).await {
                Ok(value) => {
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: attempt + 1,
                    }
                }
                Err(err) => {
                    let last = attempt + 1 >= self.max_attempts;
                    if last || !is_retryable(&err) {
                        return RetryOutcome {
                            result: Err(err),
                            attempts: attempt + 1,
                        };
                    }

                    let delay = self.delay_for(attempt);
                    warn!(
                        "Attempt {} of {} failed: {}; retrying in {:?}",
                        attempt + 1,
                        self.max_attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
