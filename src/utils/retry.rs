use crate::error::{ErrorCode, ExtractionError};
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

/// Attempt budget and backoff for one class of calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each further retry
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// A policy that makes exactly one attempt
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay to wait after the failure of attempt `attempt_index` (0-based)
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt_index.min(16));
        self.initial_delay.saturating_mul(factor)
    }
}

/// Run `operation` until it succeeds, the error is permanent, or the budget is spent.
///
/// `NoRecipeFound` and `ValidationError` are returned immediately. A
/// `ParsingError` is retried once; a second one is returned as is.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, ExtractionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ExtractionError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut parsing_failures = 0u32;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_retryable() {
            debug!("Not retrying {} error: {}", err.code, err.message);
            return Err(err);
        }

        if err.code == ErrorCode::ParsingError {
            parsing_failures += 1;
            if parsing_failures > 1 {
                debug!("Parsing failed twice, giving up: {}", err.message);
                return Err(err);
            }
        }

        if attempt >= max_attempts {
            warn!(
                "Giving up after {} attempt(s): {} ({})",
                attempt, err.message, err.code
            );
            return Err(err);
        }

        let delay = policy.delay_for(attempt - 1);
        warn!(
            "Attempt {}/{} failed: {} ({}), retrying in {:?}",
            attempt, max_attempts, err.message, err.code, delay
        );
        tokio::time::sleep(delay).await;
    }
}
