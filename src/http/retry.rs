//! Retry controller
//!
//! Re-issues an operation while it fails with a retryable error, sleeping
//! `base_delay * factor^attempt` between attempts. Fatal errors pass through
//! untouched; exhausting the budget wraps the last error in
//! [`Error::RetriesExhausted`].

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff and attempt budget for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Growth factor between consecutive delays
    pub factor: u32,
    /// Upper bound for a single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay: Duration::from_secs(1),
            factor: 4,
            max_delay: Duration::from_secs(300),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default factor of 4
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            ..Self::default()
        }
    }

    /// Policy that never retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set the maximum delay
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Set the maximum number of attempts
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Delay to wait after the given (zero-based) failed attempt
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = self.factor.saturating_pow(attempt);
        std::cmp::min(self.base_delay.saturating_mul(factor), self.max_delay)
    }
}

/// Value produced by a retried operation, with the attempts it took
#[derive(Debug)]
pub struct Retried<T> {
    /// The successful value
    pub value: T,
    /// Number of attempts made (1 = first try succeeded)
    pub attempts: u32,
    /// Delays slept before each retry, in order
    pub delays: Vec<Duration>,
}

/// Run `op` until it succeeds, fails fatally, or the budget runs out
///
/// `op` receives the zero-based attempt number.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<Retried<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut delays = Vec::new();
    let mut attempt = 0;

    loop {
        match op(attempt).await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempts = attempt + 1, "Request succeeded after retrying");
                }
                return Ok(Retried {
                    value,
                    attempts: attempt + 1,
                    delays,
                });
            }
            Err(e) if e.is_retryable() => {
                if attempt + 1 >= max_attempts {
                    return Err(Error::RetriesExhausted {
                        path: e.path().unwrap_or_default().to_string(),
                        attempts: attempt + 1,
                        last: Box::new(e),
                    });
                }

                let delay = policy.delay(attempt);
                warn!(
                    "{e}; attempt {}/{}, retrying in {:?}",
                    attempt + 1,
                    max_attempts,
                    delay
                );
                tokio::time::sleep(delay).await;
                delays.push(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
