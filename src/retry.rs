//! Bounded retry with backoff
//!
//! Operations report failures as values implementing [`Transient`]. The
//! [`RetryPolicy`] decides from that classification and the attempt count
//! whether another attempt is made, and how long to wait before it.
//!
//! # Example
//!
//! ```
//! use page_mirror::retry::{retry_with_backoff, Backoff, RetryPolicy, Transient};
//!
//! #[derive(Debug)]
//! struct Flaky;
//!
//! impl std::fmt::Display for Flaky {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         f.write_str("flaky")
//!     }
//! }
//!
//! impl Transient for Flaky {
//!     fn is_transient(&self) -> bool {
//!         true
//!     }
//! }
//!
//! # let runtime = tokio::runtime::Runtime::new().unwrap();
//! # runtime.block_on(async {
//! let policy = RetryPolicy::new(3, Backoff::None);
//! let outcome = retry_with_backoff(&policy, "example", |attempt| async move {
//!     if attempt < 2 { Err(Flaky) } else { Ok(attempt) }
//! })
//! .await;
//! assert_eq!(outcome.attempts, 2);
//! assert_eq!(outcome.result.unwrap(), 2);
//! # });
//! ```

use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Classification of an operation failure
pub trait Transient {
    /// True if the same operation may succeed when attempted again
    fn is_transient(&self) -> bool;
}

/// Delay inserted between two attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backoff {
    /// Retry immediately
    None,

    /// Always wait the same interval
    Fixed(Duration),

    /// Wait a uniformly random interval in `[min, max]`
    Jitter { min: Duration, max: Duration },
}

impl Backoff {
    /// Picks the delay before the next attempt
    pub fn delay(&self) -> Duration {
        match self {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(delay) => *delay,
            Backoff::Jitter { min, max } => {
                if max <= min {
                    return *min;
                }
                let min_ms = min.as_millis() as u64;
                let max_ms = max.as_millis() as u64;
                Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
            }
        }
    }
}

/// Decision on whether to retry a failed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Attempt again after `delay`; `attempt` is the number of the next attempt
    Retry { delay: Duration, attempt: u32 },

    /// Give up and surface the failure
    DoNotRetry { reason: &'static str },
}

/// Attempt budget and backoff for one kind of operation
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    max_attempts: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Decides what happens after `attempt` (1-indexed) failed with `error`
    pub fn should_retry<E: Transient>(&self, error: &E, attempt: u32) -> RetryDecision {
        if !error.is_transient() {
            return RetryDecision::DoNotRetry {
                reason: "permanent failure",
            };
        }

        if attempt >= self.max_attempts {
            return RetryDecision::DoNotRetry {
                reason: "attempts exhausted",
            };
        }

        RetryDecision::Retry {
            delay: self.backoff.delay(),
            attempt: attempt + 1,
        }
    }
}

/// Final result of a retried operation and the number of attempts it took
#[derive(Debug)]
pub struct Attempted<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
}

/// Runs `op` until it succeeds, fails permanently, or the budget is spent
///
/// `op` receives the 1-indexed attempt number. Every failed attempt is logged;
/// the last error is returned when no further attempt is made.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Attempted<T, E>
where
    E: Transient + Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;

    loop {
        let error = match op(attempt).await {
            Ok(value) => {
                return Attempted {
                    result: Ok(value),
                    attempts: attempt,
                }
            }
            Err(error) => error,
        };

        match policy.should_retry(&error, attempt) {
            RetryDecision::Retry {
                delay,
                attempt: next,
            } => {
                tracing::warn!(
                    operation = label,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "{} failed: {}; retrying",
                    label,
                    error
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt = next;
            }
            RetryDecision::DoNotRetry { reason } => {
                tracing::debug!(attempt, reason, "{} giving up: {}", label, error);
                return Attempted {
                    result: Err(error),
                    attempts: attempt,
                };
            }
        }
    }
}
