//! Composable retry policy.
//!
//! One explicit policy object replaces ad hoc wrap-with-retry: the
//! caller supplies a failure classification and the policy decides
//! whether another attempt happens. The summarizer runs it with three
//! attempts and linear backoff; the fetcher holds a single-attempt
//! policy because pages are never retried individually.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Classification of a failure for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Failure may be transient; another attempt is worthwhile.
    ///
    /// Examples: rate limiting, temporary unavailability
    Retryable,

    /// Failure is permanent; retrying cannot help.
    ///
    /// Examples: exhausted quota, invalid input, auth failure
    NonRetryable,
}

/// Bounded retry with linearly increasing backoff.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// A policy with the given attempt budget and base delay.
    ///
    /// The wait before attempt `n + 1` is `base_delay * n`.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// A single-attempt policy: every failure is final.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds, a failure classifies as
    /// [`FailureKind::NonRetryable`], or the attempt budget runs out.
    /// The last error is returned unchanged in either failure case.
    pub async fn run<T, E, F, Fut, C>(&self, classify: C, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: Fn(&E) -> FailureKind,
        E: std::fmt::Display,
    {
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if classify(&error) == FailureKind::NonRetryable {
                        return Err(error);
                    }
                    if attempt >= self.max_attempts {
                        warn!(attempts = attempt, "Retry budget exhausted");
                        return Err(error);
                    }
                    let wait = self.base_delay * attempt;
                    warn!(
                        error = %error,
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        wait_ms = wait.as_millis(),
                        "Retryable failure, backing off"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
            }
        }
    }
}
