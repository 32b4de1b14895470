//! Retry with exponential backoff for idempotent requests.
//!
//! [`RetryPolicy::run`] repeats an operation while it fails with a transient
//! error ([`ApiError::is_transient`]): a network failure, a timeout, or a 5xx
//! response. Everything else (validation, auth, other 4xx, decode errors,
//! cancellation) is returned after the first attempt.
//!
//! The delay before attempt `n + 1` is `base * 2^(n - 1)` plus a random
//! jitter below half of that, capped at `max_delay`. Because the jitter is
//! bounded by half the raw delay, successive delays strictly increase until
//! the cap is reached.
//!
//! # Example
//!
//! ```rust,ignore
//! use grocer_api::clients::RetryPolicy;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! let policy = RetryPolicy::new(3, Duration::from_millis(500), Duration::from_secs(10));
//! let cart = policy
//!     .run(&CancellationToken::new(), || client.replace_cart("abcd", &update))
//!     .await?;
//! ```

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::clients::errors::ApiError;
use crate::config::{
    ClientConfig, DEFAULT_RETRY_BASE_DELAY, DEFAULT_RETRY_MAX_ATTEMPTS, DEFAULT_RETRY_MAX_DELAY,
};

/// Exponential backoff settings for transient failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_RETRY_MAX_ATTEMPTS,
            DEFAULT_RETRY_BASE_DELAY,
            DEFAULT_RETRY_MAX_DELAY,
        )
    }
}

impl RetryPolicy {
    /// Creates a policy with jitter enabled.
    ///
    /// `max_attempts` counts the first try and is raised to at least 1;
    /// `max_delay` is raised to at least `base_delay`.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: max_delay.max(base_delay),
            jitter: true,
        }
    }

    /// A policy that makes exactly one attempt.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: false,
        }
    }

    /// Builds the policy described by a client configuration.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.retry_max_attempts(),
            config.retry_base_delay(),
            config.retry_max_delay(),
        )
    }

    /// Enables or disables the random jitter component.
    #[must_use]
    pub const fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Returns the maximum number of attempts, first try included.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the delay before the first retry, without jitter.
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Returns the cap on any single delay.
    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Returns the delay to wait after `failed_attempts` failures.
    ///
    /// `backoff_delay(1)` is the wait between the first and second attempts.
    #[must_use]
    pub fn backoff_delay(&self, failed_attempts: u32) -> Duration {
        let exponent = failed_attempts.saturating_sub(1).min(31);
        let raw = self.base_delay.saturating_mul(1_u32 << exponent);

        let jitter = if self.jitter {
            let half = u64::try_from((raw / 2).as_nanos()).unwrap_or(u64::MAX);
            if half == 0 {
                Duration::ZERO
            } else {
                Duration::from_nanos(rand::thread_rng().gen_range(0..half))
            }
        } else {
            Duration::ZERO
        };

        raw.saturating_add(jitter).min(self.max_delay)
    }

    /// Runs `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// Cancellation is checked before every attempt and while sleeping
    /// between attempts.
    ///
    /// # Errors
    ///
    /// Returns the last error from `op`, or [`ApiError::Cancelled`] if
    /// `cancel` fires first.
    pub async fn run<T, F, Fut>(&self, cancel: &CancellationToken, mut op: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(ApiError::Cancelled);
            }
            attempt += 1;

            let error = match op().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !error.is_transient() {
                return Err(error);
            }
            if attempt >= self.max_attempts {
                if self.max_attempts > 1 {
                    tracing::warn!(attempts = attempt, error = %error, "giving up after retries");
                }
                return Err(error);
            }

            let delay = self.backoff_delay(attempt);
            tracing::debug!(
                attempt,
                delay_ms = delay.as_millis(),
                error = %error,
                "transient failure, retrying"
            );

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ApiError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
        }
    }
}
