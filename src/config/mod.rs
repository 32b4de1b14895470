//! Configuration types for the Grocer API client.
//!
//! This module provides the configuration consumed by the request-dispatch
//! layer: where the API lives, how long transport operations may take, how
//! many requests may be sent per window, and how transient failures are
//! retried.
//!
//! # Overview
//!
//! - [`ClientConfig`]: The immutable configuration struct
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`BaseUrl`]: A validated API base URL
//!
//! # Example
//!
//! ```rust
//! use grocer_api::{BaseUrl, ClientConfig};
//! use std::time::Duration;
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://shop.example.com/api/v1/").unwrap())
//!     .rate_limit(60, Duration::from_secs(60))
//!     .retry_max_attempts(3)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.rate_limit_capacity(), 60);
//! ```

mod newtypes;

pub use newtypes::BaseUrl;

use std::time::Duration;

use crate::error::ConfigError;

/// Default connect, read and write timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of requests admitted per rate-limit window.
pub const DEFAULT_RATE_LIMIT_CAPACITY: u32 = 60;

/// Default rate-limit window length.
pub const DEFAULT_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Default number of attempts for idempotent requests (first try included).
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Default upper bound for a single retry delay.
pub const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(10);

/// Configuration for the request-dispatch layer.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
///
/// # Example
///
/// ```rust
/// use grocer_api::{BaseUrl, ClientConfig};
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://shop.example.com/api/v1/").unwrap())
///     .user_agent_prefix("GroceryApp/2.1")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.user_agent_prefix(), Some("GroceryApp/2.1"));
/// ```
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: BaseUrl,
    connect_timeout: Duration,
    read_timeout: Duration,
    write_timeout: Duration,
    rate_limit_capacity: u32,
    rate_limit_window: Duration,
    retry_max_attempts: u32,
    retry_base_delay: Duration,
    retry_max_delay: Duration,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the TCP connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the read timeout.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Returns the write timeout.
    #[must_use]
    pub const fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    /// Returns the total per-request timeout handed to the transport.
    ///
    /// The transport only supports a connect timeout and a whole-request
    /// timeout, so the larger of the read and write timeouts bounds the
    /// whole exchange.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.read_timeout.max(self.write_timeout)
    }

    /// Returns the number of requests admitted per window.
    #[must_use]
    pub const fn rate_limit_capacity(&self) -> u32 {
        self.rate_limit_capacity
    }

    /// Returns the rolling window length.
    #[must_use]
    pub const fn rate_limit_window(&self) -> Duration {
        self.rate_limit_window
    }

    /// Returns the maximum number of attempts for idempotent requests.
    #[must_use]
    pub const fn retry_max_attempts(&self) -> u32 {
        self.retry_max_attempts
    }

    /// Returns the delay before the first retry.
    #[must_use]
    pub const fn retry_base_delay(&self) -> Duration {
        self.retry_base_delay
    }

    /// Returns the upper bound for a single retry delay.
    #[must_use]
    pub const fn retry_max_delay(&self) -> Duration {
        self.retry_max_delay
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// `base_url` is required. Everything else has a default:
///
/// - timeouts: 30 seconds each
/// - rate limit: 60 requests per 60 seconds
/// - retries: 3 attempts, 500 ms base delay, 10 s max delay
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<BaseUrl>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    rate_limit_capacity: Option<u32>,
    rate_limit_window: Option<Duration>,
    retry_max_attempts: Option<u32>,
    retry_base_delay: Option<Duration>,
    retry_max_delay: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the connect, read and write timeouts to the same value.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self.read_timeout = Some(timeout);
        self.write_timeout = Some(timeout);
        self
    }

    /// Sets the TCP connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the read timeout.
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Sets the write timeout.
    #[must_use]
    pub const fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    /// Sets the rate limit: at most `capacity` requests per `window`.
    #[must_use]
    pub const fn rate_limit(mut self, capacity: u32, window: Duration) -> Self {
        self.rate_limit_capacity = Some(capacity);
        self.rate_limit_window = Some(window);
        self
    }

    /// Sets the maximum number of attempts for idempotent requests.
    ///
    /// `1` disables automatic retries.
    #[must_use]
    pub const fn retry_max_attempts(mut self, attempts: u32) -> Self {
        self.retry_max_attempts = Some(attempts);
        self
    }

    /// Sets the backoff delays used between retry attempts.
    #[must_use]
    pub const fn retry_backoff(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.retry_base_delay = Some(base_delay);
        self.retry_max_delay = Some(max_delay);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`], validating every setting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set
    /// and [`ConfigError::InvalidValue`] if the rate-limit capacity or retry
    /// attempt count is zero, the window is zero, or the base delay exceeds
    /// the max delay.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        let rate_limit_capacity = self
            .rate_limit_capacity
            .unwrap_or(DEFAULT_RATE_LIMIT_CAPACITY);
        if rate_limit_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "rate_limit_capacity",
                reason: "must be at least 1".to_string(),
            });
        }

        let rate_limit_window = self.rate_limit_window.unwrap_or(DEFAULT_RATE_LIMIT_WINDOW);
        if rate_limit_window.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "rate_limit_window",
                reason: "must be longer than zero".to_string(),
            });
        }

        let retry_max_attempts = self
            .retry_max_attempts
            .unwrap_or(DEFAULT_RETRY_MAX_ATTEMPTS);
        if retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry_max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }

        let retry_base_delay = self.retry_base_delay.unwrap_or(DEFAULT_RETRY_BASE_DELAY);
        let retry_max_delay = self.retry_max_delay.unwrap_or(DEFAULT_RETRY_MAX_DELAY);
        if retry_base_delay > retry_max_delay {
            return Err(ConfigError::InvalidValue {
                field: "retry_base_delay",
                reason: format!(
                    "base delay ({retry_base_delay:?}) cannot exceed max delay ({retry_max_delay:?})"
                ),
            });
        }

        Ok(ClientConfig {
            base_url,
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_TIMEOUT),
            read_timeout: self.read_timeout.unwrap_or(DEFAULT_TIMEOUT),
            write_timeout: self.write_timeout.unwrap_or(DEFAULT_TIMEOUT),
            rate_limit_capacity,
            rate_limit_window,
            retry_max_attempts,
            retry_base_delay,
            retry_max_delay,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> BaseUrl {
        BaseUrl::new("https://shop.example.com/api/v1/").unwrap()
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientConfigBuilder::new().build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "base_url" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ClientConfig::builder().base_url(base_url()).build().unwrap();

        assert_eq!(config.connect_timeout(), Duration::from_secs(30));
        assert_eq!(config.read_timeout(), Duration::from_secs(30));
        assert_eq!(config.write_timeout(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.rate_limit_capacity(), 60);
        assert_eq!(config.rate_limit_window(), Duration::from_secs(60));
        assert_eq!(config.retry_max_attempts(), 3);
        assert_eq!(config.retry_base_delay(), Duration::from_millis(500));
        assert_eq!(config.retry_max_delay(), Duration::from_secs(10));
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_builder_rejects_zero_capacity() {
        let result = ClientConfig::builder()
            .base_url(base_url())
            .rate_limit(0, Duration::from_secs(1))
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "rate_limit_capacity",
                ..
            })
        ));
    }

    #[test]
    fn test_builder_rejects_zero_window() {
        let result = ClientConfig::builder()
            .base_url(base_url())
            .rate_limit(10, Duration::ZERO)
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "rate_limit_window",
                ..
            })
        ));
    }

    #[test]
    fn test_builder_rejects_zero_attempts() {
        let result = ClientConfig::builder()
            .base_url(base_url())
            .retry_max_attempts(0)
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "retry_max_attempts",
                ..
            })
        ));
    }

    #[test]
    fn test_builder_rejects_base_delay_above_max() {
        let result = ClientConfig::builder()
            .base_url(base_url())
            .retry_backoff(Duration::from_secs(5), Duration::from_secs(1))
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "retry_base_delay",
                ..
            })
        ));
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = ClientConfig::builder()
            .base_url(base_url())
            .connect_timeout(Duration::from_secs(5))
            .read_timeout(Duration::from_secs(10))
            .write_timeout(Duration::from_secs(15))
            .rate_limit(2, Duration::from_millis(1000))
            .retry_max_attempts(5)
            .retry_backoff(Duration::from_millis(100), Duration::from_secs(2))
            .user_agent_prefix("GroceryApp/2.1")
            .build()
            .unwrap();

        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.rate_limit_capacity(), 2);
        assert_eq!(config.rate_limit_window(), Duration::from_millis(1000));
        assert_eq!(config.retry_max_attempts(), 5);
        assert_eq!(config.retry_base_delay(), Duration::from_millis(100));
        assert_eq!(config.retry_max_delay(), Duration::from_secs(2));
        assert_eq!(config.user_agent_prefix(), Some("GroceryApp/2.1"));
    }

    #[test]
    fn test_timeout_sets_all_three() {
        let config = ClientConfig::builder()
            .base_url(base_url())
            .timeout(Duration::from_secs(7))
            .build()
            .unwrap();

        assert_eq!(config.connect_timeout(), Duration::from_secs(7));
        assert_eq!(config.read_timeout(), Duration::from_secs(7));
        assert_eq!(config.write_timeout(), Duration::from_secs(7));
        assert_eq!(config.request_timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientConfig>();
    }
}
