//! Validated newtype wrappers for configuration values.

use crate::error::ConfigError;
use std::fmt;

/// A validated base URL for the store API.
///
/// The URL must use the `http` or `https` scheme and carry a host. It is
/// normalized to end with exactly one `/` so relative endpoint paths such as
/// `customers/42/` can be appended directly.
///
/// # Example
///
/// ```rust
/// use grocer_api::BaseUrl;
///
/// let url = BaseUrl::new("https://shop.example.com/api/v1").unwrap();
/// assert_eq!(url.as_ref(), "https://shop.example.com/api/v1/");
/// assert_eq!(url.host_name(), "shop.example.com");
/// assert_eq!(url.join("customers/42/"), "https://shop.example.com/api/v1/customers/42/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the scheme is not `http`
    /// or `https`, the host is empty, or the URL carries a query or fragment.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim();
        let invalid = || ConfigError::InvalidBaseUrl {
            url: trimmed.to_string(),
        };

        let scheme_end = trimmed.find("://").ok_or_else(invalid)?;
        let scheme = trimmed[..scheme_end].to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(invalid());
        }
        if trimmed.contains(['?', '#']) {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        let remainder = &trimmed[host_start..];
        let host_end = remainder
            .find([':', '/'])
            .map_or(trimmed.len(), |i| host_start + i);
        if host_end == host_start {
            return Err(invalid());
        }

        let normalized = format!("{}/", trimmed.trim_end_matches('/'));

        Ok(Self {
            url: normalized,
            host_start,
            host_end,
        })
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Appends a relative endpoint path to this base URL.
    ///
    /// Leading slashes on `path` are ignored so the base path is never
    /// replaced.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.url, path.trim_start_matches('/'))
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
