//! Configuration error types for the Grocer API client.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that a
//! misconfigured client fails at construction time rather than on its first
//! request.
//!
//! # Example
//!
//! ```rust
//! use grocer_api::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while building a client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide an http(s) URL (e.g., 'https://shop.example.com/api/v1/').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A numeric or duration setting is out of its allowed range.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The underlying HTTP transport could not be created.
    #[error("Failed to create HTTP transport: {reason}")]
    HttpClientBuild {
        /// The transport's own error message.
        reason: String,
    },
}
