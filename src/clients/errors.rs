//! Error types for the request-dispatch layer.
//!
//! Typed endpoints return a single error type, [`ApiError`], carrying a
//! human-readable message and, where one exists, an HTTP(-like) status code.
//! The debug path never returns an error; see
//! [`ResponseEnvelope`](crate::clients::ResponseEnvelope).
//!
//! # Taxonomy
//!
//! | Variant | Code | Retried | Notes |
//! |---|---|---|---|
//! | [`ApiError::Validation`] | 400 | no | raised before any network call |
//! | [`ApiError::Auth`] | 401/403 | no | stored credential already cleared |
//! | [`ApiError::Client`] | other 4xx, unexpected 1xx/3xx | no | |
//! | [`ApiError::Server`] | 5xx | yes | idempotent calls only |
//! | [`ApiError::Network`] | none | yes | connect failure, timeout, broken body |
//! | [`ApiError::Decode`] / [`ApiError::EmptyResponse`] | 2xx | no | contract violation |
//! | [`ApiError::InvalidRequest`] | none | no | malformed request descriptor |
//! | [`ApiError::Cancelled`] | none | no | caller cancelled |
//!
//! # Example
//!
//! ```rust,ignore
//! match client.get_customer("cust-1234").await {
//!     Ok(customer) => println!("Hello {:?}", customer.first_name),
//!     Err(e) if e.is_auth_error() => println!("Please sign in again"),
//!     Err(e) => println!("Request failed ({:?}): {}", e.http_code(), e),
//! }
//! ```

use thiserror::Error;

/// Error returned when a request descriptor fails verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The HTTP method is not one of the supported methods.
    #[error("Invalid Http method {method}.")]
    InvalidMethod {
        /// The invalid method that was provided.
        method: String,
    },

    /// The path is empty or not relative to the base URL.
    #[error("Invalid request path '{path}'. Paths must be relative to the API base URL.")]
    InvalidPath {
        /// The rejected path.
        path: String,
    },

    /// The request body could not be serialized.
    #[error("Cannot serialize request body: {reason}")]
    InvalidBody {
        /// Serializer error message.
        reason: String,
    },
}

/// Unified error type for typed API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input failed a local format check; nothing was sent.
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// The offending input field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The server rejected the credential (401 or 403).
    #[error("Authentication failed ({code}): {message}")]
    Auth {
        /// The HTTP status code.
        code: u16,
        /// Response body text.
        message: String,
    },

    /// Any other 4xx response.
    #[error("Request rejected ({code}): {message}")]
    Client {
        /// The HTTP status code.
        code: u16,
        /// Response body text.
        message: String,
    },

    /// A 5xx response.
    #[error("Server error ({code}): {message}")]
    Server {
        /// The HTTP status code.
        code: u16,
        /// Response body text.
        message: String,
    },

    /// Connection failure, timeout, or unreadable response.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A successful response whose body does not match the expected shape.
    #[error("Unexpected response body ({code}): {message}")]
    Decode {
        /// The HTTP status code.
        code: u16,
        /// Decoder error message.
        message: String,
    },

    /// A successful response without the expected body.
    #[error("empty response ({code})")]
    EmptyResponse {
        /// The HTTP status code.
        code: u16,
    },

    /// The request descriptor failed verification.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// The caller cancelled the operation.
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Classifies a non-2xx response into the matching variant.
    ///
    /// Redirects are followed by the transport, so a 1xx or 3xx status only
    /// arrives here when the server sent one the client cannot act on. Those
    /// become [`ApiError::Client`] with a message naming the unexpected
    /// status, and are never retried.
    #[must_use]
    pub fn from_status(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            401 | 403 => Self::Auth { code, message },
            500..=599 => Self::Server { code, message },
            100..=199 | 300..=399 => Self::Client {
                code,
                message: format!("unexpected {code} response: {message}"),
            },
            _ => Self::Client { code, message },
        }
    }

    /// Returns the HTTP(-like) status code, if this error has one.
    ///
    /// Validation errors report 400.
    #[must_use]
    pub fn http_code(&self) -> Option<u16> {
        match self {
            Self::Validation { .. } => Some(400),
            Self::Auth { code, .. }
            | Self::Client { code, .. }
            | Self::Server { code, .. }
            | Self::Decode { code, .. }
            | Self::EmptyResponse { code } => Some(*code),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidRequest(_) | Self::Cancelled => None,
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns `true` if retrying the same idempotent request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Server { .. } => true,
            Self::Network(e) => !e.is_builder(),
            _ => false,
        }
    }

    /// Returns `true` for 401/403 responses.
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        assert!(matches!(
            ApiError::from_status(401, ""),
            ApiError::Auth { code: 401, .. }
        ));
        assert!(matches!(
            ApiError::from_status(403, ""),
            ApiError::Auth { code: 403, .. }
        ));
        assert!(matches!(
            ApiError::from_status(404, ""),
            ApiError::Client { code: 404, .. }
        ));
        assert!(matches!(
            ApiError::from_status(429, ""),
            ApiError::Client { code: 429, .. }
        ));
        assert!(matches!(
            ApiError::from_status(503, ""),
            ApiError::Server { code: 503, .. }
        ));
    }

    #[test]
    fn test_informational_and_redirect_statuses_are_unexpected() {
        for code in [101, 301, 304] {
            let error = ApiError::from_status(code, "Not Modified");
            assert!(matches!(error, ApiError::Client { code: c, .. } if c == code));
            assert!(error.message().contains(&format!("unexpected {code} response")));
            assert!(!error.is_transient());
        }
    }

    #[test]
    fn test_http_code() {
        let error = ApiError::Validation {
            field: "customer_id",
            reason: "too short".to_string(),
        };
        assert_eq!(error.http_code(), Some(400));
        assert_eq!(ApiError::from_status(418, "teapot").http_code(), Some(418));
        assert_eq!(ApiError::EmptyResponse { code: 204 }.http_code(), Some(204));
        assert_eq!(ApiError::Cancelled.http_code(), None);
    }

    #[test]
    fn test_only_server_errors_are_transient() {
        assert!(ApiError::from_status(500, "").is_transient());
        assert!(ApiError::from_status(503, "").is_transient());
        assert!(!ApiError::from_status(400, "").is_transient());
        assert!(!ApiError::from_status(401, "").is_transient());
        assert!(!ApiError::from_status(404, "").is_transient());
        assert!(!ApiError::EmptyResponse { code: 200 }.is_transient());
        assert!(!ApiError::Cancelled.is_transient());
        assert!(!ApiError::Validation {
            field: "order_id",
            reason: String::new()
        }
        .is_transient());
    }

    #[test]
    fn test_messages_include_body_text() {
        let error = ApiError::from_status(422, r#"{"detail":"version mismatch"}"#);
        assert_eq!(
            error.message(),
            r#"Request rejected (422): {"detail":"version mismatch"}"#
        );
        assert_eq!(ApiError::EmptyResponse { code: 200 }.message(), "empty response (200)");
    }

    #[test]
    fn test_invalid_request_error_messages() {
        let error = InvalidHttpRequestError::InvalidMethod {
            method: "FETCH".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid Http method FETCH.");

        let error = InvalidHttpRequestError::InvalidPath {
            path: "https://evil.example.com/".to_string(),
        };
        assert!(error.to_string().contains("relative"));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let _: &dyn std::error::Error = &ApiError::Cancelled;
        let _: &dyn std::error::Error = &InvalidHttpRequestError::InvalidPath {
            path: String::new(),
        };
    }
}
