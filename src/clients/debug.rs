//! Schema-less request execution for diagnostic tools.
//!
//! [`ApiClient::execute_debug`] sends an arbitrary request through the same
//! rate limiter and token gate as the typed endpoints, but never fails: every
//! outcome, including transport errors and cancellation, is captured in a
//! [`ResponseEnvelope`]. Debug requests are not retried.
//!
//! # Example
//!
//! ```rust,ignore
//! use grocer_api::clients::HttpMethod;
//!
//! let envelope = client
//!     .execute_debug(HttpMethod::Get, "customers/abcd/cart/", Vec::new(), None)
//!     .await;
//!
//! println!("{} {} in {} ms", envelope.status_code, envelope.status_message, envelope.duration_ms);
//! if let Some(error) = &envelope.error {
//!     println!("failed: {error}");
//! }
//! ```

use std::time::{Duration, Instant};

use crate::auth::redact_header_value;
use crate::clients::api_client::ApiClient;
use crate::clients::errors::ApiError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HeaderMap;

/// Status code reported when no HTTP response was received.
pub const NO_RESPONSE_STATUS: i32 = -1;

/// Everything observed while executing one debug request.
#[derive(Clone, Debug)]
pub struct ResponseEnvelope {
    /// HTTP status, or [`NO_RESPONSE_STATUS`] if the request never completed.
    pub status_code: i32,
    /// Reason phrase for the status, or a short failure label.
    pub status_message: String,
    /// Headers that were sent, with the `Authorization` value masked.
    pub request_headers: Vec<(String, String)>,
    /// Response headers; empty when there was no response.
    pub headers: HeaderMap,
    /// Raw response body; always `None` when there was no response.
    pub body: Option<String>,
    /// Time from just before the request was sent until the response body
    /// was read. Rate-limit waits are not counted. When nothing was sent,
    /// the time until the failure was detected.
    pub duration_ms: u64,
    /// Failure description when there was no response.
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Returns `true` if a 2xx response was received.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code >= 200 && self.status_code <= 299
    }

    /// Returns the first response header named `name`, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns the first request header named `name`, ignoring case.
    #[must_use]
    pub fn request_header(&self, name: &str) -> Option<&str> {
        self.request_headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn failed(error: &ApiError, request_headers: Vec<(String, String)>, duration: Duration) -> Self {
        let status_message = match error {
            ApiError::Cancelled => "Cancelled",
            ApiError::InvalidRequest(_) => "Invalid request",
            _ => "Request failed",
        };
        Self {
            status_code: NO_RESPONSE_STATUS,
            status_message: status_message.to_string(),
            request_headers,
            headers: HeaderMap::new(),
            body: None,
            duration_ms: to_millis(duration),
            error: Some(error.message()),
        }
    }
}

impl ApiClient {
    /// Sends an arbitrary request and reports whatever happened.
    ///
    /// `path` is relative to the configured base URL. Non-2xx responses are
    /// reported with their status and body like any other response.
    pub async fn execute_debug(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<String>,
    ) -> ResponseEnvelope {
        let started = Instant::now();

        let mut builder = HttpRequest::builder(method, path).query(query);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let request = match builder.build() {
            Ok(request) => request,
            Err(e) => {
                return ResponseEnvelope::failed(&ApiError::from(e), Vec::new(), started.elapsed());
            }
        };

        let dispatch = self.http_client().dispatch(request, self.cancellation_token()).await;
        let duration = dispatch
            .network_time
            .unwrap_or_else(|| started.elapsed());
        let request_headers = dispatch
            .request_headers
            .into_iter()
            .map(|(name, value)| {
                let value = redact_header_value(&name, &value);
                (name, value)
            })
            .collect();

        match dispatch.result {
            Ok(response) => ResponseEnvelope {
                status_code: i32::from(response.code),
                status_message: response.status_message,
                request_headers,
                headers: response.headers,
                body: response.body,
                duration_ms: to_millis(duration),
                error: None,
            },
            Err(e) => {
                tracing::debug!(method = %method, path, error = %e, "debug request failed");
                ResponseEnvelope::failed(&e, request_headers, duration)
            }
        }
    }

    /// Like [`ApiClient::execute_debug`], parsing the method from text.
    ///
    /// An unknown method is reported in the envelope without sending anything.
    pub async fn execute_debug_str(
        &self,
        method: &str,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<String>,
    ) -> ResponseEnvelope {
        match method.parse::<HttpMethod>() {
            Ok(method) => self.execute_debug(method, path, query, body).await,
            Err(e) => ResponseEnvelope::failed(&ApiError::from(e), Vec::new(), Duration::ZERO),
        }
    }
}

fn to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
