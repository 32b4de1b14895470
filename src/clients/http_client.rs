//! HTTP transport for the Grocer API.
//!
//! This module provides the [`HttpClient`] type, which sends one
//! [`HttpRequest`] through the shared pipeline:
//!
//! 1. verify the request descriptor
//! 2. wait for a [`RateLimiter`] slot
//! 3. attach the bearer token via the [`TokenGate`]
//! 4. send it and let the token gate observe the status (clearing the
//!    credential on 401/403)
//! 5. read the whole body
//!
//! Non-2xx statuses are returned as ordinary [`HttpResponse`] values; typed
//! endpoints classify them afterwards. Retrying is not done here; see
//! [`RetryPolicy`](crate::clients::RetryPolicy).

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::auth::TokenGate;
use crate::clients::errors::ApiError;
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::{HeaderMap, HttpResponse};
use crate::clients::rate_limiter::RateLimiter;
use crate::config::{BaseUrl, ClientConfig};
use crate::error::ConfigError;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

const JSON_CONTENT_TYPE: &str = "application/json";

/// The outcome of one dispatch, including the headers that were sent.
///
/// `request_headers` holds the raw `Authorization` value; redact it before
/// showing it to anyone. `network_time` covers only the network exchange,
/// never the rate-limit wait, and is `None` if nothing was sent.
#[derive(Debug)]
pub(crate) struct Dispatch {
    pub(crate) request_headers: Vec<(String, String)>,
    pub(crate) network_time: Option<Duration>,
    pub(crate) result: Result<HttpResponse, ApiError>,
}

/// HTTP client for making requests to the Grocer API.
///
/// The client owns:
/// - a `reqwest` transport configured with the connect and request timeouts
/// - the base URL every request path is resolved against
/// - the default `User-Agent` and `Accept` headers
/// - the shared [`RateLimiter`] and [`TokenGate`]
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use grocer_api::auth::{InMemoryCredentialStore, TokenGate};
/// use grocer_api::clients::{HttpClient, HttpMethod, HttpRequest, RateLimiter};
/// use std::sync::Arc;
///
/// let limiter = Arc::new(RateLimiter::new(config.rate_limit_capacity(), config.rate_limit_window()));
/// let gate = TokenGate::new(Arc::new(InMemoryCredentialStore::new()));
/// let client = HttpClient::new(&config, limiter, gate)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "customers/abcd/").build()?;
/// let response = client.send(request, &CancellationToken::new()).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL that request paths are joined onto.
    base_url: BaseUrl,
    /// Headers sent with every request, in order.
    default_headers: Vec<(String, String)>,
    rate_limiter: Arc<RateLimiter>,
    token_gate: TokenGate,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientBuild`] if the underlying transport
    /// cannot be created (e.g. TLS initialization failure).
    pub fn new(
        config: &ClientConfig,
        rate_limiter: Arc<RateLimiter>,
        token_gate: TokenGate,
    ) -> Result<Self, ConfigError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Grocer API Library v{SDK_VERSION} | Rust {rust_version}");

        let default_headers = vec![
            ("User-Agent".to_string(), user_agent),
            ("Accept".to_string(), JSON_CONTENT_TYPE.to_string()),
        ];

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::HttpClientBuild {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            default_headers,
            rate_limiter,
            token_gate,
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the headers sent with every request.
    #[must_use]
    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    /// Returns the shared rate limiter.
    #[must_use]
    pub const fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.rate_limiter
    }

    /// Returns the token gate.
    #[must_use]
    pub const fn token_gate(&self) -> &TokenGate {
        &self.token_gate
    }

    /// Sends a request through the rate limiter and token gate.
    ///
    /// Any status code, including 4xx and 5xx, is returned as `Ok`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidRequest`] if the request fails verification
    ///   (nothing is acquired or sent)
    /// - [`ApiError::Cancelled`] if `cancel` fires while waiting or in flight
    /// - [`ApiError::Network`] on connection failure, timeout, or an
    ///   unreadable body
    pub async fn send(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, ApiError> {
        self.dispatch(request, cancel).await.result
    }

    pub(crate) async fn dispatch(&self, request: HttpRequest, cancel: &CancellationToken) -> Dispatch {
        if let Err(e) = request.verify() {
            return Dispatch {
                request_headers: self.merged_headers(&request),
                network_time: None,
                result: Err(e.into()),
            };
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Dispatch {
                    request_headers: self.merged_headers(&request),
                    network_time: None,
                    result: Err(ApiError::Cancelled),
                };
            }
            () = self.rate_limiter.acquire() => {}
        }

        let request = self.token_gate.attach(request);
        let request_headers = self.merged_headers(&request);

        let started = Instant::now();
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ApiError::Cancelled),
            result = self.execute(&request, &request_headers) => result,
        };

        Dispatch {
            request_headers,
            network_time: Some(started.elapsed()),
            result,
        }
    }

    async fn execute(
        &self,
        request: &HttpRequest,
        headers: &[(String, String)],
    ) -> Result<HttpResponse, ApiError> {
        let url = self.base_url.join(&request.path);

        let mut builder = self
            .client
            .request(request.http_method.to_reqwest(), &url);
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        tracing::debug!(method = %request.http_method, path = %request.path, "sending request");
        let started = Instant::now();

        let res = builder.send().await?;
        let code = res.status().as_u16();
        // Before the body read, so a 401 whose body never arrives still revokes.
        self.token_gate.observe(code);
        let res_headers = HeaderMap::from_reqwest(res.headers());
        let body = res.text().await?;

        tracing::debug!(
            method = %request.http_method,
            path = %request.path,
            status = code,
            elapsed_ms = started.elapsed().as_millis(),
            "received response"
        );

        Ok(HttpResponse::new(code, res_headers, Some(body)))
    }

    /// Default headers, then `Content-Type` when there is a body, then the
    /// request's own headers, later entries replacing earlier ones by name.
    fn merged_headers(&self, request: &HttpRequest) -> Vec<(String, String)> {
        let mut headers = self.default_headers.clone();
        if request.body.is_some() {
            headers.push(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));
        }
        for (key, value) in &request.extra_headers {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(key));
            headers.push((key.clone(), value.clone()));
        }
        headers
    }
}
