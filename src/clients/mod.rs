//! Request dispatch for the Grocer API.
//!
//! This module turns typed or ad-hoc intents into authenticated,
//! rate-limited HTTP calls, and raw responses into typed results or
//! [`ApiError`]s.
//!
//! # Overview
//!
//! - [`ApiClient`]: Typed endpoints, pagination and the debug executor
//! - [`HttpClient`]: The transport pipeline shared by every request
//! - [`HttpRequest`] / [`HttpMethod`]: A request descriptor and its method
//! - [`HttpResponse`]: A raw response with case-insensitive headers
//! - [`RateLimiter`]: Sliding-log request budget
//! - [`RetryPolicy`]: Exponential backoff for idempotent requests
//! - [`ResponseEnvelope`]: The never-failing result of a debug request
//! - [`walk_pages`]: Aggregation over paged endpoints
//!
//! # Pipeline
//!
//! ```text
//! validate ─▶ RateLimiter::acquire ─▶ TokenGate::attach ─▶ send ─▶ TokenGate::observe ─▶ classify / decode
//! ```
//!
//! Validation failures never reach the rate limiter. A 401 or 403 clears the
//! stored credential before the error is returned.
//!
//! # Retry Behavior
//!
//! - **GET endpoints**: retried on network errors, timeouts and 5xx, with
//!   exponential backoff and jitter
//! - **Cart and warehouse PUTs**: sent exactly once
//! - **Debug requests**: sent exactly once

mod api_client;
mod debug;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod pagination;
mod rate_limiter;
mod retry;

pub use api_client::ApiClient;
pub use debug::{ResponseEnvelope, NO_RESPONSE_STATUS};
pub use errors::{ApiError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{HeaderMap, HttpResponse};
pub use pagination::{walk_pages, Paginated, MAX_PAGES};
pub use rate_limiter::RateLimiter;
pub use retry::RetryPolicy;
