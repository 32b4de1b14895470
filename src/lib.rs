//! # Grocer API Rust Client
//!
//! A managed access layer for an online grocery store's HTTP API. It turns
//! typed intents ("get customer info", "fetch page N of orders") and ad-hoc
//! debug requests into authenticated, rate-limited, validated HTTP calls,
//! and turns raw responses into typed results or a uniform error taxonomy.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Local input validation that never spends request budget ([`validation`])
//! - Bearer-token injection, and invalidation on 401/403 ([`auth`])
//! - A sliding-log [`RateLimiter`] shared by every request
//! - Exponential backoff with jitter for idempotent reads ([`RetryPolicy`])
//! - Pagination over the order history
//! - A never-failing debug executor returning a [`ResponseEnvelope`]
//! - Serde models for every request and response body ([`models`])
//!
//! ## Quick Start
//!
//! ```rust
//! use grocer_api::{BaseUrl, ClientConfig};
//! use std::time::Duration;
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://shop.example.com/api/v1/").unwrap())
//!     .rate_limit(60, Duration::from_secs(60))
//!     .timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use grocer_api::{ApiClient, ApiError};
//! use grocer_api::auth::InMemoryCredentialStore;
//! use std::sync::Arc;
//!
//! let client = ApiClient::new(&config, Arc::new(InMemoryCredentialStore::new()))?;
//! client.save_credential(&token, "cust-1234")?;
//!
//! match client.get_all_orders("cust-1234").await {
//!     Ok(orders) => println!("{} orders", orders.len()),
//!     Err(e) if e.is_auth_error() => println!("Token rejected, please sign in again"),
//!     Err(e) => println!("Failed ({:?}): {}", e.http_code(), e),
//! }
//! ```
//!
//! ## Debug Requests
//!
//! ```rust,ignore
//! use grocer_api::HttpMethod;
//!
//! let envelope = client
//!     .execute_debug(HttpMethod::Get, "customers/cust-1234/cart/", Vec::new(), None)
//!     .await;
//! println!("{} after {} ms", envelope.status_code, envelope.duration_ms);
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration, rate limiter, credential store and
//!   transport are passed in explicitly
//! - **Fail-fast validation**: malformed input is rejected before any
//!   network call
//! - **Thread-safe**: all client types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime
//! - **No token leaks**: tokens are masked in `Debug` output, logs and debug
//!   envelopes

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, ClientConfig, ClientConfigBuilder};
pub use error::ConfigError;

// Re-export client types
pub use clients::{
    ApiClient, ApiError, HttpClient, HttpMethod, HttpRequest, HttpResponse, RateLimiter,
    ResponseEnvelope, RetryPolicy,
};
pub use validation::{RecommendationType, ValidationOutcome};
