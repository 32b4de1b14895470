//! Typed endpoints of the Grocer API.
//!
//! [`ApiClient`] is the entry point most callers use. Each operation:
//!
//! 1. validates its inputs locally, failing with [`ApiError::Validation`]
//!    before any request budget is spent
//! 2. builds an [`HttpRequest`] and sends it through the shared
//!    [`HttpClient`] pipeline (rate limiter, token gate, transport)
//! 3. classifies non-2xx responses and decodes 2xx bodies into a model type
//!
//! Read operations are wrapped in the client's [`RetryPolicy`]; cart and
//! warehouse mutations are sent exactly once.
//!
//! # Example
//!
//! ```rust,ignore
//! use grocer_api::{ApiClient, BaseUrl, ClientConfig};
//! use grocer_api::auth::InMemoryCredentialStore;
//! use std::sync::Arc;
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://shop.example.com/api/v1/")?)
//!     .build()?;
//! let client = ApiClient::new(&config, Arc::new(InMemoryCredentialStore::new()))?;
//!
//! client.save_credential(token, "cust-1234")?;
//! let cart = client.get_cart("cust-1234").await?;
//! let cart = client.replace_cart("cust-1234", &cart.to_update().set_quantity(42, 2)).await?;
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::auth::{Credential, CredentialStore, TokenGate};
use crate::clients::errors::ApiError;
use crate::clients::http_client::HttpClient;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::rate_limiter::RateLimiter;
use crate::clients::retry::RetryPolicy;
use crate::config::ClientConfig;
use crate::error::ConfigError;
use crate::models::{
    Cart, CartUpdate, Customer, OrderLines, OrdersPage, Recommendations, WarehouseChange,
    WarehouseChangeRequest,
};
use crate::validation::{
    validate_customer_id, validate_order_id, validate_postal_code, validate_recommendation_type,
    validate_token, RecommendationType,
};

/// Client for the typed Grocer API endpoints.
///
/// # Thread Safety
///
/// `ApiClient` is `Send + Sync`. Share one instance (e.g. behind an `Arc`) so
/// every caller draws from the same rate-limit budget.
#[derive(Debug)]
pub struct ApiClient {
    http: HttpClient,
    retry: RetryPolicy,
    cancel: CancellationToken,
}

// Verify ApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiClient>();
};

impl ApiClient {
    /// Creates a client reading credentials from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientBuild`] if the transport cannot be
    /// created.
    pub fn new(
        config: &ClientConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, ConfigError> {
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_capacity(),
            config.rate_limit_window(),
        ));
        let http = HttpClient::new(config, rate_limiter, TokenGate::new(store))?;

        Ok(Self {
            http,
            retry: RetryPolicy::from_config(config),
            cancel: CancellationToken::new(),
        })
    }

    /// Replaces the cancellation token.
    ///
    /// Cancelling it aborts every call waiting for a rate-limit slot, in
    /// flight, or between retries.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Replaces the retry policy applied to read operations.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the token that cancels this client's calls.
    #[must_use]
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns the retry policy applied to read operations.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns the shared rate limiter.
    #[must_use]
    pub const fn rate_limiter(&self) -> &Arc<RateLimiter> {
        self.http.rate_limiter()
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http
    }

    /// Returns the credential store.
    #[must_use]
    pub fn credential_store(&self) -> &Arc<dyn CredentialStore> {
        self.http.token_gate().store()
    }

    /// Validates and stores a token for `customer_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if either value is malformed; the
    /// store is left untouched in that case.
    pub fn save_credential(&self, token: &str, customer_id: &str) -> Result<(), ApiError> {
        validate_token(token).into_result("token")?;
        validate_customer_id(customer_id).into_result("customer_id")?;
        self.credential_store()
            .set(Credential::new(token, customer_id));
        Ok(())
    }

    /// Removes the stored credential.
    pub fn clear_credential(&self) {
        self.credential_store().clear();
    }

    /// Fetches the customer profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed ID, otherwise any
    /// transport, status, or decode error.
    pub async fn get_customer(&self, customer_id: &str) -> Result<Customer, ApiError> {
        validate_customer_id(customer_id).into_result("customer_id")?;
        self.get(customer_path(customer_id, ""), Vec::new()).await
    }

    /// Checks whether the stored token is still accepted.
    ///
    /// Returns `Ok(false)` without a network call when no credential is
    /// stored, and `Ok(false)` when the server answers 401 or 403 (the
    /// credential has then been cleared).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if `customer_id` or the stored token
    /// is malformed, otherwise any non-auth error.
    pub async fn validate_token(&self, customer_id: &str) -> Result<bool, ApiError> {
        validate_customer_id(customer_id).into_result("customer_id")?;
        let Some(credential) = self.credential_store().get() else {
            tracing::debug!("no stored credential, token is not valid");
            return Ok(false);
        };
        validate_token(credential.token()).into_result("token")?;

        match self.get_customer(customer_id).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_auth_error() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetches one page of the order history. Pages start at 1.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed ID or page 0,
    /// otherwise any transport, status, or decode error.
    pub async fn list_orders(&self, customer_id: &str, page: u32) -> Result<OrdersPage, ApiError> {
        validate_customer_id(customer_id).into_result("customer_id")?;
        if page == 0 {
            return Err(ApiError::Validation {
                field: "page",
                reason: "page numbers start at 1".to_string(),
            });
        }
        self.get(
            customer_path(customer_id, "orders/"),
            vec![("page".to_string(), page.to_string())],
        )
        .await
    }

    /// Fetches the prepared lines of one order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed customer or order ID,
    /// otherwise any transport, status, or decode error.
    pub async fn get_order_lines(
        &self,
        customer_id: &str,
        order_id: &str,
    ) -> Result<OrderLines, ApiError> {
        validate_customer_id(customer_id).into_result("customer_id")?;
        validate_order_id(order_id).into_result("order_id")?;
        let suffix = format!("orders/{}/lines/prepared/", urlencoding::encode(order_id));
        self.get(customer_path(customer_id, &suffix), Vec::new())
            .await
    }

    /// Fetches the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed ID, otherwise any
    /// transport, status, or decode error.
    pub async fn get_cart(&self, customer_id: &str) -> Result<Cart, ApiError> {
        validate_customer_id(customer_id).into_result("customer_id")?;
        self.get(customer_path(customer_id, "cart/"), Vec::new())
            .await
    }

    /// Replaces the cart contents. Sent once, never retried.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed ID, otherwise any
    /// transport, status, or decode error (a stale `version` is reported by
    /// the server as a 4xx).
    pub async fn replace_cart(&self, customer_id: &str, update: &CartUpdate) -> Result<Cart, ApiError> {
        validate_customer_id(customer_id).into_result("customer_id")?;
        self.put(customer_path(customer_id, "cart/"), update).await
    }

    /// Empties the cart. Sent once, never retried.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::replace_cart`].
    pub async fn clear_cart(&self, customer_id: &str, version: u64) -> Result<Cart, ApiError> {
        self.replace_cart(customer_id, &CartUpdate::clear(version))
            .await
    }

    /// Fetches "my regulars" recommendations of the given type.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed ID, otherwise any
    /// transport, status, or decode error.
    pub async fn get_recommendations(
        &self,
        customer_id: &str,
        kind: RecommendationType,
    ) -> Result<Recommendations, ApiError> {
        validate_customer_id(customer_id).into_result("customer_id")?;
        let suffix = format!("recommendations/myregulars/{kind}/");
        self.get(customer_path(customer_id, &suffix), Vec::new())
            .await
    }

    /// Like [`ApiClient::get_recommendations`], taking the type as text.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] unless `kind` is exactly
    /// `"precision"` or `"recall"`.
    pub async fn get_recommendations_str(
        &self,
        customer_id: &str,
        kind: &str,
    ) -> Result<Recommendations, ApiError> {
        validate_customer_id(customer_id).into_result("customer_id")?;
        validate_recommendation_type(kind).into_result("recommendation_type")?;
        let kind = kind
            .parse::<RecommendationType>()
            .map_err(|reason| ApiError::Validation {
                field: "recommendation_type",
                reason,
            })?;
        self.get_recommendations(customer_id, kind).await
    }

    /// Moves the customer to the warehouse serving `postal_code`. Sent once,
    /// never retried.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] unless `postal_code` is five digits,
    /// otherwise any transport, status, or decode error.
    pub async fn set_warehouse(&self, postal_code: &str) -> Result<WarehouseChange, ApiError> {
        validate_postal_code(postal_code).into_result("postal_code")?;
        let body = WarehouseChangeRequest {
            postal_code: postal_code.to_string(),
        };
        self.put("postal-codes/actions/change-pc/".to_string(), &body)
            .await
    }

    /// GET with automatic retries on transient failures.
    async fn get<T: DeserializeOwned>(
        &self,
        path: String,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        let request = HttpRequest::builder(HttpMethod::Get, path)
            .query(query)
            .build()?;

        self.retry
            .run(&self.cancel, || {
                let request = request.clone();
                async move { self.http.send(request, &self.cancel).await?.json::<T>() }
            })
            .await
    }

    /// PUT with a JSON body, sent exactly once.
    async fn put<B, T>(&self, path: String, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = HttpRequest::builder(HttpMethod::Put, path)
            .json_body(body)?
            .build()?;
        self.http.send(request, &self.cancel).await?.json::<T>()
    }
}

fn customer_path(customer_id: &str, suffix: &str) -> String {
    format!("customers/{}/{suffix}", urlencoding::encode(customer_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::InMemoryCredentialStore;
    use crate::config::BaseUrl;

    const TOKEN: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

    fn client() -> ApiClient {
        let config = ClientConfig::builder()
            .base_url(BaseUrl::new("http://127.0.0.1:9/api/").unwrap())
            .build()
            .unwrap();
        ApiClient::new(&config, Arc::new(InMemoryCredentialStore::new())).unwrap()
    }

    #[test]
    fn test_customer_path() {
        assert_eq!(customer_path("abcd", ""), "customers/abcd/");
        assert_eq!(customer_path("ab-cd", "cart/"), "customers/ab-cd/cart/");
    }

    #[test]
    fn test_save_credential_validates_both_inputs() {
        let client = client();

        let err = client.save_credential("short", "abcd").unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "token", .. }));
        assert!(client.credential_store().get().is_none());

        let err = client.save_credential(TOKEN, "a!").unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "customer_id", .. }));
        assert!(client.credential_store().get().is_none());

        client.save_credential(TOKEN, "abcd").unwrap();
        assert_eq!(client.credential_store().get().unwrap().customer_id(), "abcd");

        client.clear_credential();
        assert!(client.credential_store().get().is_none());
    }

    #[tokio::test]
    async fn test_validate_token_without_credential_is_false() {
        let client = client();
        assert!(!client.validate_token("abcd").await.unwrap());
        assert_eq!(client.rate_limiter().available().await, 60);
    }

    #[tokio::test]
    async fn test_list_orders_rejects_page_zero() {
        let client = client();
        let err = client.list_orders("abcd", 0).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "page", .. }));
    }

    #[test]
    fn test_retry_policy_follows_config() {
        let client = client();
        assert_eq!(client.retry_policy().max_attempts(), 3);

        let client = client.with_retry_policy(RetryPolicy::no_retry());
        assert_eq!(client.retry_policy().max_attempts(), 1);
    }

    #[test]
    fn test_with_cancellation_replaces_token() {
        let cancel = CancellationToken::new();
        let client = client().with_cancellation(cancel.clone());
        cancel.cancel();
        assert!(client.cancellation_token().is_cancelled());
    }
}
