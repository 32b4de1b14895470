//! Bearer-token injection and invalidation.
//!
//! [`TokenGate`] sits between the rate limiter and the transport. It reads
//! the current credential from the [`CredentialStore`], attaches it to
//! outgoing requests, and clears the store when the server reports that the
//! token is no longer accepted.

use std::fmt;
use std::sync::Arc;

use crate::auth::credential::CredentialStore;
use crate::clients::HttpRequest;

/// Name of the header carrying the bearer token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Attaches credentials to requests and revokes them on auth failures.
#[derive(Clone)]
pub struct TokenGate {
    store: Arc<dyn CredentialStore>,
}

impl TokenGate {
    /// Creates a gate reading from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying credential store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Adds `Authorization: Bearer <token>` when a credential is stored.
    ///
    /// Requests pass through unchanged when the store is empty.
    #[must_use]
    pub fn attach(&self, request: HttpRequest) -> HttpRequest {
        let Some(credential) = self.store.get() else {
            return request;
        };

        #[cfg(debug_assertions)]
        tracing::debug!(
            path = %request.path,
            token = %crate::auth::mask_token(credential.token()),
            "attaching bearer token"
        );

        request.with_header(
            AUTHORIZATION_HEADER,
            format!("Bearer {}", credential.token()),
        )
    }

    /// Inspects a response status, clearing the stored credential on 401/403.
    ///
    /// Returns `true` when the credential was cleared. Callers must invoke
    /// this once per response, before surfacing any error.
    pub fn observe(&self, status: u16) -> bool {
        if !is_auth_failure(status) {
            return false;
        }
        tracing::warn!(status, "server rejected the bearer token, clearing stored credential");
        self.store.clear();
        true
    }
}

impl fmt::Debug for TokenGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGate").finish_non_exhaustive()
    }
}

/// Returns `true` for statuses meaning "this token is not accepted".
#[must_use]
pub const fn is_auth_failure(status: u16) -> bool {
    matches!(status, 401 | 403)
}

const REDACTED: &str = "*****";

/// Renders a header value for diagnostics, masking bearer tokens.
///
/// Debug builds keep a short token prefix (`Bearer abcdef…`); release builds
/// show no token material at all (`Bearer *****`).
#[must_use]
pub fn redact_header_value(name: &str, value: &str) -> String {
    if !name.eq_ignore_ascii_case(AUTHORIZATION_HEADER) {
        return value.to_string();
    }
    value.strip_prefix("Bearer ").map_or_else(
        || REDACTED.to_string(),
        |token| format!("Bearer {}", diagnostic_token(token)),
    )
}

#[cfg(debug_assertions)]
fn diagnostic_token(token: &str) -> String {
    crate::auth::mask_token(token)
}

#[cfg(not(debug_assertions))]
fn diagnostic_token(_token: &str) -> String {
    REDACTED.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credential::{Credential, InMemoryCredentialStore};
    use crate::clients::HttpMethod;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TOKEN: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryCredentialStore,
        clears: AtomicUsize,
    }

    impl CredentialStore for CountingStore {
        fn get(&self) -> Option<Credential> {
            self.inner.get()
        }
        fn set(&self, credential: Credential) {
            self.inner.set(credential);
        }
        fn clear(&self) {
            self.clears.fetch_add(1, Ordering::SeqCst);
            self.inner.clear();
        }
    }

    fn request() -> HttpRequest {
        HttpRequest::builder(HttpMethod::Get, "customers/abcd/")
            .build()
            .unwrap()
    }

    fn authorization(request: &HttpRequest) -> Option<&str> {
        request.header(AUTHORIZATION_HEADER)
    }

    #[test]
    fn test_attach_adds_bearer_header() {
        let store = Arc::new(InMemoryCredentialStore::with_credential(Credential::new(
            TOKEN, "abcd",
        )));
        let gate = TokenGate::new(store);

        let request = gate.attach(request());
        assert_eq!(authorization(&request), Some(format!("Bearer {TOKEN}").as_str()));
    }

    #[test]
    fn test_attach_without_credential_leaves_request_unchanged() {
        let gate = TokenGate::new(Arc::new(InMemoryCredentialStore::new()));
        let request = gate.attach(request());
        assert!(authorization(&request).is_none());
        assert!(request.extra_headers.is_empty());
    }

    #[test]
    fn test_observe_401_clears_exactly_once_then_attach_has_no_header() {
        let store = Arc::new(CountingStore::default());
        store.set(Credential::new(TOKEN, "abcd"));
        let gate = TokenGate::new(store.clone());

        assert!(gate.observe(401));
        assert_eq!(store.clears.load(Ordering::SeqCst), 1);

        let request = gate.attach(request());
        assert!(authorization(&request).is_none());
    }

    #[test]
    fn test_observe_403_clears() {
        let store = Arc::new(CountingStore::default());
        store.set(Credential::new(TOKEN, "abcd"));
        let gate = TokenGate::new(store.clone());

        assert!(gate.observe(403));
        assert!(store.get().is_none());
    }

    #[test]
    fn test_observe_other_statuses_keep_credential() {
        let store = Arc::new(CountingStore::default());
        store.set(Credential::new(TOKEN, "abcd"));
        let gate = TokenGate::new(store.clone());

        for status in [200, 204, 400, 404, 429, 500, 503] {
            assert!(!gate.observe(status));
        }
        assert_eq!(store.clears.load(Ordering::SeqCst), 0);
        assert!(store.get().is_some());
    }

    #[test]
    fn test_redact_header_value() {
        let expected = if cfg!(debug_assertions) {
            "Bearer abcdef…"
        } else {
            "Bearer *****"
        };
        let redacted = redact_header_value("authorization", &format!("Bearer {TOKEN}"));
        assert_eq!(redacted, expected);
        assert!(!redacted.contains(TOKEN));
        assert_eq!(redact_header_value("Authorization", "Basic xyz"), "*****");
        assert_eq!(redact_header_value("Accept", "application/json"), "application/json");
    }

    #[test]
    fn test_debug_does_not_expose_store_contents() {
        let store = Arc::new(InMemoryCredentialStore::with_credential(Credential::new(
            TOKEN, "abcd",
        )));
        let gate = TokenGate::new(store);
        assert!(!format!("{gate:?}").contains(TOKEN));
    }
}
