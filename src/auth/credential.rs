//! Credential types and the storage interface the client reads them from.
//!
//! Secure persistence of the bearer token lives outside this crate. The
//! client only needs three operations (get, set, clear), captured by the
//! [`CredentialStore`] trait. [`InMemoryCredentialStore`] is a process-local
//! implementation suitable for tests and short-lived tools.

use std::fmt;
use std::sync::RwLock;

/// A bearer token together with the customer it belongs to.
///
/// # Security
///
/// The `Debug` implementation masks the token value.
///
/// ```rust
/// use grocer_api::auth::Credential;
///
/// let credential = Credential::new("secret-token-value", "cust-1234");
/// let debug = format!("{:?}", credential);
/// assert!(!debug.contains("secret-token-value"));
/// assert!(debug.contains("cust-1234"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    customer_id: String,
}

impl Credential {
    /// Creates a new credential.
    #[must_use]
    pub fn new(token: impl Into<String>, customer_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            customer_id: customer_id.into(),
        }
    }

    /// Returns the raw bearer token.
    ///
    /// Never log this value; use [`mask_token`] for diagnostics.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the customer identifier associated with the token.
    #[must_use]
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"*****")
            .field("customer_id", &self.customer_id)
            .finish()
    }
}

/// Storage for the current credential.
///
/// Implementations must be safe to call from many tasks at once. The store
/// is treated as eventually consistent: a `clear` racing with a `get` may let
/// one more request go out with the old token.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credential, if any.
    fn get(&self) -> Option<Credential>;

    /// Replaces the stored credential.
    fn set(&self, credential: Credential);

    /// Removes the stored credential.
    fn clear(&self);
}

/// A [`CredentialStore`] kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<Option<Credential>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `credential`.
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            inner: RwLock::new(Some(credential)),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.inner
            .read()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |guard| guard.clone())
    }

    fn set(&self, credential: Credential) {
        match self.inner.write() {
            Ok(mut guard) => *guard = Some(credential),
            Err(poisoned) => *poisoned.into_inner() = Some(credential),
        }
    }

    fn clear(&self) {
        match self.inner.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}

/// Number of token characters that may appear in debug diagnostics.
pub const TOKEN_PREFIX_LEN: usize = 6;

/// Returns a diagnostic-safe rendering of a token: a short prefix and `…`.
///
/// # Example
///
/// ```rust
/// use grocer_api::auth::mask_token;
///
/// assert_eq!(mask_token("abcdefghijklmnop"), "abcdef…");
/// assert_eq!(mask_token("abc"), "…");
/// ```
#[must_use]
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= TOKEN_PREFIX_LEN {
        return "…".to_string();
    }
    let prefix: String = token.chars().take(TOKEN_PREFIX_LEN).collect();
    format!("{prefix}…")
}
