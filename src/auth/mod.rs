//! Credential handling for the Grocer API client.
//!
//! - [`Credential`]: a bearer token and its customer ID, masked in `Debug`
//! - [`CredentialStore`]: the get/set/clear interface to secure storage
//! - [`InMemoryCredentialStore`]: a process-local store
//! - [`TokenGate`]: attaches the token to requests and clears it on 401/403

mod credential;
mod token_gate;

pub use credential::{
    mask_token, Credential, CredentialStore, InMemoryCredentialStore, TOKEN_PREFIX_LEN,
};
pub use token_gate::{is_auth_failure, redact_header_value, TokenGate, AUTHORIZATION_HEADER};
