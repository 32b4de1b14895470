//! HTTP response types for the Grocer API client.
//!
//! [`HttpResponse`] is what the transport hands back after the token gate has
//! observed the status. Typed endpoints then either classify it into an
//! [`ApiError`] or decode its body into a model type.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::clients::errors::ApiError;

/// Response headers keyed by lower-cased name.
///
/// Lookups through [`HeaderMap::get`] are case-insensitive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: HashMap<String, Vec<String>>,
}

impl HeaderMap {
    /// Creates an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value for `name`.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.entries
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Returns the first value for `name`, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// Returns every value for `name`, ignoring case.
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if a header named `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Returns the number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(lower-cased name, values)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub(crate) fn from_reqwest(headers: &reqwest::header::HeaderMap) -> Self {
        let mut result = Self::new();
        for (name, value) in headers {
            result.append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }
        result
    }
}

/// A response from the API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// The canonical reason phrase for the status (e.g. `"Not Found"`).
    pub status_message: String,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body text; `None` when the server sent no bytes.
    pub body: Option<String>,
}

impl HttpResponse {
    /// Creates a new response.
    ///
    /// An empty body string is stored as `None`.
    #[must_use]
    pub fn new(code: u16, headers: HeaderMap, body: Option<String>) -> Self {
        let status_message = reqwest::StatusCode::from_u16(code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            code,
            status_message,
            headers,
            body: body.filter(|b| !b.is_empty()),
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.headers.get("x-request-id")
    }

    /// Returns the response unchanged when 2xx, or the classified error.
    ///
    /// The error message carries the response body text.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Auth`], [`ApiError::Client`] or
    /// [`ApiError::Server`] for non-2xx statuses.
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_ok() {
            return Ok(self);
        }
        let message = match self.body {
            Some(body) => body,
            None => self.status_message,
        };
        Err(ApiError::from_status(self.code, message))
    }

    /// Decodes the JSON body of a successful response.
    ///
    /// # Errors
    ///
    /// Returns the classified error for non-2xx responses,
    /// [`ApiError::EmptyResponse`] if the body is missing or blank, and
    /// [`ApiError::Decode`] if it does not match `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let response = self.error_for_status()?;
        let code = response.code;
        let body = response
            .body
            .filter(|b| !b.trim().is_empty())
            .ok_or(ApiError::EmptyResponse { code })?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            code,
            message: e.to_string(),
        })
    }
}
