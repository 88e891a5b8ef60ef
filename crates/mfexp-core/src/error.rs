//! Error types for mfexp.
//!
//! One unified error type with explicit variants for transport,
//! authentication, API, storage and input validation failures. Callers can
//! match on the variant to tell a recoverable condition (reauthenticate)
//! from a verbatim API rejection.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The unified error type for mfexp operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (no session, rejected grant, exhausted retry).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success HTTP responses from the expense API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Persisted token could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation errors (bad URL, missing office).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if the failure means the user must run the
    /// authorization flow again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            Error::Auth(
                AuthError::NotAuthenticated
                    | AuthError::NoToken
                    | AuthError::ReauthenticationRequired
                    | AuthError::RetryExhausted
            )
        )
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Response body could not be decoded.
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No authenticated session exists.
    #[error("not authenticated; run `mfexp auth` first")]
    NotAuthenticated,

    /// The authorization code exchange was rejected.
    #[error("authorization code exchange failed: {message}")]
    Exchange { message: String },

    /// The callback state does not match the one issued.
    #[error("authorization state mismatch")]
    StateMismatch,

    /// A refresh was attempted with no token held.
    #[error("no token available to refresh")]
    NoToken,

    /// The session's token has passed its expiry time.
    #[error("access token expired")]
    TokenExpired,

    /// The refresh grant was rejected; the user must authorize again.
    #[error("token refresh failed; reauthentication required")]
    ReauthenticationRequired,

    /// The request was still unauthorized after the one allowed retry.
    #[error("authentication still failing after token refresh")]
    RetryExhausted,
}

/// A non-success response from the expense API.
///
/// The body is kept verbatim so callers can show the provider's detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check if this is an authentication failure.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Token persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The stored token exists but cannot be parsed.
    #[error("malformed token file {}: {message}", path.display())]
    MalformedToken { path: PathBuf, message: String },

    /// Reading or writing the token file failed.
    #[error("token file {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid service URL.
    #[error("invalid URL '{value}': {reason}")]
    Url { value: String, reason: String },

    /// No office id was given and none is configured.
    #[error("no office id given and MF_OFFICE_ID is not set")]
    MissingOffice,

    /// A required configuration value is absent.
    #[error("missing configuration value: {name}")]
    MissingConfig { name: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_keeps_body() {
        let err = ApiError::new(422, r#"{"errors":["amount is invalid"]}"#);
        assert_eq!(
            err.to_string(),
            r#"HTTP 422: {"errors":["amount is invalid"]}"#
        );
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn reauthentication_kinds() {
        assert!(Error::from(AuthError::RetryExhausted).requires_reauthentication());
        assert!(Error::from(AuthError::NotAuthenticated).requires_reauthentication());
        assert!(!Error::from(ApiError::new(500, "")).requires_reauthentication());
        assert!(!Error::from(AuthError::TokenExpired).requires_reauthentication());
    }
}
