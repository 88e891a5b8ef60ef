//! Authenticated session handle.

use std::sync::Arc;

use chrono::Utc;

use mfexp_core::error::AuthError;
use mfexp_core::{AccessToken, Result, Token};

/// A signing handle bound to one token.
///
/// Sessions are derived from a [`Token`] by the [`Authenticator`] and are
/// never persisted. A refresh produces a new session with a higher
/// generation; older handles keep signing with the old token.
///
/// [`Authenticator`]: crate::Authenticator
#[derive(Clone)]
pub struct AuthenticatedSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    generation: u64,
    scheme: String,
    access_token: AccessToken,
    expires_at: Option<f64>,
}

impl AuthenticatedSession {
    pub(crate) fn new(token: &Token, generation: u64) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                generation,
                scheme: token.scheme().to_string(),
                access_token: token.access_token.clone(),
                expires_at: token.expires_at,
            }),
        }
    }

    /// Monotonic counter of sessions built by one authenticator.
    pub fn generation(&self) -> u64 {
        self.inner.generation
    }

    /// True if the bound token carries an expiry in the past.
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as f64;
        self.inner.expires_at.is_some_and(|at| at < now)
    }

    /// The `Authorization` header value for the next request.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` if the token is known to be expired,
    /// in which case no request should be sent with it.
    pub(crate) fn authorization(&self) -> Result<String> {
        if self.is_expired() {
            return Err(AuthError::TokenExpired.into());
        }
        Ok(format!(
            "{} {}",
            self.inner.scheme,
            self.inner.access_token.as_str()
        ))
    }
}

impl std::fmt::Debug for AuthenticatedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedSession")
            .field("generation", &self.inner.generation)
            .field("expires_at", &self.inner.expires_at)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
