//! Authenticated request execution with one refresh-and-replay.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use mfexp_core::error::{AuthError, Error};
use mfexp_core::{ApiRequest, Result};

use crate::client::HttpClient;
use crate::oauth::Authenticator;

/// How many times a request is replayed after an auth failure.
pub const MAX_AUTH_RETRIES: u32 = 1;

/// Runs API calls through the authenticator's current session.
///
/// A 401 response, or a session whose token is already expired, triggers
/// one token refresh and one replay of the same request. Any other failure
/// is returned as is.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    auth: Arc<Authenticator>,
    http: HttpClient,
}

impl RequestExecutor {
    pub fn new(auth: Arc<Authenticator>) -> Self {
        let http = auth.http().clone();
        Self { auth, http }
    }

    pub fn authenticator(&self) -> &Arc<Authenticator> {
        &self.auth
    }

    /// Execute one logical API call and return the JSON response body.
    ///
    /// # Errors
    ///
    /// - `AuthError::NotAuthenticated` if no session exists (nothing is sent)
    /// - `AuthError::ReauthenticationRequired` if the refresh grant fails
    /// - `AuthError::RetryExhausted` if the replay is unauthorized as well
    /// - `Error::Api` with status and body for any other non-2xx response
    #[instrument(skip(self, request), fields(method = %request.method, endpoint = %request.endpoint))]
    pub async fn execute(&self, request: &ApiRequest) -> Result<Value> {
        let mut session = self
            .auth
            .current_session()
            .await
            .ok_or(AuthError::NotAuthenticated)?;

        for attempt in 0..=MAX_AUTH_RETRIES {
            let reason = match self.http.send(&session, request).await {
                Ok(body) => return Ok(body),
                Err(Error::Auth(AuthError::TokenExpired)) => "token expired",
                Err(Error::Api(err)) if err.is_unauthorized() => "unauthorized",
                Err(err) => return Err(err),
            };

            if attempt == MAX_AUTH_RETRIES {
                warn!(reason, attempt, "Still unauthorized after token refresh");
                return Err(AuthError::RetryExhausted.into());
            }

            info!(reason, "Refreshing token before retry");

            if !self.auth.refresh_after(Some(session.generation())).await? {
                warn!("Token refresh failed; reauthentication required");
                return Err(AuthError::ReauthenticationRequired.into());
            }

            session = self
                .auth
                .current_session()
                .await
                .ok_or(AuthError::NotAuthenticated)?;

            debug!(generation = session.generation(), "Retrying with refreshed session");
        }

        Err(AuthError::RetryExhausted.into())
    }
}
