//! OAuth2 authorization-code and refresh-token grants.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use mfexp_core::error::{AuthError, Error, InvalidInputError, TransportError};
use mfexp_core::traits::TokenStore;
use mfexp_core::{ClientConfig, Result, Token};

use crate::client::{HttpClient, RawResponse};
use crate::session::AuthenticatedSession;

/// Error body returned by the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// An authorization URL to show the user, and the state it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

/// Outcome of [`Authenticator::authenticate`].
#[derive(Debug, Clone)]
pub enum AuthState {
    /// A session is available.
    Ready(AuthenticatedSession),
    /// No token is stored; the user must visit the URL and hand back a
    /// code or callback URL for [`Authenticator::exchange_code`].
    InteractionRequired(AuthorizationRequest),
}

#[derive(Debug, Default)]
struct Slot {
    token: Option<Token>,
    session: Option<AuthenticatedSession>,
    generation: u64,
}

/// Owner of the OAuth2 token and the session derived from it.
///
/// Holds at most one token and one session. Every token change rebuilds
/// the session and replaces the stored record.
#[derive(Debug)]
pub struct Authenticator {
    config: ClientConfig,
    store: Arc<dyn TokenStore>,
    http: HttpClient,
    slot: RwLock<Slot>,
    refresh_lock: Mutex<()>,
}

impl Authenticator {
    /// Create an authenticator with no token loaded.
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let http = HttpClient::new(config.api_base().clone())?;
        Ok(Self::with_http(config, store, http))
    }

    pub(crate) fn with_http(
        config: ClientConfig,
        store: Arc<dyn TokenStore>,
        http: HttpClient,
    ) -> Self {
        Self {
            config,
            store,
            http,
            slot: RwLock::new(Slot::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Load the stored token, if any, and derive a session from it.
    ///
    /// Returns whether a token was found. A malformed record is an error.
    #[instrument(skip(self))]
    pub async fn load_persisted_token(&self) -> Result<bool> {
        let Some(token) = self.store.load().await? else {
            debug!("No persisted token");
            return Ok(false);
        };

        let mut slot = self.slot.write().await;
        slot.generation += 1;
        slot.session = Some(AuthenticatedSession::new(&token, slot.generation));
        slot.token = Some(token);

        info!(location = %self.store.location(), "Loaded persisted token");
        Ok(true)
    }

    /// Build the provider's authorization URL with a fresh state value.
    pub fn authorization_url(&self) -> Result<AuthorizationRequest> {
        let state = Uuid::new_v4().simple().to_string();
        let credentials = self.config.credentials();
        let scope = self.config.scope();
        let authorize_url = self.config.authorize_url();

        let url = Url::parse_with_params(
            &authorize_url,
            [
                ("response_type", "code"),
                ("client_id", credentials.client_id()),
                ("redirect_uri", credentials.redirect_uri()),
                ("scope", scope.as_str()),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| InvalidInputError::Url {
            value: authorize_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(AuthorizationRequest {
            url: url.into(),
            state,
        })
    }

    /// Exchange an authorization code for a token.
    ///
    /// `input` is a bare code when the out-of-band redirect URI is
    /// configured, otherwise the full URL the browser was redirected to.
    /// When `expected_state` is given and the callback URL carries a
    /// `state`, the two must match.
    #[instrument(skip(self, input, expected_state))]
    pub async fn exchange_code(&self, input: &str, expected_state: Option<&str>) -> Result<Token> {
        let code = self.extract_code(input, expected_state)?;
        let credentials = self.config.credentials();

        info!("Exchanging authorization code");

        let fields = [
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("redirect_uri", credentials.redirect_uri()),
            ("client_id", credentials.client_id()),
            ("client_secret", credentials.client_secret()),
        ];

        let token = self.request_token(&fields).await.map_err(|e| match e {
            Error::Auth(_) => e,
            other => AuthError::Exchange {
                message: other.to_string(),
            }
            .into(),
        })?;

        let token = self.install(token).await?;
        info!("Authorization complete");
        Ok(token)
    }

    /// Run the refresh-token grant.
    ///
    /// Returns `Ok(false)` when the provider rejects the grant or cannot be
    /// reached; the caller should ask the user to authorize again.
    ///
    /// # Errors
    ///
    /// `AuthError::NoToken` if no token is held, or a storage error if the
    /// new token cannot be persisted.
    pub async fn refresh_token(&self) -> Result<bool> {
        self.refresh_after(None).await
    }

    /// Refresh unless the session generation `stale` has already been
    /// replaced by a concurrent refresh.
    #[instrument(skip(self))]
    pub(crate) async fn refresh_after(&self, stale: Option<u64>) -> Result<bool> {
        let _guard = self.refresh_lock.lock().await;

        let (current, generation) = {
            let slot = self.slot.read().await;
            (slot.token.clone(), slot.generation)
        };
        let current = current.ok_or(AuthError::NoToken)?;

        if stale.is_some_and(|stale| generation > stale) {
            debug!(generation, "Token already refreshed");
            return Ok(true);
        }

        let Some(refresh_token) = current.refresh_token.clone() else {
            warn!("Token has no refresh_token; cannot refresh");
            return Ok(false);
        };

        info!("Refreshing token");

        let credentials = self.config.credentials();
        let fields = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", credentials.client_id()),
            ("client_secret", credentials.client_secret()),
        ];

        let mut token = match self.request_token(&fields).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                return Ok(false);
            }
        };

        // Providers may keep the refresh token unrotated.
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token);
        }

        self.install(token).await?;
        debug!("Token refreshed");
        Ok(true)
    }

    /// The current session, or `None` if unauthenticated.
    pub async fn current_session(&self) -> Option<AuthenticatedSession> {
        self.slot.read().await.session.clone()
    }

    /// Snapshot of the current token.
    pub async fn token(&self) -> Option<Token> {
        self.slot.read().await.token.clone()
    }

    /// Return a session, loading the stored token if needed, or the
    /// authorization request the user has to complete.
    pub async fn authenticate(&self) -> Result<AuthState> {
        if let Some(session) = self.current_session().await {
            return Ok(AuthState::Ready(session));
        }

        if self.load_persisted_token().await?
            && let Some(session) = self.current_session().await
        {
            return Ok(AuthState::Ready(session));
        }

        Ok(AuthState::InteractionRequired(self.authorization_url()?))
    }

    fn extract_code(&self, input: &str, expected_state: Option<&str>) -> Result<String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(exchange_error("no authorization code given"));
        }

        if self.config.credentials().is_out_of_band() && !input.starts_with("http") {
            return Ok(input.to_string());
        }

        let url = Url::parse(input)
            .map_err(|e| exchange_error(format!("invalid callback URL: {e}")))?;

        let param = |name: &str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        };

        if let Some(error) = param("error") {
            let message = match param("error_description") {
                Some(description) => format!("{error}: {description}"),
                None => error,
            };
            return Err(exchange_error(message));
        }

        if let (Some(expected), Some(actual)) = (expected_state, param("state"))
            && expected != actual
        {
            warn!("Callback state does not match the issued state");
            return Err(AuthError::StateMismatch.into());
        }

        param("code").ok_or_else(|| exchange_error("callback URL has no code parameter"))
    }

    async fn request_token(&self, fields: &[(&str, &str)]) -> Result<Token> {
        let token_url = self.config.token_url();
        let response = self.http.post_form(&token_url, fields).await?;
        parse_token_response(response)
    }

    async fn install(&self, mut token: Token) -> Result<Token> {
        token.stamp_expiry(Utc::now());

        // A token that could not be persisted is never published.
        let mut slot = self.slot.write().await;
        self.store.save(&token).await?;

        slot.generation += 1;
        slot.session = Some(AuthenticatedSession::new(&token, slot.generation));
        slot.token = Some(token.clone());
        Ok(token)
    }
}

fn exchange_error(message: impl Into<String>) -> Error {
    AuthError::Exchange {
        message: message.into(),
    }
    .into()
}

fn parse_token_response(response: RawResponse) -> Result<Token> {
    if !response.is_success() {
        let message = match serde_json::from_str::<TokenErrorResponse>(&response.body) {
            Ok(err) => match err.error_description {
                Some(description) => format!("{}: {}", err.error, description),
                None => err.error,
            },
            Err(_) => response.body.clone(),
        };
        return Err(exchange_error(format!(
            "token endpoint returned HTTP {}: {}",
            response.status, message
        )));
    }

    serde_json::from_str::<Token>(&response.body).map_err(|e| {
        TransportError::Decode {
            message: format!("invalid token response: {e}"),
        }
        .into()
    })
}
