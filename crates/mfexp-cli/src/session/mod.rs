//! Client sessions for CLI commands.

pub mod interactive;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use mfexp_http::{AuthState, ExpenseClient};

use crate::cli::Settings;

/// Build a client without touching the token file.
pub fn client(settings: &Settings) -> Result<ExpenseClient> {
    let config = storage::client_config(settings)?;
    let store = storage::token_store(settings)?;
    ExpenseClient::new(config, Arc::new(store)).context("Failed to create client")
}

/// Build a client with a session, running the interactive authorization
/// when no token is stored.
pub async fn connect(settings: &Settings, open_browser: bool) -> Result<ExpenseClient> {
    let client = client(settings)?;
    let auth = client.authenticator();

    match auth.authenticate().await.context("Failed to load token")? {
        AuthState::Ready(session) => {
            debug!(generation = session.generation(), "Using stored token");
        }
        AuthState::InteractionRequired(request) => {
            interactive::authorize(auth, &request, open_browser).await?;
        }
    }

    Ok(client)
}
