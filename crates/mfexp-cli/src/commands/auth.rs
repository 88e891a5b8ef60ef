//! Authorization commands: auth, status, refresh.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Args;
use colored::Colorize;

use mfexp_core::{Token, TokenStore};

use crate::cli::Settings;
use crate::output;
use crate::session::{self, storage};

#[derive(Args, Debug)]
pub struct AuthArgs {
    /// Print the authorization URL without opening a browser
    #[arg(long)]
    pub no_browser: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {}

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run_auth(args: AuthArgs, settings: &Settings) -> Result<()> {
    let client = session::connect(settings, !args.no_browser).await?;

    output::success("Authenticated");
    if let Some(token) = client.authenticator().token().await {
        println!();
        print_token(&token, &client.authenticator().store().location());
    }

    Ok(())
}

pub async fn run_status(_args: StatusArgs, settings: &Settings) -> Result<()> {
    let store = storage::token_store(settings)?;

    let Some(token) = store.load().await.context("Failed to read token file")? else {
        output::status(&format!(
            "No token stored at {}. Run 'mfexp auth' first.",
            store.location()
        ));
        return Ok(());
    };

    print_token(&token, &store.location());
    Ok(())
}

pub async fn run_refresh(_args: RefreshArgs, settings: &Settings) -> Result<()> {
    let client = session::client(settings)?;
    let auth = client.authenticator();

    if !auth
        .load_persisted_token()
        .await
        .context("Failed to read token file")?
    {
        bail!("No token stored. Run 'mfexp auth' first.");
    }

    output::status("Refreshing token...");

    if !auth.refresh_token().await.context("Failed to refresh token")? {
        bail!("Token refresh was rejected. Run 'mfexp auth' to authorize again.");
    }

    output::success("Token refreshed");
    if let Some(token) = auth.token().await {
        println!();
        print_token(&token, &auth.store().location());
    }

    Ok(())
}

fn print_token(token: &Token, location: &str) {
    output::field("Token file", location);
    output::field("Type", token.scheme());

    if let Some(scope) = token.scope_string() {
        output::field("Scope", &scope);
    }

    let expires = match token.expires_at_utc() {
        Some(at) if token.is_expired_at(Utc::now()) => {
            format!("{} {}", at.to_rfc3339(), "(expired)".red())
        }
        Some(at) => at.to_rfc3339(),
        None => "unknown".to_string(),
    };
    output::field("Expires", &expires);

    let refresh = if token.refresh_token.is_some() {
        "yes"
    } else {
        "no"
    };
    output::field("Refresh token", refresh);
}
