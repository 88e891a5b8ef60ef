//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser};

use mfexp_core::config::{DEFAULT_API_BASE_URL, DEFAULT_OAUTH_BASE_URL};
use mfexp_core::credentials::DEFAULT_REDIRECT_URI;

use crate::commands::Commands;

/// Command line client for the MoneyForward Cloud Expense API.
#[derive(Parser, Debug)]
#[command(name = "mfexp")]
#[command(author, version = env!("MFEXP_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Commands,
}

/// Client settings, taken from flags or the environment.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// OAuth client id
    #[arg(long, env = "MF_CLIENT_ID", global = true, hide_env_values = true)]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, env = "MF_CLIENT_SECRET", global = true, hide_env_values = true)]
    pub client_secret: Option<String>,

    /// OAuth redirect URI (use urn:ietf:wg:oauth:2.0:oob to paste a bare code)
    #[arg(long, env = "MF_REDIRECT_URI", global = true, default_value = DEFAULT_REDIRECT_URI)]
    pub redirect_uri: String,

    /// Default office id for office-scoped commands
    #[arg(long, env = "MF_OFFICE_ID", global = true)]
    pub office_id: Option<String>,

    /// Token file (defaults to the platform data directory)
    #[arg(long, env = "MF_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Expense API base URL
    #[arg(long, env = "MF_API_BASE_URL", global = true, default_value = DEFAULT_API_BASE_URL, hide = true)]
    pub api_base_url: String,

    /// OAuth provider base URL
    #[arg(long, env = "MF_OAUTH_BASE_URL", global = true, default_value = DEFAULT_OAUTH_BASE_URL, hide = true)]
    pub oauth_base_url: String,
}
