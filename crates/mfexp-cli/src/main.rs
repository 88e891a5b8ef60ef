//! mfexp - command line client for the MoneyForward Cloud Expense API.
//!
//! A thin wrapper over `mfexp-http`: every API command authenticates,
//! runs one call and prints the JSON response.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let result = commands::handle(cli.command, &cli.settings).await;
    if let Err(err) = &result {
        if needs_reauthentication(err) {
            output::status("Run 'mfexp auth' to authorize again.");
        }
    }
    result
}

fn needs_reauthentication(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<mfexp_core::Error>()
            .is_some_and(mfexp_core::Error::requires_reauthentication)
    })
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr; stdout carries command output only.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use anyhow::Context;
    use mfexp_core::error::{ApiError, AuthError};

    #[test]
    fn hint_follows_wrapped_auth_failures() {
        let err = Err::<(), _>(mfexp_core::Error::from(AuthError::RetryExhausted))
            .context("Failed to list offices")
            .unwrap_err();
        assert!(needs_reauthentication(&err));

        let err = anyhow::Error::from(mfexp_core::Error::from(ApiError::new(404, "")));
        assert!(!needs_reauthentication(&err));
        assert!(!needs_reauthentication(&anyhow::anyhow!("plain failure")));
    }
}
