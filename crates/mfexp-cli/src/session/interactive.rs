//! Interactive authorization-code flow on the terminal.

use std::io::{self, BufRead, Write};
use std::process::Command;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use tracing::warn;

use mfexp_http::{Authenticator, AuthorizationRequest};

use crate::output;

/// Walk the user through authorization and exchange the code they paste.
pub async fn authorize(
    auth: &Authenticator,
    request: &AuthorizationRequest,
    open_browser: bool,
) -> Result<()> {
    output::status("Authorization required.");
    eprintln!("Open this URL in a browser and sign in:");
    eprintln!("  {}", request.url.cyan());

    if open_browser && let Err(e) = launch_browser(&request.url) {
        warn!(error = %e, "Could not open a browser");
        output::status("Could not open a browser; open the URL manually.");
    }

    let prompt = if auth.config().credentials().is_out_of_band() {
        "Paste the authorization code shown after sign-in"
    } else {
        "Paste the full URL you were redirected to"
    };

    let prompt = prompt.to_string();
    let input = tokio::task::spawn_blocking(move || read_line(&prompt))
        .await
        .context("Prompt task failed")??;

    auth.exchange_code(&input, Some(request.state.as_str()))
        .await
        .context("Authorization failed")?;

    output::success("Authorization complete");
    Ok(())
}

fn read_line(prompt: &str) -> Result<String> {
    eprint!("{}: ", prompt);
    io::stderr().flush()?;

    let mut input = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read from stdin")?;

    if read == 0 {
        bail!("No input given; authorization cancelled");
    }

    Ok(input.trim().to_string())
}

fn launch_browser(url: &str) -> io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut command = Command::new("open");
        command.arg(url);
        command
    };

    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", url]);
        command
    };

    #[cfg(all(unix, not(target_os = "macos")))]
    let mut command = {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    };

    // Not waited on: the opener hands off to the browser and some
    // `xdg-open` setups block until the browser exits. The child is reaped
    // when mfexp exits.
    command.spawn().map(|_| ())
}
