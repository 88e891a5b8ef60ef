//! Offices command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::Settings;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct OfficesArgs {}

pub async fn run(_args: OfficesArgs, settings: &Settings) -> Result<()> {
    let client = session::connect(settings, true).await?;

    let offices = client.offices().await.context("Failed to list offices")?;

    output::json_pretty(&offices)
}
