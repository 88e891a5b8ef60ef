//! Subcommand implementations.

mod auth;
mod batch;
mod offices;
mod reports;
mod samples;
mod transactions;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::Value;

use crate::cli::Settings;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authorize, or confirm the stored token
    Auth(auth::AuthArgs),

    /// Show the stored token
    Status(auth::StatusArgs),

    /// Force a token refresh
    Refresh(auth::RefreshArgs),

    /// List offices
    Offices(offices::OfficesArgs),

    /// List expense transactions
    List(transactions::ListArgs),

    /// Fetch an expense transaction
    Get(transactions::GetArgs),

    /// Create an expense transaction from a JSON file
    Create(transactions::CreateArgs),

    /// Create an expense transaction for an office member
    CreateForMember(transactions::CreateForMemberArgs),

    /// Update an expense transaction from a JSON file
    Update(transactions::UpdateArgs),

    /// Delete an expense transaction
    Delete(transactions::DeleteArgs),

    /// Write a sample transaction JSON file
    Example(samples::ExampleArgs),

    /// List expense reports
    ReportList(reports::ReportListArgs),

    /// Fetch an expense report
    ReportGet(reports::ReportGetArgs),

    /// Create an expense report from a JSON file
    ReportCreate(reports::ReportCreateArgs),

    /// Update an expense report from a JSON file
    ReportUpdate(reports::ReportUpdateArgs),

    /// Delete an expense report
    ReportDelete(reports::ReportDeleteArgs),

    /// List expense report types
    ReportTypes(reports::ReportTypesArgs),

    /// Write a sample report JSON file
    ReportExample(samples::ReportExampleArgs),

    /// Create one transaction per date from a template
    BatchCreate(batch::BatchCreateArgs),
}

pub async fn handle(cmd: Commands, settings: &Settings) -> Result<()> {
    match cmd {
        Commands::Auth(args) => auth::run_auth(args, settings).await,
        Commands::Status(args) => auth::run_status(args, settings).await,
        Commands::Refresh(args) => auth::run_refresh(args, settings).await,
        Commands::Offices(args) => offices::run(args, settings).await,
        Commands::List(args) => transactions::run_list(args, settings).await,
        Commands::Get(args) => transactions::run_get(args, settings).await,
        Commands::Create(args) => transactions::run_create(args, settings).await,
        Commands::CreateForMember(args) => {
            transactions::run_create_for_member(args, settings).await
        }
        Commands::Update(args) => transactions::run_update(args, settings).await,
        Commands::Delete(args) => transactions::run_delete(args, settings).await,
        Commands::Example(args) => samples::run_example(args),
        Commands::ReportList(args) => reports::run_list(args, settings).await,
        Commands::ReportGet(args) => reports::run_get(args, settings).await,
        Commands::ReportCreate(args) => reports::run_create(args, settings).await,
        Commands::ReportUpdate(args) => reports::run_update(args, settings).await,
        Commands::ReportDelete(args) => reports::run_delete(args, settings).await,
        Commands::ReportTypes(args) => reports::run_types(args, settings).await,
        Commands::ReportExample(args) => samples::run_report_example(args),
        Commands::BatchCreate(args) => batch::run(args, settings).await,
    }
}

/// Read a JSON request body from a file.
fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Parse a `KEY=VALUE` query parameter.
fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;

    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }

    Ok((key.to_string(), value.to_string()))
}
