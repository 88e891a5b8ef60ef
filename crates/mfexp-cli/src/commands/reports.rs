//! Expense report commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mfexp_core::ListQuery;

use super::{parse_key_val, read_json};
use crate::cli::Settings;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ReportListArgs {
    /// Page number
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Items per page
    #[arg(long, default_value_t = 20)]
    pub per_page: u32,

    /// Extra query parameter (repeatable)
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub query: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct ReportGetArgs {
    /// Report id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct ReportCreateArgs {
    /// JSON file with the report body
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct ReportUpdateArgs {
    /// Report id
    pub id: String,

    /// JSON file with the report body
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct ReportDeleteArgs {
    /// Report id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct ReportTypesArgs {}

pub async fn run_list(args: ReportListArgs, settings: &Settings) -> Result<()> {
    let query = args
        .query
        .into_iter()
        .fold(ListQuery::new(args.page, args.per_page), |q, (k, v)| {
            q.param(k, v)
        });

    let client = session::connect(settings, true).await?;

    let result = client
        .list_ex_reports(None, &query)
        .await
        .context("Failed to list reports")?;

    output::json_pretty(&result)
}

pub async fn run_get(args: ReportGetArgs, settings: &Settings) -> Result<()> {
    let client = session::connect(settings, true).await?;

    let result = client
        .get_ex_report(&args.id, None)
        .await
        .context("Failed to get report")?;

    output::json_pretty(&result)
}

pub async fn run_create(args: ReportCreateArgs, settings: &Settings) -> Result<()> {
    let body = read_json(&args.file)?;
    let client = session::connect(settings, true).await?;

    let result = client
        .create_ex_report(&body, None)
        .await
        .context("Failed to create report")?;

    output::json_pretty(&result)
}

pub async fn run_update(args: ReportUpdateArgs, settings: &Settings) -> Result<()> {
    let body = read_json(&args.file)?;
    let client = session::connect(settings, true).await?;

    let result = client
        .update_ex_report(&args.id, &body, None)
        .await
        .context("Failed to update report")?;

    output::json_pretty(&result)
}

pub async fn run_delete(args: ReportDeleteArgs, settings: &Settings) -> Result<()> {
    let client = session::connect(settings, true).await?;

    let result = client
        .delete_ex_report(&args.id, None)
        .await
        .context("Failed to delete report")?;

    output::json_pretty(&result)
}

pub async fn run_types(_args: ReportTypesArgs, settings: &Settings) -> Result<()> {
    let client = session::connect(settings, true).await?;

    let result = client
        .list_ex_report_types(None)
        .await
        .context("Failed to list report types")?;

    output::json_pretty(&result)
}
