//! Expense transaction commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mfexp_core::ListQuery;

use super::{parse_key_val, read_json};
use crate::cli::Settings;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Page number
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Items per page
    #[arg(long, default_value_t = 20)]
    pub per_page: u32,

    /// Only transactions not yet attached to a report
    #[arg(long)]
    pub unsubmitted: bool,

    /// Sort order, e.g. created_at.desc
    #[arg(long)]
    pub sort: Option<String>,

    /// Extra query parameter (repeatable)
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub query: Vec<(String, String)>,
}

impl ListArgs {
    fn to_query(&self) -> ListQuery {
        let mut query = ListQuery::new(self.page, self.per_page);
        if self.unsubmitted {
            query = query.param("is_unsubmitted", "true");
        }
        if let Some(sort) = &self.sort {
            query = query.param("sort", sort.as_str());
        }
        for (key, value) in &self.query {
            query = query.param(key.as_str(), value.as_str());
        }
        query
    }
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Transaction id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// JSON file with the transaction body
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct CreateForMemberArgs {
    /// Office member id
    pub member_id: String,

    /// JSON file with the transaction body
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Transaction id
    pub id: String,

    /// JSON file with the transaction body
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Transaction id
    pub id: String,
}

pub async fn run_list(args: ListArgs, settings: &Settings) -> Result<()> {
    let client = session::connect(settings, true).await?;

    let result = client
        .list_ex_transactions(None, &args.to_query())
        .await
        .context("Failed to list transactions")?;

    output::json_pretty(&result)
}

pub async fn run_get(args: GetArgs, settings: &Settings) -> Result<()> {
    let client = session::connect(settings, true).await?;

    let result = client
        .get_ex_transaction(&args.id, None)
        .await
        .context("Failed to get transaction")?;

    output::json_pretty(&result)
}

pub async fn run_create(args: CreateArgs, settings: &Settings) -> Result<()> {
    let body = read_json(&args.file)?;
    let client = session::connect(settings, true).await?;

    let result = client
        .create_ex_transaction(&body, None)
        .await
        .context("Failed to create transaction")?;

    output::json_pretty(&result)
}

pub async fn run_create_for_member(args: CreateForMemberArgs, settings: &Settings) -> Result<()> {
    let body = read_json(&args.file)?;
    let client = session::connect(settings, true).await?;

    let result = client
        .create_ex_transaction_for_member(&args.member_id, &body, None)
        .await
        .context("Failed to create transaction for member")?;

    output::json_pretty(&result)
}

pub async fn run_update(args: UpdateArgs, settings: &Settings) -> Result<()> {
    let body = read_json(&args.file)?;
    let client = session::connect(settings, true).await?;

    let result = client
        .update_ex_transaction(&args.id, &body, None)
        .await
        .context("Failed to update transaction")?;

    output::json_pretty(&result)
}

pub async fn run_delete(args: DeleteArgs, settings: &Settings) -> Result<()> {
    let client = session::connect(settings, true).await?;

    let result = client
        .delete_ex_transaction(&args.id, None)
        .await
        .context("Failed to delete transaction")?;

    output::json_pretty(&result)
}
