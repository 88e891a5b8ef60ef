//! Batch creation of dated transactions from a template.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use tracing::info;

use super::read_json;
use crate::cli::Settings;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct BatchCreateArgs {
    /// Dates to create transactions for (YYYY-MM-DD)
    #[arg(required = true, value_name = "DATE")]
    pub dates: Vec<String>,

    /// Template file with an `ex_transaction` object
    #[arg(long, default_value = "transaction_template.json")]
    pub template: PathBuf,
}

pub async fn run(args: BatchCreateArgs, settings: &Settings) -> Result<()> {
    let template = read_json(&args.template).context("Failed to load template")?;
    if !template["ex_transaction"].is_object() {
        bail!(
            "{} has no \"ex_transaction\" object",
            args.template.display()
        );
    }

    let dates: Vec<(&str, Option<NaiveDate>)> = args
        .dates
        .iter()
        .map(|d| (d.as_str(), parse_date(d)))
        .collect();

    let mut succeeded = 0usize;
    let mut failed = 0usize;

    // Skip authorization when there is nothing valid to create.
    let client = if dates.iter().any(|(_, date)| date.is_some()) {
        Some(session::connect(settings, true).await?)
    } else {
        None
    };

    for (raw, date) in &dates {
        let (Some(date), Some(client)) = (date, client.as_ref()) else {
            output::error(&format!("'{raw}' is not a valid date (YYYY-MM-DD)"));
            failed += 1;
            continue;
        };

        let day = date.format("%Y-%m-%d").to_string();
        let body = with_recognized_at(&template, &day);

        match client.create_ex_transaction(&body, None).await {
            Ok(result) => {
                info!(date = %day, "Created transaction");
                output::success(&format!("Created transaction for {day}"));
                output::json_pretty(&result)?;
                succeeded += 1;
            }
            Err(e) => {
                output::error(&format!("Failed to create transaction for {day}: {e}"));
                failed += 1;
            }
        }
    }

    eprintln!();
    eprintln!(
        "{}: {} succeeded, {} failed",
        "Done".bold(),
        succeeded.to_string().green(),
        failed.to_string().red()
    );

    if failed > 0 {
        bail!("{failed} of {} dates failed", dates.len());
    }

    Ok(())
}

/// Parse a strict `YYYY-MM-DD` date.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    // chrono accepts unpadded fields; require the canonical form.
    (date.format("%Y-%m-%d").to_string() == s).then_some(date)
}

/// Copy of `template` with `ex_transaction.recognized_at` set to `day`.
fn with_recognized_at(template: &Value, day: &str) -> Value {
    let mut body = template.clone();
    if let Some(tx) = body["ex_transaction"].as_object_mut() {
        tx.insert("recognized_at".to_string(), Value::String(day.to_string()));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_canonical_dates() {
        assert_eq!(
            parse_date("2024-12-01"),
            NaiveDate::from_ymd_opt(2024, 12, 1)
        );
        assert!(parse_date("2024-02-29").is_some());
    }

    #[test]
    fn rejects_malformed_dates() {
        for bad in ["2023-02-29", "2024-13-01", "2024-1-05", "20241201", "2024/12/01", ""] {
            assert!(parse_date(bad).is_none(), "{bad} should be rejected");
        }
    }

    #[test]
    fn recognized_at_is_set_on_a_copy() {
        let template = json!({
            "ex_transaction": {"value": 640, "remark": "赤坂"},
            "other": true
        });

        let body = with_recognized_at(&template, "2024-12-02");

        assert_eq!(body["ex_transaction"]["recognized_at"], "2024-12-02");
        assert_eq!(body["ex_transaction"]["value"], 640);
        assert_eq!(body["other"], true);
        assert!(template["ex_transaction"].get("recognized_at").is_none());
    }

    #[test]
    fn later_dates_replace_earlier_ones() {
        let template = json!({"ex_transaction": {"recognized_at": "2000-01-01"}});
        let body = with_recognized_at(&template, "2024-12-03");
        assert_eq!(body["ex_transaction"]["recognized_at"], "2024-12-03");
    }
}
