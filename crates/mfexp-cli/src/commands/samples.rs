//! Sample request body files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Value, json};

use crate::output;

#[derive(Args, Debug)]
pub struct ExampleArgs {
    /// Where to write the sample
    #[arg(long, short, default_value = "example_transaction.json")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct ReportExampleArgs {
    /// Where to write the sample
    #[arg(long, short, default_value = "example_report.json")]
    pub output: PathBuf,
}

/// A transaction body with placeholder ids.
pub fn sample_transaction() -> Value {
    json!({
        "ex_transaction": {
            "office_member_id": "OFFICE_MEMBER_ID",
            "transaction_date": "2023-01-01",
            "amount": 1000,
            "reason": "サンプル経費",
            "ex_item_id": "EX_ITEM_ID",
            "dept_id": "DEPT_ID"
        }
    })
}

/// A report body with a placeholder report type.
pub fn sample_report() -> Value {
    json!({
        "ex_report": {
            "title": "2024年12月交通費",
            "ex_report_type_id": "EX_REPORT_TYPE_ID"
        }
    })
}

pub fn run_example(args: ExampleArgs) -> Result<()> {
    write_sample(&args.output, &sample_transaction())?;
    output::success(&format!("Wrote sample transaction to {}", args.output.display()));
    Ok(())
}

pub fn run_report_example(args: ReportExampleArgs) -> Result<()> {
    write_sample(&args.output, &sample_report())?;
    output::success(&format!("Wrote sample report to {}", args.output.display()));
    Ok(())
}

fn write_sample(path: &Path, value: &Value) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_keep_non_ascii_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        write_sample(&path, &sample_report()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("2024年12月交通費"));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, sample_report());
    }

    #[test]
    fn transaction_sample_shape() {
        let sample = sample_transaction();
        let tx = sample["ex_transaction"].as_object().unwrap();
        assert_eq!(tx["amount"], 1000);
        assert_eq!(tx.len(), 6);
    }
}
