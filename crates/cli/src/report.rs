//! `fscope summary` and `fscope list`: terminal presentation of the
//! reconciled sets.

use serde::Serialize;

use followscope_config::Settings;
use followscope_io::{Processor, Progress, Status};
use followscope_recon::model::{format_timestamp, RelationshipEntry, RelationshipSummary};

use crate::exit_codes::EXIT_EXPORT_SERIALIZE;
use crate::intake::{check_strict, print_warnings, require_relationships, run_intake, Intake, IntakeArgs, ViewArgs};
use crate::CliError;

#[derive(Debug, Serialize)]
struct SummaryReport<'a> {
    status: Status,
    progress: Progress,
    warnings: &'a [String],
    error: Option<&'a str>,
    relationships: Option<RelationshipSummary>,
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError {
        code: EXIT_EXPORT_SERIALIZE,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    })
}

/// Prints the report even when intake stopped on a fatal error, so the
/// partial counts and the error state stay visible.
pub fn cmd_summary(intake: IntakeArgs, json: bool) -> Result<(), CliError> {
    let Intake { processor, fatal } = run_intake(&intake);
    let summary = processor.relationships().map(|r| r.summary());

    if json {
        let report = SummaryReport {
            status: processor.status(),
            progress: processor.progress(),
            warnings: processor.warnings(),
            error: processor.error(),
            relationships: summary,
        };
        println!("{}", to_pretty_json(&report)?);
    } else {
        print_warnings(&processor);
        print_summary(&processor, summary.as_ref());
    }

    if let Some(err) = fatal {
        return Err(err);
    }
    if summary.is_none() {
        require_relationships(&processor)?;
    }
    check_strict(&intake, &processor)
}

fn print_summary(processor: &Processor, summary: Option<&RelationshipSummary>) {
    let progress = processor.progress();
    println!("status:            {}", processor.status());
    println!("files:             {}/{}", progress.parsed_files, progress.total_files);
    println!("followers:         {}", progress.followers_count);
    println!("following:         {}", progress.following_count);

    if let Some(s) = summary {
        println!();
        println!("fans:              {}", s.fans);
        println!("dont follow back:  {}", s.dont_follow_back);
        println!("mutuals:           {}", s.mutuals);
    }
}

pub fn cmd_list(intake: IntakeArgs, view: ViewArgs, json: bool, settings: &Settings) -> Result<(), CliError> {
    let processor = run_intake(&intake).into_result()?;
    print_warnings(&processor);
    let relationships = require_relationships(&processor)?;

    let total = view.category.rows(&relationships).len();
    let rows = view.select(&relationships, settings);

    if json {
        println!("{}", to_pretty_json(rows.as_slice())?);
    } else {
        for row in &rows {
            println!("{}", format_row(row));
        }
        eprintln!("{} of {} {} accounts", rows.len(), total, view.category.label());
    }

    check_strict(&intake, &processor)
}

fn format_row(row: &RelationshipEntry) -> String {
    let account = &row.account;
    let date = account
        .followed_date
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<15} {:<30} {:<30} {}",
        row.relationship.label(),
        account.username,
        account.full_name.as_deref().unwrap_or("-"),
        date,
    )
}
