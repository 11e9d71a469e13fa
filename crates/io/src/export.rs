// Export payloads: CSV, JSON, plain username list
//
// These only build the bytes. Writing them somewhere is the caller's job.

use std::str::FromStr;

use followscope_recon::model::{format_timestamp, RelationshipEntry};

use crate::error::ExportError;

pub const CSV_HEADER: [&str; 5] = ["username", "full_name", "user_id", "relationship", "followed_date"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Usernames,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Usernames => "txt",
        }
    }

    pub fn render(&self, rows: &[RelationshipEntry]) -> Result<String, ExportError> {
        match self {
            Self::Csv => to_csv(rows),
            Self::Json => to_json(rows),
            Self::Usernames => Ok(to_usernames(rows)),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "usernames" | "txt" => Ok(Self::Usernames),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// CSV with every field quoted, rows joined by `\n`, no trailing newline.
pub fn to_csv(rows: &[RelationshipEntry]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for row in rows {
        let account = &row.account;
        let followed = account.followed_date.as_ref().map(format_timestamp).unwrap_or_default();
        writer.write_record([
            account.username.as_str(),
            account.full_name.as_deref().unwrap_or(""),
            account.user_id.as_deref().unwrap_or(""),
            row.relationship.label(),
            followed.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Csv(e.into_error().into()))?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Pretty-printed JSON array of the rows as serialized.
pub fn to_json(rows: &[RelationshipEntry]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Usernames, one per line, in row order.
pub fn to_usernames(rows: &[RelationshipEntry]) -> String {
    rows.iter()
        .map(|r| r.account.username.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
