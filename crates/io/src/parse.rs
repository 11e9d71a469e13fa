//! Export JSON parsing.
//!
//! The export uses two unrelated document shapes for the two lists:
//!
//! ```text
//! followers_1.json (top-level array):
//! [
//!   {
//!     "title": "",
//!     "media_list_data": [],
//!     "string_list_data": [
//!       { "href": "https://www.instagram.com/alice", "value": "alice", "timestamp": 1700000000 }
//!     ]
//!   }
//! ]
//!
//! following.json (object keyed by relationships_following):
//! {
//!   "relationships_following": [
//!     {
//!       "title": "bob",
//!       "string_list_data": [
//!         { "href": "https://www.instagram.com/_u/bob", "timestamp": 1700000200 }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! [`detect_shape`] tries the following shape first, then the followers
//! shape. Anything else, including text that is not JSON, is `Unknown`.

use chrono::{DateTime, Utc};
use serde_json::Value;

use followscope_recon::identity::{dedupe_by, username_key};
use followscope_recon::model::{Account, ListKind};

const FOLLOWING_KEY: &str = "relationships_following";
const STRING_LIST_KEY: &str = "string_list_data";

/// Largest absolute millisecond offset a date may have (±100,000,000 days).
const MAX_EPOCH_MS: f64 = 8.64e15;

/// Values above this are already milliseconds; below, seconds.
const MS_THRESHOLD: f64 = 1e12;

/// Result of parsing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    pub kind: ListKind,
    pub accounts: Vec<Account>,
}

impl ParsedFile {
    pub fn unknown() -> Self {
        Self {
            kind: ListKind::Unknown,
            accounts: Vec::new(),
        }
    }
}

/// Which structure a parsed document has.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportShape<'a> {
    /// Object holding the `relationships_following` array.
    Following(&'a [Value]),
    /// Non-empty top-level array whose first element has `string_list_data`.
    Followers(&'a [Value]),
    Unknown,
}

impl ExportShape<'_> {
    pub fn kind(&self) -> ListKind {
        match self {
            Self::Following(_) => ListKind::Following,
            Self::Followers(_) => ListKind::Followers,
            Self::Unknown => ListKind::Unknown,
        }
    }
}

/// Classify a document. Precedence matters: following first.
pub fn detect_shape(doc: &Value) -> ExportShape<'_> {
    if let Some(list) = doc
        .as_object()
        .and_then(|obj| obj.get(FOLLOWING_KEY))
        .and_then(Value::as_array)
    {
        return ExportShape::Following(list);
    }

    if let Some(list) = doc.as_array() {
        let has_string_list = list
            .first()
            .and_then(|first| first.get(STRING_LIST_KEY))
            .is_some_and(Value::is_array);
        if has_string_list {
            return ExportShape::Followers(list);
        }
    }

    ExportShape::Unknown
}

/// Normalize a raw export timestamp (seconds or milliseconds, number or
/// numeric string) to a UTC instant.
///
/// The number `0` and the empty string mean "no timestamp". A numeric
/// string is taken at face value, so `"0"` is the epoch. Non-numeric and
/// out-of-range values are absent.
pub fn normalize_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    let n = match raw {
        Value::Number(n) => {
            let n = n.as_f64()?;
            if n == 0.0 {
                return None;
            }
            n
        }
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };

    if !n.is_finite() {
        return None;
    }

    let ms = if n > MS_THRESHOLD { n } else { n * 1000.0 };
    if !ms.is_finite() || ms.abs() > MAX_EPOCH_MS {
        return None;
    }
    DateTime::from_timestamp_millis(ms.trunc() as i64)
}

fn trimmed_str<'a>(value: Option<&'a Value>) -> &'a str {
    value.and_then(Value::as_str).map(str::trim).unwrap_or("")
}

fn first_string_list_item(entry: &Value) -> Option<&Value> {
    entry.get(STRING_LIST_KEY)?.as_array()?.first()
}

/// Followers element: handle in `string_list_data[0].value`, optional
/// display name in `title`.
fn parse_follower_entry(entry: &Value, source: &str) -> Option<Account> {
    if !entry.is_object() {
        return None;
    }
    let data = first_string_list_item(entry)?;

    let username = trimmed_str(data.get("value"));
    if username.is_empty() {
        return None;
    }

    let title = trimmed_str(entry.get("title"));
    Some(Account {
        username: username.to_string(),
        full_name: (!title.is_empty()).then(|| title.to_string()),
        followed_date: data.get("timestamp").and_then(normalize_timestamp),
        source: Some(source.to_string()),
        ..Account::default()
    })
}

/// Following element: handle in `title`, timestamp in
/// `string_list_data[0].timestamp`.
fn parse_following_entry(entry: &Value, source: &str) -> Option<Account> {
    if !entry.is_object() {
        return None;
    }

    let username = trimmed_str(entry.get("title"));
    if username.is_empty() {
        return None;
    }

    Some(Account {
        username: username.to_string(),
        followed_date: first_string_list_item(entry)
            .and_then(|data| data.get("timestamp"))
            .and_then(normalize_timestamp),
        source: Some(source.to_string()),
        ..Account::default()
    })
}

fn collect<F>(list: &[Value], source: &str, parse_entry: F) -> Vec<Account>
where
    F: Fn(&Value, &str) -> Option<Account>,
{
    let accounts: Vec<Account> = list.iter().filter_map(|e| parse_entry(e, source)).collect();
    dedupe_by(&accounts, username_key).into_accounts()
}

fn parse_shape(shape: ExportShape<'_>, source: &str) -> ParsedFile {
    match shape {
        ExportShape::Following(list) => ParsedFile {
            kind: ListKind::Following,
            accounts: collect(list, source, parse_following_entry),
        },
        ExportShape::Followers(list) => ParsedFile {
            kind: ListKind::Followers,
            accounts: collect(list, source, parse_follower_entry),
        },
        ExportShape::Unknown => ParsedFile::unknown(),
    }
}

/// Parse a document of either shape, detecting which one it is.
/// Malformed JSON is `Unknown` with no accounts, never an error.
pub fn parse_export_json(text: &str, source: &str) -> ParsedFile {
    let doc: Value = match serde_json::from_str(text) {
        Ok(doc) => doc,
        Err(e) => {
            log::debug!("{source}: not valid JSON ({e})");
            return ParsedFile::unknown();
        }
    };
    parse_shape(detect_shape(&doc), source)
}

/// Parse a followers-shaped document. Anything else yields no accounts.
pub fn parse_followers_json(text: &str, source: &str) -> Vec<Account> {
    let Ok(doc) = serde_json::from_str::<Value>(text) else {
        return Vec::new();
    };
    match doc.as_array() {
        Some(list) => collect(list, source, parse_follower_entry),
        None => Vec::new(),
    }
}

/// Parse a following-shaped document. Anything else yields no accounts.
pub fn parse_following_json(text: &str, source: &str) -> Vec<Account> {
    let Ok(doc) = serde_json::from_str::<Value>(text) else {
        return Vec::new();
    };
    match detect_shape(&doc) {
        ExportShape::Following(list) => collect(list, source, parse_following_entry),
        _ => Vec::new(),
    }
}

/// Guess the list kind from a file name alone.
pub fn infer_kind_from_file_name(name: &str) -> ListKind {
    let lower = name.to_lowercase();
    if lower.contains("followers") {
        ListKind::Followers
    } else if lower.contains("following") {
        ListKind::Following
    } else {
        ListKind::Unknown
    }
}
