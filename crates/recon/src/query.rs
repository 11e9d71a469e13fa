//! Derived view over a relationship set: text search, recency filter, sort.
//!
//! Everything here is a pure function of `(rows, state, now)`. Callers
//! re-run [`apply`] whenever the rows or the filter state change.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::collate::compare_text;
use crate::model::RelationshipEntry;

/// Entries followed within this many days count as recent.
pub const RECENT_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Username,
    FullName,
    FollowedDate,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "username" => Ok(Self::Username),
            "fullname" => Ok(Self::FullName),
            "followeddate" | "date" => Ok(Self::FollowedDate),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    pub query: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub recent_only: bool,
}

/// Earliest instant still considered recent at `now`.
pub fn recent_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(RECENT_WINDOW_DAYS)
}

fn matches_query(row: &RelationshipEntry, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    row.account.username.to_lowercase().contains(query)
        || row
            .account
            .full_name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(query))
        || row.relationship.label().to_lowercase().contains(query)
}

fn matches_recent(row: &RelationshipEntry, cutoff: Option<DateTime<Utc>>) -> bool {
    match cutoff {
        None => true,
        // No date means "not recent".
        Some(cutoff) => row.account.followed_date.is_some_and(|d| d >= cutoff),
    }
}

fn compare_rows(a: &RelationshipEntry, b: &RelationshipEntry, field: SortField) -> Ordering {
    match field {
        SortField::Username => compare_text(&a.account.username, &b.account.username),
        SortField::FullName => compare_text(
            a.account.full_name.as_deref().unwrap_or(""),
            b.account.full_name.as_deref().unwrap_or(""),
        ),
        // None < Some: an absent date is the earliest possible instant.
        SortField::FollowedDate => a.account.followed_date.cmp(&b.account.followed_date),
    }
}

/// Filter and sort `rows` against `state`, evaluated at `now`.
pub fn apply(rows: &[RelationshipEntry], state: &SearchState, now: DateTime<Utc>) -> Vec<RelationshipEntry> {
    let query = state.query.to_lowercase();
    let cutoff = state.recent_only.then(|| recent_cutoff(now));

    let mut out: Vec<RelationshipEntry> = rows
        .iter()
        .filter(|row| matches_query(row, &query))
        .filter(|row| matches_recent(row, cutoff))
        .cloned()
        .collect();

    out.sort_by(|a, b| {
        let ord = compare_rows(a, b, state.sort_field);
        match state.sort_direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    out
}

/// [`apply`] at the current wall-clock time.
pub fn apply_now(rows: &[RelationshipEntry], state: &SearchState) -> Vec<RelationshipEntry> {
    apply(rows, state, Utc::now())
}
