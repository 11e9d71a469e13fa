use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One external account observed in one list.
///
/// `username` is never empty for an account that made it out of the parser.
/// Every other field is optional; the export format rarely fills in more
/// than the handle and the follow timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp")]
    pub followed_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    /// Originating file or archive entry. Diagnostics only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Account {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }
}

/// Which relationship list a document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Followers,
    Following,
    Unknown,
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Followers => write!(f, "followers"),
            Self::Following => write!(f, "following"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    /// Follows the user, not followed back.
    Fans,
    /// Followed by the user, does not follow back.
    DontFollowBack,
    Mutuals,
}

impl RelationshipKind {
    pub const ALL: [RelationshipKind; 3] = [Self::DontFollowBack, Self::Fans, Self::Mutuals];

    /// Label used in exports and matched by the text filter.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fans => "fans",
            Self::DontFollowBack => "dontFollowBack",
            Self::Mutuals => "mutuals",
        }
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An account tagged with exactly one relationship kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEntry {
    #[serde(flatten)]
    pub account: Account,
    pub relationship: RelationshipKind,
}

impl RelationshipEntry {
    pub fn new(account: Account, relationship: RelationshipKind) -> Self {
        Self { account, relationship }
    }

    pub fn username(&self) -> &str {
        &self.account.username
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

/// The three disjoint result sets of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationships {
    pub fans: Vec<RelationshipEntry>,
    pub dont_follow_back: Vec<RelationshipEntry>,
    pub mutuals: Vec<RelationshipEntry>,
}

impl Relationships {
    pub fn get(&self, kind: RelationshipKind) -> &[RelationshipEntry] {
        match kind {
            RelationshipKind::Fans => &self.fans,
            RelationshipKind::DontFollowBack => &self.dont_follow_back,
            RelationshipKind::Mutuals => &self.mutuals,
        }
    }

    /// All entries: don't-follow-back first, then fans, then mutuals.
    pub fn flat(&self) -> Vec<RelationshipEntry> {
        RelationshipKind::ALL
            .iter()
            .flat_map(|kind| self.get(*kind).iter().cloned())
            .collect()
    }

    pub fn summary(&self) -> RelationshipSummary {
        RelationshipSummary {
            fans: self.fans.len(),
            dont_follow_back: self.dont_follow_back.len(),
            mutuals: self.mutuals.len(),
            total: self.fans.len() + self.dont_follow_back.len() + self.mutuals.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipSummary {
    pub fans: usize,
    pub dont_follow_back: usize,
    pub mutuals: usize,
    pub total: usize,
}

/// Snapshot of what has been accumulated so far.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseSummary {
    pub followers: Vec<Account>,
    pub following: Vec<Account>,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Timestamp format
// ---------------------------------------------------------------------------

/// RFC 3339 UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => s.serialize_str(&super::format_timestamp(ts)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw {
            Some(s) => DateTime::parse_from_rfc3339(&s)
                .map(|ts| Some(ts.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
