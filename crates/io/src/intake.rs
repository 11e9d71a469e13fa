//! Sequential intake of user-supplied export files.
//!
//! A [`Processor`] owns the accumulated followers/following lists. Files are
//! handled one at a time, in order; per-file problems become warnings and
//! the batch carries on. Only a source that cannot be read at all stops the
//! run, leaving whatever was gathered so far in place.

use std::path::{Path, PathBuf};

use serde::Serialize;

use followscope_recon::engine::reconcile;
use followscope_recon::model::{Account, ListKind, ParseSummary, RelationshipEntry, Relationships};

use crate::archive::{decode_text, extract_json_entries};
use crate::error::IntakeError;
use crate::parse::{infer_kind_from_file_name, parse_export_json};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Something that can be taken in: a name plus its bytes.
pub trait IntakeSource {
    fn name(&self) -> &str;
    fn read_bytes(&self) -> std::io::Result<Vec<u8>>;
}

impl<T: IntakeSource + ?Sized> IntakeSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        (**self).read_bytes()
    }
}

/// A file on disk, named by its file name.
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
    name: String,
}

impl PathSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IntakeSource for PathSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}

/// Bytes already in memory (uploads, tests).
#[derive(Debug, Clone)]
pub struct MemorySource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl IntakeSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Archive,
    Json,
    Unsupported,
}

impl FileType {
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".zip") {
            Self::Archive
        } else if lower.ends_with(".json") {
            Self::Json
        } else {
            Self::Unsupported
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Parsing,
    Ready,
    Error,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Parsing => write!(f, "parsing"),
            Self::Ready => write!(f, "ready"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub parsed_files: usize,
    pub total_files: usize,
    pub followers_count: usize,
    pub following_count: usize,
}

pub fn unknown_kind_warning(label: &str) -> String {
    format!("Could not infer list type for {label}. Name it followers_*.json or following*.json")
}

/// Owns the accumulated lists and the status reported to the front end.
#[derive(Debug, Default)]
pub struct Processor {
    status: Status,
    followers: Vec<Account>,
    following: Vec<Account>,
    warnings: Vec<String>,
    progress: Progress,
    error: Option<String>,
}

impl Processor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn followers(&self) -> &[Account] {
        &self.followers
    }

    pub fn following(&self) -> &[Account] {
        &self.following
    }

    /// Drop everything gathered so far and go back to idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Reconcile what has been gathered. `None` until either list has data.
    pub fn relationships(&self) -> Option<Relationships> {
        reconcile(&self.followers, &self.following)
    }

    /// All entries, don't-follow-back first, then fans, then mutuals.
    pub fn flat_results(&self) -> Option<Vec<RelationshipEntry>> {
        self.relationships().map(|r| r.flat())
    }

    pub fn summary(&self) -> ParseSummary {
        ParseSummary {
            followers: self.followers.clone(),
            following: self.following.clone(),
            warnings: self.warnings.clone(),
        }
    }

    pub fn process_files<S: IntakeSource>(&mut self, files: &[S]) -> Result<(), IntakeError> {
        self.process_files_with(files, |_| {})
    }

    /// Take in `files` in order, calling `on_progress` after each one.
    ///
    /// Starts from a clean slate. An empty slice leaves the current state
    /// untouched.
    pub fn process_files_with<S, F>(&mut self, files: &[S], mut on_progress: F) -> Result<(), IntakeError>
    where
        S: IntakeSource,
        F: FnMut(&Progress),
    {
        if files.is_empty() {
            return Ok(());
        }

        self.reset();
        self.status = Status::Parsing;
        self.progress.total_files = files.len();

        for (i, file) in files.iter().enumerate() {
            if let Err(e) = self.process_one(file) {
                log::error!("intake stopped at {}: {e}", file.name());
                self.error = Some(e.to_string());
                self.status = Status::Error;
                return Err(e);
            }
            self.progress.parsed_files = i + 1;
            on_progress(&self.progress);
        }

        log::info!(
            "intake complete: {} files, {} followers, {} following, {} warnings",
            files.len(),
            self.followers.len(),
            self.following.len(),
            self.warnings.len(),
        );
        self.status = Status::Ready;
        Ok(())
    }

    fn process_one<S: IntakeSource>(&mut self, file: &S) -> Result<(), IntakeError> {
        let name = file.name();
        let file_type = FileType::from_name(name);
        if file_type == FileType::Unsupported {
            self.warn(IntakeError::Unsupported(name.to_string()), format!("Skipped unsupported file: {name}"));
            return Ok(());
        }

        let bytes = file.read_bytes().map_err(|source| IntakeError::Read {
            name: name.to_string(),
            source,
        })?;
        log::debug!("processing {name} ({} bytes)", bytes.len());

        match file_type {
            FileType::Archive => self.process_archive(name, &bytes),
            FileType::Json => self.process_json(name, &bytes),
            FileType::Unsupported => {}
        }
        Ok(())
    }

    fn process_archive(&mut self, name: &str, bytes: &[u8]) {
        let entries = match extract_json_entries(bytes, name) {
            Ok(entries) => entries,
            Err(e) => {
                let message = format!("Could not read archive {name}: {e}");
                self.warn(e, message);
                return;
            }
        };

        for entry in entries {
            let parsed = parse_export_json(&entry.text, &entry.name);
            let kind = match parsed.kind {
                ListKind::Unknown => infer_kind_from_file_name(&entry.name),
                kind => kind,
            };
            self.accept(kind, parsed.accounts, &entry.name);
        }
    }

    fn process_json(&mut self, name: &str, bytes: &[u8]) {
        let text = decode_text(bytes);
        let parsed = parse_export_json(&text, name);
        let kind = match parsed.kind {
            ListKind::Unknown => {
                let message = format!("Could not recognize {name} as a followers or following export");
                log::warn!("{message}");
                self.warnings.push(message);
                infer_kind_from_file_name(name)
            }
            kind => kind,
        };
        self.accept(kind, parsed.accounts, name);
    }

    fn accept(&mut self, kind: ListKind, accounts: Vec<Account>, label: &str) {
        match kind {
            ListKind::Followers => {
                log::debug!("{label}: {} followers", accounts.len());
                self.followers.extend(accounts);
                self.progress.followers_count = self.followers.len();
            }
            ListKind::Following => {
                log::debug!("{label}: {} following", accounts.len());
                self.following.extend(accounts);
                self.progress.following_count = self.following.len();
            }
            ListKind::Unknown => {
                let message = unknown_kind_warning(label);
                log::warn!("{message}");
                self.warnings.push(message);
            }
        }
    }

    fn warn(&mut self, cause: IntakeError, message: String) {
        log::warn!("{cause}");
        self.warnings.push(message);
    }
}
