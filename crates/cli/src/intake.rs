//! Shared plumbing for every command: take in the files, build the view.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use followscope_config::Settings;
use followscope_io::{PathSource, Processor};
use followscope_recon::model::{RelationshipEntry, RelationshipKind, Relationships};
use followscope_recon::query::{apply_now, SearchState, SortDirection, SortField};

use crate::exit_codes::{EXIT_INTAKE_EMPTY, EXIT_INTAKE_FATAL, EXIT_INTAKE_WARNINGS};
use crate::CliError;

#[derive(Args, Debug)]
pub struct IntakeArgs {
    /// Export archives (.zip) and/or followers/following .json files
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Fail (exit 5) if any file produced a warning
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Category {
    All,
    Fans,
    DontFollowBack,
    Mutuals,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Fans => "fans",
            Self::DontFollowBack => "dont-follow-back",
            Self::Mutuals => "mutuals",
        }
    }

    pub fn rows(&self, relationships: &Relationships) -> Vec<RelationshipEntry> {
        let kind = match self {
            Self::All => return relationships.flat(),
            Self::Fans => RelationshipKind::Fans,
            Self::DontFollowBack => RelationshipKind::DontFollowBack,
            Self::Mutuals => RelationshipKind::Mutuals,
        };
        relationships.get(kind).to_vec()
    }
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Which relationship set to show
    #[arg(long, short = 'c', value_enum, default_value = "all")]
    pub category: Category,

    /// Case-insensitive text filter (username, full name, relationship)
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Sort field: username, full-name or followed-date (default from settings)
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<SortField>,

    /// Sort descending
    #[arg(long, conflicts_with = "asc")]
    pub desc: bool,

    /// Sort ascending
    #[arg(long)]
    pub asc: bool,

    /// Only accounts followed within the last 90 days
    #[arg(long)]
    pub recent: bool,

    /// Show every follow date, even if settings enable the recent filter
    #[arg(long, conflicts_with = "recent")]
    pub all_dates: bool,
}

impl ViewArgs {
    /// Settings supply the defaults; flags override them.
    pub fn search_state(&self, settings: &Settings) -> SearchState {
        let mut state = settings.search_state();
        if let Some(q) = &self.query {
            state.query = q.clone();
        }
        if let Some(sort) = self.sort {
            state.sort_field = sort;
        }
        if self.desc {
            state.sort_direction = SortDirection::Desc;
        } else if self.asc {
            state.sort_direction = SortDirection::Asc;
        }
        if self.recent {
            state.recent_only = true;
        } else if self.all_dates {
            state.recent_only = false;
        }
        state
    }

    pub fn select(&self, relationships: &Relationships, settings: &Settings) -> Vec<RelationshipEntry> {
        let rows = self.category.rows(relationships);
        apply_now(&rows, &self.search_state(settings))
    }
}

/// Outcome of taking in the command's files. A fatal read error leaves
/// the processor in the error state with whatever was read before it.
pub struct Intake {
    pub processor: Processor,
    pub fatal: Option<CliError>,
}

impl Intake {
    /// The processor, or the fatal error if intake stopped early.
    pub fn into_result(self) -> Result<Processor, CliError> {
        match self.fatal {
            Some(err) => Err(err),
            None => Ok(self.processor),
        }
    }
}

/// Run intake over `args.files`. Warnings are left on the processor.
pub fn run_intake(args: &IntakeArgs) -> Intake {
    let sources: Vec<PathSource> = args.files.iter().map(PathSource::new).collect();
    let mut processor = Processor::new();

    let fatal = processor
        .process_files_with(&sources, |progress| {
            log::info!(
                "parsed {}/{} files ({} followers, {} following)",
                progress.parsed_files,
                progress.total_files,
                progress.followers_count,
                progress.following_count,
            );
        })
        .err()
        .map(|e| CliError {
            code: EXIT_INTAKE_FATAL,
            message: e.to_string(),
            hint: Some("fix or drop that file and retry; 'fscope summary' shows what was read before it".to_string()),
        });

    Intake { processor, fatal }
}

/// The reconciled sets, or an error if neither list was found.
pub fn require_relationships(processor: &Processor) -> Result<Relationships, CliError> {
    processor.relationships().ok_or_else(|| CliError {
        code: EXIT_INTAKE_EMPTY,
        message: "no followers or following list found in the given files".to_string(),
        hint: Some("pass the export .zip, or followers_*.json / following.json".to_string()),
    })
}

pub fn print_warnings(processor: &Processor) {
    for warning in processor.warnings() {
        eprintln!("warning: {warning}");
    }
}

/// Under `--strict`, any warning fails the command after output is written.
pub fn check_strict(args: &IntakeArgs, processor: &Processor) -> Result<(), CliError> {
    let count = processor.warnings().len();
    if args.strict && count > 0 {
        return Err(CliError {
            code: EXIT_INTAKE_WARNINGS,
            message: format!("{count} warning(s) during intake (--strict)"),
            hint: None,
        });
    }
    Ok(())
}
