// followscope CLI - compare Instagram followers/following exports

mod exit_codes;
mod export;
mod intake;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use followscope_config::{Settings, CONFIG_DIR_ENV};
use followscope_io::ExportFormat;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};
use intake::{IntakeArgs, ViewArgs};

#[derive(Parser)]
#[command(name = "fscope")]
#[command(about = "Find who doesn't follow you back, from an Instagram data export")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding settings.json
    #[arg(long, env = CONFIG_DIR_ENV, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the export and print counts for each relationship set
    #[command(after_help = "\
Examples:
  fscope summary instagram-export.zip
  fscope summary followers_1.json following.json --json
  fscope summary export-part1.zip export-part2.zip --strict")]
    Summary {
        #[command(flatten)]
        intake: IntakeArgs,

        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Print accounts from one relationship set, filtered and sorted
    #[command(after_help = "\
Examples:
  fscope list export.zip -c dont-follow-back
  fscope list export.zip -c mutuals -q smith --sort full-name
  fscope list export.zip --recent --sort followed-date --desc
  fscope list export.zip -c fans --json")]
    List {
        #[command(flatten)]
        intake: IntakeArgs,

        #[command(flatten)]
        view: ViewArgs,

        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Write the filtered view as CSV, JSON, or a plain username list
    #[command(after_help = "\
Examples:
  fscope export export.zip -c dont-follow-back -f usernames
  fscope export export.zip -f csv -o unfollowers.csv
  fscope export export.zip -c mutuals -f json -o ./out/
  fscope export export.zip -o - | wc -l")]
    Export {
        #[command(flatten)]
        intake: IntakeArgs,

        #[command(flatten)]
        view: ViewArgs,

        /// Output format: csv, json or usernames (default from settings)
        #[arg(long, short = 'f', value_name = "FORMAT")]
        format: Option<ExportFormat>,

        /// Output file or directory ('-' or omitted: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => Err(CliError::usage("no command given")),
        Some(command) => {
            let settings = match &cli.config_dir {
                Some(dir) => Settings::load_in(dir),
                None => Settings::load(),
            };
            log::debug!("settings: {:?}", settings);
            match command {
                Commands::Summary { intake, json } => report::cmd_summary(intake, json),
                Commands::List { intake, view, json } => report::cmd_list(intake, view, json, &settings),
                Commands::Export { intake, view, format, output } => {
                    export::cmd_export(intake, view, format, output, &settings)
                }
            }
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: Some("run 'fscope --help' for the list of commands".to_string()),
        }
    }
}
