//! `fscope export`: write the filtered view as CSV, JSON, or a username list.
//!
//! The payload is built first; delivering it (file or stdout) is a separate
//! step whose failure does not change what was built.

use std::io::Write;
use std::path::{Path, PathBuf};

use followscope_config::Settings;
use followscope_io::ExportFormat;

use crate::exit_codes::{EXIT_EXPORT_SERIALIZE, EXIT_EXPORT_WRITE};
use crate::intake::{check_strict, print_warnings, require_relationships, run_intake, Category, IntakeArgs, ViewArgs};
use crate::CliError;

/// Default file name inside a target directory, e.g. `followscope-fans.csv`.
pub fn default_file_name(stem: &str, category: Category, format: ExportFormat) -> String {
    format!("{stem}-{}.{}", category.label(), format.extension())
}

/// Where the payload should go. `None` or `-` means stdout; a directory
/// gets the default file name.
fn resolve_destination(output: Option<&Path>, stem: &str, category: Category, format: ExportFormat) -> Option<PathBuf> {
    let path = output?;
    if path.as_os_str() == "-" {
        return None;
    }
    if path.is_dir() {
        return Some(path.join(default_file_name(stem, category, format)));
    }
    Some(path.to_path_buf())
}

pub fn cmd_export(
    intake: IntakeArgs,
    view: ViewArgs,
    format: Option<ExportFormat>,
    output: Option<PathBuf>,
    settings: &Settings,
) -> Result<(), CliError> {
    let processor = run_intake(&intake).into_result()?;
    print_warnings(&processor);
    let relationships = require_relationships(&processor)?;

    let rows = view.select(&relationships, settings);
    let format = format.unwrap_or(settings.export_format);

    let payload = format.render(&rows).map_err(|e| CliError {
        code: EXIT_EXPORT_SERIALIZE,
        message: e.to_string(),
        hint: None,
    })?;

    match resolve_destination(output.as_deref(), &settings.export_file_stem, view.category, format) {
        Some(path) => {
            std::fs::write(&path, payload.as_bytes()).map_err(|e| CliError {
                code: EXIT_EXPORT_WRITE,
                message: format!("cannot write {}: {e}", path.display()),
                hint: Some("the export was built; retry with a different --output or '-' for stdout".to_string()),
            })?;
            eprintln!("wrote {} ({} rows)", path.display(), rows.len());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(payload.as_bytes())
                .and_then(|_| if payload.is_empty() { Ok(()) } else { stdout.write_all(b"\n") })
                .and_then(|_| stdout.flush())
                .map_err(|e| CliError {
                    code: EXIT_EXPORT_WRITE,
                    message: format!("cannot write to stdout: {e}"),
                    hint: None,
                })?;
        }
    }

    check_strict(&intake, &processor)
}
