// Application settings
// Loaded from ~/.config/followscope/settings.json

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use followscope_io::ExportFormat;
use followscope_recon::query::{SearchState, SortDirection, SortField};

use crate::CONFIG_DIR_ENV;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // View
    #[serde(rename = "view.sortField")]
    pub sort_field: SortField,

    #[serde(rename = "view.sortDirection")]
    pub sort_direction: SortDirection,

    #[serde(rename = "view.recentOnly")]
    pub recent_only: bool,

    // Export
    #[serde(rename = "export.format")]
    pub export_format: ExportFormat,

    /// Base name for exported files, without extension.
    #[serde(rename = "export.fileStem")]
    pub export_file_stem: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sort_field: SortField::Username,
            sort_direction: SortDirection::Asc,
            recent_only: false,
            export_format: ExportFormat::Csv,
            export_file_stem: "followscope".to_string(),
        }
    }
}

const DEFAULT_FILE: &str = r#"{
    // Initial sort for listings: "username", "fullName", "followedDate"
    "view.sortField": "username",
    "view.sortDirection": "asc",

    // Only show accounts followed in the last 90 days
    "view.recentOnly": false,

    // Export format: "csv", "json", "usernames"
    "export.format": "csv",
    "export.fileStem": "followscope"
}
"#;

impl Settings {
    /// Directory holding settings.json
    pub fn config_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return PathBuf::from(dir);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("followscope")
    }

    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        Self::load_in(&Self::config_dir())
    }

    /// Load `settings.json` from `dir`, writing the default file there if
    /// it does not exist yet.
    pub fn load_in(dir: &Path) -> Self {
        let path = dir.join("settings.json");

        if !path.exists() {
            let settings = Self::default();
            if let Err(e) = Self::create_default_file(&path) {
                log::warn!("{e}");
            }
            return settings;
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn from_json(contents: &str) -> Result<Self, SettingsError> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(serde_json::from_str(&cleaned)?)
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        ensure_parent(path)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Write the commented default file
    fn create_default_file(path: &Path) -> Result<(), SettingsError> {
        ensure_parent(path)?;
        fs::write(path, DEFAULT_FILE).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Initial query view state for listings and exports.
    pub fn search_state(&self) -> SearchState {
        SearchState {
            query: String::new(),
            sort_field: self.sort_field,
            sort_direction: self.sort_direction,
            recent_only: self.recent_only,
        }
    }
}

fn ensure_parent(path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    Ok(())
}
