// Configuration loading

pub mod settings;

pub use settings::{Settings, SettingsError};

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "FOLLOWSCOPE_CONFIG_DIR";
