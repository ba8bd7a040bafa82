//! Platform-specific settings paths.

use crate::constants::{APP_NAME, CONFIG_ENV_VAR};
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/barcode-processor/`
/// - macOS: `~/Library/Application Support/barcode-processor/`
/// - Windows: `%APPDATA%\barcode-processor\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the settings file.
///
/// `BARCODE_PROCESSOR_CONFIG` takes precedence over the platform location.
pub fn config_file_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(config_dir()?.join("config.toml"))
}
