//! Settings file loading.

use crate::config::settings::{Settings, validate_settings};
use crate::error::{Error, Result};
use std::path::Path;

/// Load settings from a TOML file.
///
/// Returns default settings if the file does not exist.
pub fn load_config_file(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let settings: Settings = toml::from_str(&contents).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_settings(&settings)?;
    Ok(settings)
}

/// Load settings from the default location.
///
/// Returns default settings if no settings file exists or no location can be
/// determined for this platform.
pub fn load_default_config() -> Result<Settings> {
    super::config_file_path().map_or_else(|_| Ok(Settings::default()), |path| load_config_file(&path))
}
