//! User settings read from the TOML settings file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

/// Complete user settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log sink settings.
    pub logging: LoggingSettings,
}

/// Severity thresholds of the two log sinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Minimum level written to the console.
    pub console_level: String,
    /// Minimum level written to `<output-prefix>.log`.
    pub file_level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            console_level: "info".to_string(),
            file_level: "debug".to_string(),
        }
    }
}

impl LoggingSettings {
    /// Console threshold as a level filter.
    pub fn console_filter(&self) -> Result<LevelFilter> {
        parse_level("console_level", &self.console_level)
    }

    /// File threshold as a level filter.
    pub fn file_filter(&self) -> Result<LevelFilter> {
        parse_level("file_level", &self.file_level)
    }
}

/// Validate the settings.
pub fn validate_settings(settings: &Settings) -> Result<()> {
    settings.logging.console_filter()?;
    settings.logging.file_filter()?;
    Ok(())
}

fn parse_level(key: &str, value: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(value).map_err(|_| Error::ConfigValidation {
        message: format!(
            "logging.{key} must be one of off, error, warn, info, debug, trace; got '{value}'"
        ),
    })
}
