//! Error types for barcode-processor.

use crate::constants::exit_codes;
use crate::stages::{Stage, StageError};

/// Result type alias for barcode-processor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for barcode-processor.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Command line could not be parsed.
    #[error(transparent)]
    ArgumentSyntax(#[from] clap::Error),

    /// An option value broke a validation rule.
    #[error("invalid value for --{flag}: {rule}")]
    Validation {
        /// Long name of the offending option, without dashes.
        flag: &'static str,
        /// Description of the rule that was broken.
        rule: String,
    },

    /// The log file could not be opened.
    #[error("cannot open log file '{path}': {source}")]
    LoggingInit {
        /// Path to the log file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A global log subscriber was already installed in this process.
    #[error("logging has already been initialized for this process")]
    LoggingAlreadyInitialized,

    /// A stage handler reported a failure.
    #[error("stage '{stage}' failed: {source}")]
    StageExecution {
        /// Stage whose handler failed.
        stage: Stage,
        /// Failure reported by the handler.
        #[source]
        source: StageError,
    },

    /// A stage was registered twice.
    #[error("a handler for stage '{stage}' is already registered")]
    DuplicateHandler {
        /// Stage registered twice.
        stage: Stage,
    },

    /// No handler is registered for a stage.
    #[error("no handler registered for stage '{stage}'")]
    HandlerMissing {
        /// Stage without a handler.
        stage: Stage,
    },

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Settings validation failed.
    #[error("settings validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to read settings file.
    #[error("failed to read settings file '{path}'")]
    ConfigRead {
        /// Path to the settings file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse settings file.
    #[error("failed to parse settings file '{path}'")]
    ConfigParse {
        /// Path to the settings file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a validation error for `flag`.
    pub fn validation(flag: &'static str, rule: impl Into<String>) -> Self {
        Self::Validation {
            flag,
            rule: rule.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ArgumentSyntax(e) => e.exit_code(),
            _ => exit_codes::FAILURE,
        }
    }
}
