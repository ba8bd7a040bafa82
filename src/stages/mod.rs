//! Stage handlers and their registry.
//!
//! Each stage of the analysis is served by one [`StageHandler`]. Handlers are
//! registered once at startup in a [`StageRegistry`]; the dispatcher looks
//! them up by [`Stage`] and never reaches past this interface.

mod manifest;

pub use manifest::{MANIFEST_VERSION, ManifestHandler, StageManifest, manifest_path};

use crate::config::StageConfig;
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A single, non-composite analysis stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Fastq download.
    Download,
    /// Fastq QC filter.
    Filter,
    /// Read counting.
    Count,
    /// Statistical test.
    Test,
    /// Pathway enrichment.
    Pathway,
    /// Plotting.
    Plot,
    /// MLE essentiality estimation.
    Mle,
}

impl Stage {
    /// Every stage, in pipeline order.
    pub const ALL: [Self; 7] = [
        Self::Download,
        Self::Filter,
        Self::Count,
        Self::Test,
        Self::Pathway,
        Self::Plot,
        Self::Mle,
    ];

    /// Stage name, matching its subcommand.
    pub fn name(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Filter => "filter",
            Self::Count => "count",
            Self::Test => "test",
            Self::Pathway => "pathway",
            Self::Plot => "plot",
            Self::Mle => "mle",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure reported by a stage handler.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// Writing a stage output failed.
    #[error("failed to write '{path}': {source}")]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serializing a stage output failed.
    #[error("failed to serialize stage output: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Any other handler failure.
    #[error("{message}")]
    Failed {
        /// Description of the failure.
        message: String,
    },
}

impl StageError {
    /// Short name of the failure kind, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Write { .. } => "WriteError",
            Self::Serialize(_) => "SerializeError",
            Self::Failed { .. } => "StageFailure",
        }
    }
}

/// Runs one stage with its resolved configuration.
///
/// Returning `Err` marks the stage as failed; for `run` no later stage is
/// invoked.
pub trait StageHandler {
    /// Execute the stage.
    fn handle(&self, config: &StageConfig) -> std::result::Result<(), StageError>;
}

impl<F> StageHandler for F
where
    F: Fn(&StageConfig) -> std::result::Result<(), StageError>,
{
    fn handle(&self, config: &StageConfig) -> std::result::Result<(), StageError> {
        self(config)
    }
}

/// Explicit mapping from stage to handler.
#[derive(Default)]
pub struct StageRegistry {
    handlers: BTreeMap<Stage, Box<dyn StageHandler>>,
}

impl StageRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in [`ManifestHandler`] for every stage.
    pub fn with_manifest_handlers() -> Self {
        let mut registry = Self::new();
        for stage in Stage::ALL {
            registry.handlers.insert(stage, Box::new(ManifestHandler));
        }
        registry
    }

    /// Register `handler` for `stage`. A stage can only be registered once.
    pub fn register(&mut self, stage: Stage, handler: impl StageHandler + 'static) -> Result<()> {
        if self.handlers.contains_key(&stage) {
            return Err(Error::DuplicateHandler { stage });
        }
        self.handlers.insert(stage, Box::new(handler));
        Ok(())
    }

    /// Handler registered for `stage`.
    pub fn handler(&self, stage: Stage) -> Result<&dyn StageHandler> {
        self.handlers
            .get(&stage)
            .map(AsRef::as_ref)
            .ok_or(Error::HandlerMissing { stage })
    }

    /// Stages with a registered handler.
    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.handlers.keys().copied()
    }
}

impl fmt::Debug for StageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageRegistry")
            .field("stages", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
