//! Built-in stage handler writing the resolved configuration as JSON.
//!
//! Every stage leaves a `<output-prefix>.<stage>.json` manifest behind, so
//! downstream tooling can pick up exactly what was requested.

use super::{Stage, StageError, StageHandler};
use crate::config::StageConfig;
use crate::constants::output_extensions;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Manifest format version.
pub const MANIFEST_VERSION: &str = "1.0";

/// JSON envelope around a resolved stage configuration.
#[derive(Debug, Serialize)]
pub struct StageManifest<'a> {
    /// Manifest format version.
    pub spec_version: &'static str,
    /// Time the manifest was written.
    pub timestamp: DateTime<Utc>,
    /// Stage the configuration belongs to.
    pub stage: Stage,
    /// Resolved configuration.
    pub config: &'a StageConfig,
}

impl<'a> StageManifest<'a> {
    /// Wrap `config` with the current timestamp.
    pub fn new(config: &'a StageConfig) -> Self {
        Self {
            spec_version: MANIFEST_VERSION,
            timestamp: Utc::now(),
            stage: config.stage(),
            config,
        }
    }
}

/// Manifest location for `config`: `<output-prefix>.<stage>.json`.
pub fn manifest_path(config: &StageConfig) -> PathBuf {
    PathBuf::from(format!(
        "{}.{}{}",
        config.output_prefix(),
        config.stage(),
        output_extensions::MANIFEST
    ))
}

/// Handler that records the stage configuration as a JSON manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestHandler;

impl StageHandler for ManifestHandler {
    fn handle(&self, config: &StageConfig) -> Result<(), StageError> {
        let path = manifest_path(config);
        let manifest = StageManifest::new(config);
        let mut json = serde_json::to_string_pretty(&manifest).map_err(StageError::Serialize)?;
        json.push('\n');

        std::fs::write(&path, json).map_err(|source| StageError::Write {
            path: path.clone(),
            source,
        })?;

        info!("{} configuration written to {}", config.stage(), path.display());
        Ok(())
    }
}
