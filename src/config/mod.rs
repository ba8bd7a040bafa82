//! Configuration: resolved stage settings and user settings.

mod design;
mod file;
mod normalize;
mod paths;
mod selector;
mod settings;
mod types;

pub use design::{DesignGrid, DesignMatrixRef};
pub use file::{load_config_file, load_default_config};
pub use normalize::normalize;
pub use paths::{config_dir, config_file_path};
pub use selector::{ControlSelection, SampleId, SampleSelector};
pub use settings::{LoggingSettings, Settings, validate_settings};
pub use types::{
    AdjustMethod, ColumnRef, CountConfig, DownloadConfig, FilterConfig, Invocation, MleConfig,
    NormMethod, PathwayConfig, PlotConfig, RemoveZero, SortCriteria, StageConfig, Subcommand,
    TestConfig,
};
