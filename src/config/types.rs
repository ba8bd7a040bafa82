//! Resolved configuration types.
//!
//! Every value here has passed validation: defaults are applied, numbers are
//! coerced, choices are checked and multi-value options are flattened.
//! Handlers only ever see these through shared references.

use crate::config::design::DesignMatrixRef;
use crate::config::selector::{ControlSelection, SampleSelector};
use crate::stages::Stage;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

fn unknown_choice(value: &str, choices: &[&str]) -> String {
    format!("'{value}' is not one of: {}", choices.join(", "))
}

/// Read count normalization method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NormMethod {
    /// No normalization.
    None,
    /// Median normalization.
    Median,
    /// Normalization by total read counts.
    Total,
    /// Normalization by control barcodes.
    Control,
}

impl NormMethod {
    const CHOICES: [&'static str; 4] = ["none", "median", "total", "control"];
}

impl FromStr for NormMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "median" => Ok(Self::Median),
            "total" => Ok(Self::Total),
            "control" => Ok(Self::Control),
            other => Err(unknown_choice(other, &Self::CHOICES)),
        }
    }
}

impl fmt::Display for NormMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Median => "median",
            Self::Total => "total",
            Self::Control => "control",
        };
        f.write_str(name)
    }
}

/// Barcode-level p-value adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustMethod {
    /// False discovery rate.
    Fdr,
    /// Holm's method.
    Holm,
    /// Pounds's method.
    Pounds,
}

impl FromStr for AdjustMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fdr" => Ok(Self::Fdr),
            "holm" => Ok(Self::Holm),
            "pounds" => Ok(Self::Pounds),
            other => Err(unknown_choice(other, &["fdr", "holm", "pounds"])),
        }
    }
}

/// Selection direction used to sort results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortCriteria {
    /// Negative selection.
    Neg,
    /// Positive selection.
    Pos,
}

impl FromStr for SortCriteria {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "neg" => Ok(Self::Neg),
            "pos" => Ok(Self::Pos),
            other => Err(unknown_choice(other, &["neg", "pos"])),
        }
    }
}

/// Which experiments drop zero-count barcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoveZero {
    /// Keep every barcode.
    None,
    /// Drop barcodes with zero count in control samples.
    Control,
    /// Drop barcodes with zero count in treatment samples.
    Treatment,
    /// Drop barcodes with zero count in both.
    Both,
}

impl FromStr for RemoveZero {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "control" => Ok(Self::Control),
            "treatment" => Ok(Self::Treatment),
            "both" => Ok(Self::Both),
            other => Err(unknown_choice(
                other,
                &["none", "control", "treatment", "both"],
            )),
        }
    }
}

/// Gene summary column, by 0-based number or by header label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRef {
    /// 0-based column number.
    Index(usize),
    /// Column header label.
    Label(String),
}

impl FromStr for ColumnRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("column must not be empty".to_string());
        }
        if let Ok(index) = s.parse::<i64>() {
            return usize::try_from(index)
                .map(Self::Index)
                .map_err(|_| format!("column number must be non-negative, got {index}"));
        }
        Ok(Self::Label(s.to_string()))
    }
}

/// Settings for `download`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DownloadConfig {
    /// Control sample names.
    pub control_names: Vec<String>,
    /// Experimental condition sample names.
    pub experiment_names: Vec<String>,
    /// Download target directory.
    pub directory: PathBuf,
    /// Merge all sequencer lanes into one fastq file.
    pub concatenate: bool,
    /// Output file prefix.
    pub output_prefix: String,
}

/// Settings for `filter`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Percent of basecalls that must pass `qscore`.
    pub percent: f64,
    /// Minimum Qscore.
    pub qscore: usize,
    /// Directory holding the fastq files.
    pub directory: PathBuf,
    /// Output file prefix.
    pub output_prefix: String,
}

/// Settings for `count`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CountConfig {
    /// Control sample IDs.
    pub control_ids: Vec<String>,
    /// One label per control sample ID.
    pub control_labels: Vec<String>,
    /// Test sample IDs.
    pub test_ids: Vec<String>,
    /// Output file prefix.
    pub output_prefix: String,
    /// Barcode length in bases.
    pub barcode_len: usize,
    /// Directory for fastq input and count output.
    pub directory: PathBuf,
    /// Control barcode list.
    pub control_barcode: Option<PathBuf>,
}

/// Settings for `test`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
#[allow(clippy::struct_excessive_bools)]
pub struct TestConfig {
    /// Count table to test.
    pub count_table: PathBuf,
    /// Treatment samples.
    pub treatment: SampleSelector,
    /// Control samples.
    pub control: ControlSelection,
    /// Barcode to gene mapping for the rank association analysis.
    pub gene_test: Option<PathBuf>,
    /// Normalization method.
    pub norm_method: NormMethod,
    /// FDR threshold for the gene test.
    pub gene_test_fdr_threshold: f64,
    /// P-value adjustment.
    pub adjust_method: AdjustMethod,
    /// Estimate variance from every sample, not just controls.
    pub variance_from_all_samples: bool,
    /// Sorting direction.
    pub sort_criteria: SortCriteria,
    /// Zero-count barcode removal.
    pub remove_zero: RemoveZero,
    /// Generate a pdf report.
    pub pdf_report: bool,
    /// Output file prefix.
    pub output_prefix: String,
    /// Control barcode list.
    pub control_sgrna: Option<PathBuf>,
    /// Write normalized counts to file.
    pub normcounts_to_file: bool,
    /// Keep intermediate files.
    pub keep_tmp: bool,
}

/// Settings for `pathway`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PathwayConfig {
    /// Gene summary produced by `test`.
    pub gene_ranking: PathBuf,
    /// Pathway definitions in GMT format.
    pub gmt_file: PathBuf,
    /// The ranking holds one direction only.
    pub single_ranking: bool,
    /// Output file prefix.
    pub output_prefix: String,
    /// Sorting direction.
    pub sort_criteria: SortCriteria,
    /// Keep intermediate files.
    pub keep_tmp: bool,
    /// Ranking column.
    pub ranking_column: ColumnRef,
    /// Positive selection ranking column; `None` with `single_ranking`.
    pub ranking_column_2: Option<ColumnRef>,
}

/// Settings for `plot`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlotConfig {
    /// Count table.
    pub count_table: PathBuf,
    /// Gene summary produced by `test`.
    pub gene_summary: PathBuf,
    /// Genes to plot.
    pub genes: Vec<String>,
    /// Samples to plot; `None` plots every sample.
    pub samples: Option<SampleSelector>,
    /// Output file prefix.
    pub output_prefix: String,
    /// Normalization method.
    pub norm_method: NormMethod,
    /// Control barcode list.
    pub control_sgrna: Option<PathBuf>,
    /// Keep intermediate files.
    pub keep_tmp: bool,
}

/// Settings for `mle`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
#[allow(clippy::struct_excessive_bools)]
pub struct MleConfig {
    /// Count table.
    pub count_table: PathBuf,
    /// Design matrix.
    pub design_matrix: DesignMatrixRef,
    /// Output file prefix.
    pub output_prefix: String,
    /// Sample labels matching the design matrix rows.
    pub include_samples: Vec<String>,
    /// Labels of the design matrix columns.
    pub beta_labels: Vec<String>,
    /// Control barcode list.
    pub control_sgrna: Option<PathBuf>,
    /// Detailed debug output.
    pub debug: bool,
    /// Restrict the run to one gene.
    pub debug_gene: Option<String>,
    /// Normalization method.
    pub norm_method: NormMethod,
    /// Genes used for mean-variance modeling.
    pub genes_varmodeling: usize,
    /// Permutation rounds.
    pub permutation_round: usize,
    /// Try to remove outliers.
    pub remove_outliers: bool,
    /// Worker threads.
    pub threads: usize,
    /// P-value adjustment.
    pub adjust_method: AdjustMethod,
    /// sgRNA efficiency prediction file.
    pub sgrna_efficiency: Option<PathBuf>,
    /// sgRNA ID column in the efficiency file.
    pub sgrna_eff_name_column: usize,
    /// Efficiency score column in the efficiency file.
    pub sgrna_eff_score_column: usize,
    /// Update efficiency during EM.
    pub update_efficiency: bool,
    /// Use the Bayes module.
    pub bayes: bool,
    /// Incorporate the PPI prior.
    pub ppi_prior: bool,
    /// PPI prior weighting.
    pub ppi_weighting: Option<f64>,
    /// Negative control gene name.
    pub negative_control: Option<String>,
}

/// Resolved settings for one stage handler call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StageConfig {
    /// `download` settings.
    Download(DownloadConfig),
    /// `filter` settings.
    Filter(FilterConfig),
    /// `count` settings.
    Count(CountConfig),
    /// `test` settings.
    Test(TestConfig),
    /// `pathway` settings.
    Pathway(PathwayConfig),
    /// `plot` settings.
    Plot(PlotConfig),
    /// `mle` settings.
    Mle(MleConfig),
}

impl StageConfig {
    /// Stage whose handler consumes this configuration.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Download(_) => Stage::Download,
            Self::Filter(_) => Stage::Filter,
            Self::Count(_) => Stage::Count,
            Self::Test(_) => Stage::Test,
            Self::Pathway(_) => Stage::Pathway,
            Self::Plot(_) => Stage::Plot,
            Self::Mle(_) => Stage::Mle,
        }
    }

    /// Output file prefix.
    pub fn output_prefix(&self) -> &str {
        match self {
            Self::Download(c) => &c.output_prefix,
            Self::Filter(c) => &c.output_prefix,
            Self::Count(c) => &c.output_prefix,
            Self::Test(c) => &c.output_prefix,
            Self::Pathway(c) => &c.output_prefix,
            Self::Plot(c) => &c.output_prefix,
            Self::Mle(c) => &c.output_prefix,
        }
    }
}

/// Subcommand named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Subcommand {
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
    /// Count followed by test.
    Run,
}

impl Subcommand {
    /// Name as typed on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Filter => "filter",
            Self::Count => "count",
            Self::Test => "test",
            Self::Pathway => "pathway",
            Self::Plot => "plot",
            Self::Mle => "mle",
            Self::Run => "run",
        }
    }

    /// Whether the shared log file and console sink are set up.
    ///
    /// `mle` manages its own output and skips shared logging entirely.
    pub fn uses_shared_logging(self) -> bool {
        self != Self::Mle
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated command line: the subcommand and the stage configurations it
/// dispatches, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    subcommand: Subcommand,
    stages: Vec<StageConfig>,
}

impl Invocation {
    /// Single-stage invocation.
    pub(crate) fn single(subcommand: Subcommand, stage: StageConfig) -> Self {
        Self {
            subcommand,
            stages: vec![stage],
        }
    }

    /// Composite `run`: count, then test on the produced table.
    pub(crate) fn run(count: CountConfig, test: TestConfig) -> Self {
        Self {
            subcommand: Subcommand::Run,
            stages: vec![StageConfig::Count(count), StageConfig::Test(test)],
        }
    }

    /// Subcommand that produced this invocation.
    pub fn subcommand(&self) -> Subcommand {
        self.subcommand
    }

    /// Stage configurations in dispatch order.
    pub fn stages(&self) -> &[StageConfig] {
        &self.stages
    }

    /// Output prefix shared by every stage.
    pub fn output_prefix(&self) -> &str {
        self.stages
            .first()
            .map_or(crate::constants::DEFAULT_OUTPUT_PREFIX, StageConfig::output_prefix)
    }
}
