//! CLI argument definitions.
//!
//! Numeric and choice options are captured as raw strings here; the
//! normalizer in [`crate::config`] coerces and checks them so that a bad value
//! surfaces as a validation error naming the option.

use crate::constants::{DEFAULT_OUTPUT_PREFIX, defaults};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const REQUIRED: &str = "Required arguments";
const GENERAL: &str = "Optional general arguments";
const IO: &str = "Optional arguments for input and output";
const MLE: &str = "Optional arguments for MLE module";
const EM: &str = "Optional arguments for the EM iteration";
const BAYES: &str = "Optional arguments for the Bayes estimation of gene essentiality (experimental)";

/// Barcode, promoter and pathway analysis on MPRA and CRISPR screening data.
#[derive(Debug, Parser)]
#[command(name = "barcode-processor")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Print version.
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    pub version: Option<bool>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download fastq files from BaseSpace.
    Download(DownloadArgs),
    /// Perform QC filtering of fastq files.
    Filter(FilterArgs),
    /// Collect read counts from fastq files.
    Count(CountArgs),
    /// Perform statistical test from a count table generated by the count command.
    Test(TestArgs),
    /// Perform significant pathway analysis from gene rankings generated by the test command.
    Pathway(PathwayArgs),
    /// Generate graphics for selected genes.
    Plot(PlotArgs),
    /// Perform MLE estimation of gene essentiality.
    Mle(MleArgs),
    /// Collect read counts and run the statistical test on them.
    Run(RunArgs),
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Download(_) => "download",
            Self::Filter(_) => "filter",
            Self::Count(_) => "count",
            Self::Test(_) => "test",
            Self::Pathway(_) => "pathway",
            Self::Plot(_) => "plot",
            Self::Mle(_) => "mle",
            Self::Run(_) => "run",
        }
    }
}

/// Arguments for the download subcommand.
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Sample names for control experiments, separated by comma.
    #[arg(short = 'c', long, help_heading = REQUIRED)]
    pub control_name: String,

    /// Sample names for experimental conditions, separated by comma.
    #[arg(short = 'e', long)]
    pub experiment_name: Option<String>,

    /// Directory where fastq files are downloaded into.
    #[arg(short = 'd', long, default_value = ".")]
    pub directory: PathBuf,

    /// Concatenate fastq sequences from all lanes of the sequencer into one file.
    #[arg(long)]
    pub concatenate: bool,

    /// The prefix of the output file(s).
    #[arg(short = 'n', long, default_value = DEFAULT_OUTPUT_PREFIX)]
    pub output_prefix: String,
}

/// Arguments for the filter subcommand.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Percent of basecalls that pass the quality threshold.
    #[arg(short = 'p', long, default_value = defaults::FILTER_PERCENT, allow_negative_numbers = true)]
    pub percent: String,

    /// Minimum Qscore threshold.
    #[arg(short = 'q', long, default_value = defaults::FILTER_QSCORE, allow_negative_numbers = true)]
    pub qscore: String,

    /// Directory for storing fastq files.
    #[arg(short = 'd', long, default_value = ".")]
    pub directory: PathBuf,

    /// The prefix of the output file(s).
    #[arg(short = 'n', long, default_value = DEFAULT_OUTPUT_PREFIX)]
    pub output_prefix: String,
}

/// Arguments for the count subcommand.
#[derive(Debug, Args)]
pub struct CountArgs {
    /// Sample IDs for control experiments, separated by comma.
    #[arg(short = 'c', long = "control-ID", alias = "control-id")]
    pub control_id: Option<String>,

    /// Control sample labels, separated by comma; one per control sample ID.
    /// Default "sample1,sample2,...".
    #[arg(long)]
    pub control_label: Option<String>,

    /// Sample IDs for test experiments, separated by comma.
    #[arg(short = 't', long = "test-ID", alias = "treatment-id")]
    pub test_id: Option<String>,

    /// The prefix of the output file(s).
    #[arg(short = 'o', short_alias = 'n', long, default_value = DEFAULT_OUTPUT_PREFIX)]
    pub output_prefix: String,

    /// Length of the barcode.
    #[arg(long, default_value = defaults::BARCODE_LEN, allow_negative_numbers = true)]
    pub barcode_len: String,

    /// Directory for fastq files and the output count file.
    #[arg(short = 'd', long, default_value = ".")]
    pub directory: PathBuf,

    /// A list of control barcodes for normalization and for generating the null distribution of RRA.
    #[arg(long)]
    pub control_barcode: Option<PathBuf>,
}

/// Arguments for the test subcommand.
#[derive(Debug, Args)]
pub struct TestArgs {
    /// Tab-separated count table: barcode name, gene name, then read counts per sample.
    #[arg(short = 'k', long, help_heading = REQUIRED)]
    pub count_table: PathBuf,

    /// Sample labels or 0-based indices in the count table used as treatment,
    /// separated by comma. May be repeated.
    #[arg(short = 't', long, required = true, help_heading = REQUIRED)]
    pub treatment_id: Vec<String>,

    /// Barcode to gene/promoter mapping file for rank association analysis.
    #[arg(long, help_heading = REQUIRED)]
    pub gene_test: Option<PathBuf>,

    /// Sample labels or indices used as control, separated by comma. May be
    /// repeated. Default: all samples not specified as treatment.
    #[arg(short = 'c', long, help_heading = GENERAL)]
    pub control_id: Vec<String>,

    /// The prefix of the output file(s).
    #[arg(short = 'n', long, default_value = DEFAULT_OUTPUT_PREFIX, help_heading = IO)]
    pub output_prefix: String,

    /// Options shared with the run subcommand.
    #[command(flatten)]
    pub options: TestOptions,
}

/// General and IO options of the statistical test.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct TestOptions {
    /// Normalization method: none, median, total or control.
    #[arg(long, default_value = "median", help_heading = GENERAL)]
    pub norm_method: String,

    /// FDR threshold for the gene test.
    #[arg(long, default_value = defaults::GENE_TEST_FDR_THRESHOLD, allow_negative_numbers = true, help_heading = GENERAL)]
    pub gene_test_fdr_threshold: String,

    /// Barcode-level p-value adjustment: fdr, holm or pounds.
    #[arg(long, default_value = "fdr", help_heading = GENERAL)]
    pub adjust_method: String,

    /// Estimate the variance from all samples instead of control samples only.
    #[arg(long, help_heading = GENERAL)]
    pub variance_from_all_samples: bool,

    /// Sorting criteria: neg (negative selection) or pos (positive selection).
    #[arg(long, default_value = "neg", help_heading = GENERAL)]
    pub sort_criteria: String,

    /// Remove zero-count barcodes in: none, control, treatment or both.
    #[arg(long, default_value = "none", help_heading = GENERAL)]
    pub remove_zero: String,

    /// Generate a pdf report of the analysis.
    #[arg(long, help_heading = GENERAL)]
    pub pdf_report: bool,

    /// A list of control barcodes for normalization and for the null distribution of RRA.
    #[arg(long, help_heading = IO)]
    pub control_sgrna: Option<PathBuf>,

    /// Write normalized read counts to [output-prefix].normalized.txt.
    #[arg(long, help_heading = IO)]
    pub normcounts_to_file: bool,

    /// Keep intermediate files.
    #[arg(long, help_heading = IO)]
    pub keep_tmp: bool,
}

/// Arguments for the pathway subcommand.
#[derive(Debug, Args)]
pub struct PathwayArgs {
    /// Gene summary file generated by the test command.
    #[arg(long, help_heading = REQUIRED)]
    pub gene_ranking: PathBuf,

    /// The gene ranking file holds a single direction; only one enrichment comparison is run.
    #[arg(long)]
    pub single_ranking: bool,

    /// Pathway file in GMT format.
    #[arg(long, help_heading = REQUIRED)]
    pub gmt_file: PathBuf,

    /// The prefix of the output file(s).
    #[arg(short = 'n', long, default_value = DEFAULT_OUTPUT_PREFIX)]
    pub output_prefix: String,

    /// Sorting criteria: neg or pos.
    #[arg(long, default_value = "neg")]
    pub sort_criteria: String,

    /// Keep intermediate files.
    #[arg(long)]
    pub keep_tmp: bool,

    /// Ranking column in the gene summary file, as a 0-based number or a label.
    #[arg(long, default_value = defaults::RANKING_COLUMN, allow_negative_numbers = true)]
    pub ranking_column: String,

    /// Ranking column for positive selection; ignored with --single-ranking.
    #[arg(long = "ranking-column-2", default_value = defaults::RANKING_COLUMN_2, allow_negative_numbers = true)]
    pub ranking_column_2: String,
}

/// Arguments for the plot subcommand.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Tab-separated count table.
    #[arg(short = 'k', long, help_heading = REQUIRED)]
    pub count_table: PathBuf,

    /// Gene summary file generated by the test command.
    #[arg(short = 'g', long, help_heading = REQUIRED)]
    pub gene_summary: PathBuf,

    /// Genes to plot, separated by comma.
    #[arg(long)]
    pub genes: Option<String>,

    /// Samples to plot, separated by comma. Default: all samples in the count table.
    #[arg(short = 's', long)]
    pub samples: Option<String>,

    /// The prefix of the output file(s).
    #[arg(short = 'n', long, default_value = DEFAULT_OUTPUT_PREFIX)]
    pub output_prefix: String,

    /// Normalization method: none, median, total or control.
    #[arg(long, default_value = "median")]
    pub norm_method: String,

    /// A list of control barcodes.
    #[arg(long)]
    pub control_sgrna: Option<PathBuf>,

    /// Keep intermediate files.
    #[arg(long)]
    pub keep_tmp: bool,
}

/// Arguments for the mle subcommand.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct MleArgs {
    /// Tab-separated count table: sgRNA name, target gene, then read counts per sample.
    #[arg(short = 'k', long, help_heading = REQUIRED)]
    pub count_table: PathBuf,

    /// Design matrix, as a file name or a quoted inline matrix such as "1,1;1,0".
    #[arg(short = 'd', long, help_heading = REQUIRED)]
    pub design_matrix: String,

    /// The prefix of the output file(s).
    #[arg(short = 'n', long, default_value = DEFAULT_OUTPUT_PREFIX, help_heading = IO)]
    pub output_prefix: String,

    /// Sample labels matching the design matrix rows, separated by comma.
    #[arg(short = 'i', long, help_heading = IO)]
    pub include_samples: Option<String>,

    /// Labels of the design matrix columns (beta), separated by comma.
    #[arg(short = 'b', long, help_heading = IO)]
    pub beta_labels: Option<String>,

    /// A list of control barcodes.
    #[arg(long, help_heading = IO)]
    pub control_sgrna: Option<PathBuf>,

    /// Output detailed information of the run.
    #[arg(long, help_heading = MLE)]
    pub debug: bool,

    /// Only run the gene with this ID.
    #[arg(long, help_heading = MLE)]
    pub debug_gene: Option<String>,

    /// Normalization method: none, median, total or control.
    #[arg(long, default_value = "median", help_heading = MLE)]
    pub norm_method: String,

    /// Number of genes for mean-variance modeling.
    #[arg(long, default_value = defaults::GENES_VARMODELING, allow_negative_numbers = true, help_heading = MLE)]
    pub genes_varmodeling: String,

    /// Permutation rounds; permutation time is (# genes) * rounds.
    #[arg(long, default_value = defaults::PERMUTATION_ROUND, allow_negative_numbers = true, help_heading = MLE)]
    pub permutation_round: String,

    /// Try to remove outliers.
    #[arg(long, help_heading = MLE)]
    pub remove_outliers: bool,

    /// Worker threads for the estimation.
    #[arg(long, default_value = defaults::THREADS, allow_negative_numbers = true, help_heading = MLE)]
    pub threads: String,

    /// Barcode-level p-value adjustment: fdr, holm or pounds.
    #[arg(long, default_value = "fdr", help_heading = MLE)]
    pub adjust_method: String,

    /// sgRNA efficiency prediction file used as the initial efficiency guess.
    #[arg(long, help_heading = EM)]
    pub sgrna_efficiency: Option<PathBuf>,

    /// sgRNA ID column in the efficiency prediction file.
    #[arg(long, default_value = defaults::SGRNA_EFF_NAME_COLUMN, allow_negative_numbers = true, help_heading = EM)]
    pub sgrna_eff_name_column: String,

    /// Efficiency score column in the efficiency prediction file.
    #[arg(long, default_value = defaults::SGRNA_EFF_SCORE_COLUMN, allow_negative_numbers = true, help_heading = EM)]
    pub sgrna_eff_score_column: String,

    /// Iteratively update sgRNA efficiency during EM iteration.
    #[arg(long, help_heading = EM)]
    pub update_efficiency: bool,

    /// Use the experimental Bayes module to estimate gene essentiality.
    #[arg(long, help_heading = BAYES)]
    pub bayes: bool,

    /// Incorporate PPI as prior.
    #[arg(short = 'p', long = "PPI-prior", help_heading = BAYES)]
    pub ppi_prior: bool,

    /// Weighting used to calculate the PPI prior. Iterations are used if omitted.
    #[arg(short = 'w', long = "PPI-weighting", allow_negative_numbers = true, help_heading = BAYES)]
    pub ppi_weighting: Option<String>,

    /// Gene name of negative controls; their sgRNAs are treated independently.
    #[arg(short = 'e', long, help_heading = BAYES)]
    pub negative_control: Option<String>,
}

/// Arguments for the run subcommand.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Count stage options; the sample IDs double as the test stage selection.
    #[command(flatten)]
    pub count: CountArgs,

    /// Barcode to gene/promoter mapping file for rank association analysis.
    #[arg(long)]
    pub gene_test: Option<PathBuf>,

    /// Test stage options.
    #[command(flatten)]
    pub test: TestOptions,
}
