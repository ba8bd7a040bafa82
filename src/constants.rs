//! Application-wide constants.
//!
//! Option defaults and file naming conventions live here so the grammar,
//! the normalizer and the stage handlers agree on them.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "barcode-processor";

/// Environment variable that overrides the settings file location.
pub const CONFIG_ENV_VAR: &str = "BARCODE_PROCESSOR_CONFIG";

/// Default prefix for every output file, including the log.
pub const DEFAULT_OUTPUT_PREFIX: &str = "sample1";

/// Timestamp layout shared by the file and console log sinks.
///
/// Renders as e.g. `Sat, 17 Oct 2026 09:41:07`.
pub const LOG_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

/// Default option values for the stage subcommands.
pub mod defaults {
    /// Percent of basecalls that must pass the quality threshold.
    pub const FILTER_PERCENT: &str = "90";
    /// Minimum Qscore threshold.
    pub const FILTER_QSCORE: &str = "20";
    /// Barcode length in bases.
    pub const BARCODE_LEN: &str = "9";
    /// FDR threshold for the gene test.
    pub const GENE_TEST_FDR_THRESHOLD: &str = "0.25";
    /// Gene summary column used for ranking (0-based).
    pub const RANKING_COLUMN: &str = "2";
    /// Gene summary column used for the opposite-direction ranking.
    pub const RANKING_COLUMN_2: &str = "7";
    /// Number of genes used for mean-variance modeling.
    pub const GENES_VARMODELING: &str = "0";
    /// Permutation rounds for the MLE module.
    pub const PERMUTATION_ROUND: &str = "10";
    /// Worker threads for the MLE module.
    pub const THREADS: &str = "1";
    /// sgRNA ID column in the efficiency prediction file.
    pub const SGRNA_EFF_NAME_COLUMN: &str = "0";
    /// Efficiency score column in the efficiency prediction file.
    pub const SGRNA_EFF_SCORE_COLUMN: &str = "1";
    /// Label prefix generated for unnamed control samples.
    pub const CONTROL_LABEL_PREFIX: &str = "sample";
    /// Label prefix generated for unnamed design matrix coefficients.
    pub const BETA_LABEL_PREFIX: &str = "beta_";
}

/// Output file suffixes appended to the output prefix.
pub mod output_extensions {
    /// Log file written by the shared logging sink.
    pub const LOG: &str = ".log";
    /// Count table produced by the count stage.
    pub const COUNT_TABLE: &str = ".count.txt";
    /// Stage manifest written by the built-in handlers.
    pub const MANIFEST: &str = ".json";
}

/// Exit codes returned by the binary.
pub mod exit_codes {
    /// Successful run, help display, or user interrupt.
    pub const SUCCESS: i32 = 0;
    /// Validation, logging or stage execution failure.
    pub const FAILURE: i32 = 1;
    /// Malformed command line.
    pub const USAGE: i32 = 2;
}
