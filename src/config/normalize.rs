//! Command line normalization.
//!
//! Turns the raw parse tree into an [`Invocation`]. Per stage the order is:
//! type coercion, choice checks, cross-field rules, defaults, then
//! flattening of multi-value options. The first broken rule is returned as
//! [`Error::Validation`]; nothing is written or logged from here.

use crate::cli::validators::{
    parse_bounded_float, parse_finite_float, parse_non_negative_int, parse_positive_int,
};
use crate::cli::{
    Command, CountArgs, DownloadArgs, FilterArgs, MleArgs, PathwayArgs, PlotArgs, RunArgs,
    TestArgs, TestOptions,
};
use crate::config::design::DesignMatrixRef;
use crate::config::selector::{ControlSelection, SampleSelector};
use crate::config::types::{
    ColumnRef, CountConfig, DownloadConfig, FilterConfig, Invocation, MleConfig, NormMethod,
    PathwayConfig, PlotConfig, StageConfig, Subcommand, TestConfig,
};
use crate::constants::{defaults, output_extensions};
use crate::error::{Error, Result};
use std::path::PathBuf;
use std::str::FromStr;

/// Validate a parsed command and resolve it into stage configurations.
pub fn normalize(command: Command) -> Result<Invocation> {
    let invocation = match command {
        Command::Download(args) => {
            Invocation::single(Subcommand::Download, StageConfig::Download(download(args)?))
        }
        Command::Filter(args) => {
            Invocation::single(Subcommand::Filter, StageConfig::Filter(filter(args)?))
        }
        Command::Count(args) => {
            Invocation::single(Subcommand::Count, StageConfig::Count(count(args)?))
        }
        Command::Test(args) => Invocation::single(Subcommand::Test, StageConfig::Test(test(args)?)),
        Command::Pathway(args) => {
            Invocation::single(Subcommand::Pathway, StageConfig::Pathway(pathway(args)?))
        }
        Command::Plot(args) => Invocation::single(Subcommand::Plot, StageConfig::Plot(plot(args)?)),
        Command::Mle(args) => Invocation::single(Subcommand::Mle, StageConfig::Mle(mle(args)?)),
        Command::Run(args) => run(args)?,
    };
    Ok(invocation)
}

fn download(args: DownloadArgs) -> Result<DownloadConfig> {
    let output_prefix = output_prefix("output-prefix", args.output_prefix)?;
    let control_names = comma_list(Some(&args.control_name));
    if control_names.is_empty() {
        return Err(Error::validation(
            "control-name",
            "at least one sample name is required",
        ));
    }

    Ok(DownloadConfig {
        control_names,
        experiment_names: comma_list(args.experiment_name.as_deref()),
        directory: args.directory,
        concatenate: args.concatenate,
        output_prefix,
    })
}

fn filter(args: FilterArgs) -> Result<FilterConfig> {
    let percent =
        parse_bounded_float(&args.percent, 0.0, 100.0).map_err(|r| Error::validation("percent", r))?;
    let qscore = parse_non_negative_int(&args.qscore).map_err(|r| Error::validation("qscore", r))?;

    Ok(FilterConfig {
        percent,
        qscore,
        directory: args.directory,
        output_prefix: output_prefix("output-prefix", args.output_prefix)?,
    })
}

fn count(args: CountArgs) -> Result<CountConfig> {
    let barcode_len =
        parse_positive_int(&args.barcode_len).map_err(|r| Error::validation("barcode-len", r))?;
    let output_prefix = output_prefix("output-prefix", args.output_prefix)?;

    let control_ids = comma_list(args.control_id.as_deref());
    let control_labels = match args.control_label.as_deref() {
        Some(raw) if !raw.trim().is_empty() => {
            let labels = comma_list(Some(raw));
            if labels.len() != control_ids.len() {
                return Err(Error::validation(
                    "control-label",
                    format!(
                        "{} labels given for {} control sample IDs",
                        labels.len(),
                        control_ids.len()
                    ),
                ));
            }
            labels
        }
        _ => (1..=control_ids.len())
            .map(|i| format!("{}{i}", defaults::CONTROL_LABEL_PREFIX))
            .collect(),
    };

    Ok(CountConfig {
        control_ids,
        control_labels,
        test_ids: comma_list(args.test_id.as_deref()),
        output_prefix,
        barcode_len,
        directory: args.directory,
        control_barcode: args.control_barcode,
    })
}

fn test(args: TestArgs) -> Result<TestConfig> {
    let treatment = selector("treatment-id", &args.treatment_id)?;
    let control = if args.control_id.is_empty() {
        ControlSelection::ComplementOfTreatment
    } else {
        let selected = selector("control-id", &args.control_id)?;
        if selected.is_empty() {
            return Err(Error::validation(
                "control-id",
                "no sample given; omit the option to use all non-treatment samples",
            ));
        }
        ControlSelection::Explicit(selected)
    };

    test_config(
        args.count_table,
        treatment,
        control,
        args.gene_test,
        output_prefix("output-prefix", args.output_prefix)?,
        args.options,
        "treatment-id",
    )
}

/// Shared by `test` and `run`; `treatment_flag` names the option the
/// treatment selection came from.
fn test_config(
    count_table: PathBuf,
    treatment: SampleSelector,
    control: ControlSelection,
    gene_test: Option<PathBuf>,
    output_prefix: String,
    options: TestOptions,
    treatment_flag: &'static str,
) -> Result<TestConfig> {
    let gene_test_fdr_threshold = parse_bounded_float(&options.gene_test_fdr_threshold, 0.0, 1.0)
        .map_err(|r| Error::validation("gene-test-fdr-threshold", r))?;

    let norm_method: NormMethod = choice("norm-method", &options.norm_method)?;
    let adjust_method = choice("adjust-method", &options.adjust_method)?;
    let sort_criteria = choice("sort-criteria", &options.sort_criteria)?;
    let remove_zero = choice("remove-zero", &options.remove_zero)?;

    if treatment.is_empty() {
        return Err(Error::validation(
            treatment_flag,
            "at least one treatment sample is required",
        ));
    }
    if let ControlSelection::Explicit(selected) = &control
        && let Some(shared) = selected.ids().iter().find(|id| treatment.contains(id))
    {
        return Err(Error::validation(
            "control-id",
            format!("sample '{shared}' is also a treatment sample"),
        ));
    }
    if norm_method == NormMethod::Control && options.control_sgrna.is_none() {
        return Err(Error::validation(
            "control-sgrna",
            "is required when --norm-method is control",
        ));
    }

    Ok(TestConfig {
        count_table,
        treatment,
        control,
        gene_test,
        norm_method,
        gene_test_fdr_threshold,
        adjust_method,
        variance_from_all_samples: options.variance_from_all_samples,
        sort_criteria,
        remove_zero,
        pdf_report: options.pdf_report,
        output_prefix,
        control_sgrna: options.control_sgrna,
        normcounts_to_file: options.normcounts_to_file,
        keep_tmp: options.keep_tmp,
    })
}

fn pathway(args: PathwayArgs) -> Result<PathwayConfig> {
    let sort_criteria = choice("sort-criteria", &args.sort_criteria)?;
    let ranking_column = choice::<ColumnRef>("ranking-column", &args.ranking_column)?;
    // The second column is not even parsed for a single ranking.
    let ranking_column_2 = if args.single_ranking {
        None
    } else {
        Some(choice::<ColumnRef>("ranking-column-2", &args.ranking_column_2)?)
    };

    Ok(PathwayConfig {
        gene_ranking: args.gene_ranking,
        gmt_file: args.gmt_file,
        single_ranking: args.single_ranking,
        output_prefix: output_prefix("output-prefix", args.output_prefix)?,
        sort_criteria,
        keep_tmp: args.keep_tmp,
        ranking_column,
        ranking_column_2,
    })
}

fn plot(args: PlotArgs) -> Result<PlotConfig> {
    let norm_method: NormMethod = choice("norm-method", &args.norm_method)?;
    if norm_method == NormMethod::Control && args.control_sgrna.is_none() {
        return Err(Error::validation(
            "control-sgrna",
            "is required when --norm-method is control",
        ));
    }
    let samples = match args.samples {
        Some(raw) => Some(selector("samples", &[raw])?).filter(|s| !s.is_empty()),
        None => None,
    };

    Ok(PlotConfig {
        count_table: args.count_table,
        gene_summary: args.gene_summary,
        genes: comma_list(args.genes.as_deref()),
        samples,
        output_prefix: output_prefix("output-prefix", args.output_prefix)?,
        norm_method,
        control_sgrna: args.control_sgrna,
        keep_tmp: args.keep_tmp,
    })
}

fn mle(args: MleArgs) -> Result<MleConfig> {
    let genes_varmodeling = parse_non_negative_int(&args.genes_varmodeling)
        .map_err(|r| Error::validation("genes-varmodeling", r))?;
    let permutation_round = parse_positive_int(&args.permutation_round)
        .map_err(|r| Error::validation("permutation-round", r))?;
    let threads = parse_positive_int(&args.threads).map_err(|r| Error::validation("threads", r))?;
    let sgrna_eff_name_column = parse_non_negative_int(&args.sgrna_eff_name_column)
        .map_err(|r| Error::validation("sgrna-eff-name-column", r))?;
    let sgrna_eff_score_column = parse_non_negative_int(&args.sgrna_eff_score_column)
        .map_err(|r| Error::validation("sgrna-eff-score-column", r))?;
    let ppi_weighting = args
        .ppi_weighting
        .as_deref()
        .map(parse_finite_float)
        .transpose()
        .map_err(|r| Error::validation("PPI-weighting", r))?;

    let norm_method = choice("norm-method", &args.norm_method)?;
    let adjust_method = choice("adjust-method", &args.adjust_method)?;

    let design_matrix = DesignMatrixRef::resolve(&args.design_matrix)
        .map_err(|r| Error::validation("design-matrix", r))?;
    let include_samples = comma_list(args.include_samples.as_deref());
    let mut beta_labels = comma_list(args.beta_labels.as_deref());

    if let Some(grid) = design_matrix.inline() {
        if !include_samples.is_empty() && include_samples.len() != grid.n_rows() {
            return Err(Error::validation(
                "include-samples",
                format!(
                    "{} samples given for a design matrix with {} rows",
                    include_samples.len(),
                    grid.n_rows()
                ),
            ));
        }
        if beta_labels.is_empty() {
            beta_labels = (0..grid.n_cols())
                .map(|i| format!("{}{i}", defaults::BETA_LABEL_PREFIX))
                .collect();
        } else if beta_labels.len() != grid.n_cols() {
            return Err(Error::validation(
                "beta-labels",
                format!(
                    "{} labels given for a design matrix with {} columns",
                    beta_labels.len(),
                    grid.n_cols()
                ),
            ));
        }
    }

    Ok(MleConfig {
        count_table: args.count_table,
        design_matrix,
        output_prefix: output_prefix("output-prefix", args.output_prefix)?,
        include_samples,
        beta_labels,
        control_sgrna: args.control_sgrna,
        debug: args.debug,
        debug_gene: args.debug_gene,
        norm_method,
        genes_varmodeling,
        permutation_round,
        remove_outliers: args.remove_outliers,
        threads,
        adjust_method,
        sgrna_efficiency: args.sgrna_efficiency,
        sgrna_eff_name_column,
        sgrna_eff_score_column,
        update_efficiency: args.update_efficiency,
        bayes: args.bayes,
        ppi_prior: args.ppi_prior,
        ppi_weighting,
        negative_control: args.negative_control,
    })
}

/// `run` = `count` then `test` on the table `count` writes.
///
/// The count table names its sample columns by the fastq sample IDs, so the
/// test stage selects treatment by `--test-ID` and control by `--control-ID`,
/// both as labels. Without control IDs the control is every other sample.
fn run(args: RunArgs) -> Result<Invocation> {
    let count = count(args.count)?;

    let treatment = SampleSelector::labels(&count.test_ids)
        .map_err(|r| Error::validation("test-ID", r))?;
    let control = if count.control_ids.is_empty() {
        ControlSelection::ComplementOfTreatment
    } else {
        ControlSelection::Explicit(
            SampleSelector::labels(&count.control_ids)
                .map_err(|r| Error::validation("control-ID", r))?,
        )
    };
    let count_table = PathBuf::from(format!(
        "{}{}",
        count.output_prefix,
        output_extensions::COUNT_TABLE
    ));

    let test = test_config(
        count_table,
        treatment,
        control,
        args.gene_test,
        count.output_prefix.clone(),
        args.test,
        "test-ID",
    )?;

    Ok(Invocation::run(count, test))
}

fn output_prefix(flag: &'static str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::validation(flag, "output prefix must not be empty"));
    }
    Ok(value)
}

fn choice<T: FromStr<Err = String>>(flag: &'static str, value: &str) -> Result<T> {
    value.parse().map_err(|r| Error::validation(flag, r))
}

fn selector(flag: &'static str, values: &[String]) -> Result<SampleSelector> {
    SampleSelector::flatten(values).map_err(|r| Error::validation(flag, r))
}

fn comma_list(value: Option<&str>) -> Vec<String> {
    value
        .into_iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::cli::{Parsed, parse_args};
    use crate::config::selector::SampleId;
    use crate::config::types::SortCriteria;

    fn normalize_argv(args: &[&str]) -> Result<Invocation> {
        let mut argv = vec!["barcode-processor"];
        argv.extend_from_slice(args);
        match parse_args(argv)? {
            Parsed::Command(command) => normalize(command),
            Parsed::Help => unreachable!("expected a subcommand"),
        }
    }

    fn only_stage(invocation: &Invocation) -> &StageConfig {
        assert_eq!(invocation.stages().len(), 1);
        &invocation.stages()[0]
    }

    fn assert_flag(result: Result<Invocation>, expected: &str) {
        match result {
            Err(Error::Validation { flag, .. }) => assert_eq!(flag, expected),
            other => panic!("expected validation error for --{expected}, got {other:?}"),
        }
    }

    #[test]
    fn test_every_config_defaults_output_prefix() {
        let cases: [&[&str]; 7] = [
            &["download", "-c", "c1"],
            &["filter"],
            &["count"],
            &["test", "-k", "t.txt", "-t", "A"],
            &["pathway", "--gene-ranking", "g.txt", "--gmt-file", "p.gmt"],
            &["plot", "-k", "t.txt", "-g", "g.txt"],
            &["mle", "-k", "t.txt", "-d", "1,0;1,1"],
        ];
        for args in cases {
            let invocation = normalize_argv(args).unwrap();
            assert_eq!(invocation.output_prefix(), "sample1", "{args:?}");
        }
    }

    #[test]
    fn test_empty_output_prefix_is_rejected() {
        assert_flag(normalize_argv(&["count", "-o", " "]), "output-prefix");
    }

    #[test]
    fn test_filter_coerces_numbers() {
        let invocation = normalize_argv(&["filter", "-p", "85.5", "-q", "30"]).unwrap();
        let StageConfig::Filter(config) = only_stage(&invocation) else {
            unreachable!()
        };
        assert_eq!(config.percent, 85.5);
        assert_eq!(config.qscore, 30);
    }

    #[test]
    fn test_filter_rejects_non_numeric_values() {
        assert_flag(normalize_argv(&["filter", "--percent", "lots"]), "percent");
        assert_flag(normalize_argv(&["filter", "--qscore", "high"]), "qscore");
        assert_flag(normalize_argv(&["filter", "--percent", "120"]), "percent");
    }

    #[test]
    fn test_test_defaults_control_to_complement() {
        let invocation = normalize_argv(&["test", "-k", "t.txt", "-t", "A,B"]).unwrap();
        let StageConfig::Test(config) = only_stage(&invocation) else {
            unreachable!()
        };
        assert_eq!(config.control, ControlSelection::ComplementOfTreatment);

        let header: Vec<String> = ["A", "B", "C", "D"].iter().map(ToString::to_string).collect();
        let control = config.control.resolve(&header, &config.treatment).unwrap();
        assert_eq!(control, vec!["C", "D"]);
    }

    #[test]
    fn test_test_flattens_repeated_selectors() {
        let invocation =
            normalize_argv(&["test", "-k", "t.txt", "-t", "A,B", "-t", "3", "-c", "C"]).unwrap();
        let StageConfig::Test(config) = only_stage(&invocation) else {
            unreachable!()
        };
        assert_eq!(
            config.treatment.ids(),
            &[
                SampleId::Label("A".to_string()),
                SampleId::Label("B".to_string()),
                SampleId::Index(3),
            ]
        );
        assert_eq!(
            config.control,
            ControlSelection::Explicit(SampleSelector::flatten(&["C"]).unwrap())
        );
    }

    #[test]
    fn test_test_rejects_overlapping_selection() {
        assert_flag(
            normalize_argv(&["test", "-k", "t.txt", "-t", "A,B", "-c", "B"]),
            "control-id",
        );
    }

    #[test]
    fn test_test_rejects_empty_treatment() {
        assert_flag(normalize_argv(&["test", "-k", "t.txt", "-t", ","]), "treatment-id");
    }

    #[test]
    fn test_test_checks_choices() {
        assert_flag(
            normalize_argv(&["test", "-k", "t.txt", "-t", "A", "--norm-method", "quantile"]),
            "norm-method",
        );
        assert_flag(
            normalize_argv(&["test", "-k", "t.txt", "-t", "A", "--remove-zero", "all"]),
            "remove-zero",
        );
        assert_flag(
            normalize_argv(&["test", "-k", "t.txt", "-t", "A", "--gene-test-fdr-threshold", "2"]),
            "gene-test-fdr-threshold",
        );
    }

    #[test]
    fn test_control_normalization_needs_control_sgrna() {
        assert_flag(
            normalize_argv(&["test", "-k", "t.txt", "-t", "A", "--norm-method", "control"]),
            "control-sgrna",
        );
        assert!(
            normalize_argv(&[
                "test",
                "-k",
                "t.txt",
                "-t",
                "A",
                "--norm-method",
                "control",
                "--control-sgrna",
                "ctrl.txt",
            ])
            .is_ok()
        );
    }

    #[test]
    fn test_single_ranking_never_reads_second_column() {
        let invocation = normalize_argv(&[
            "pathway",
            "--gene-ranking",
            "g.txt",
            "--gmt-file",
            "p.gmt",
            "--single-ranking",
            "--ranking-column-2",
            "-5",
        ])
        .unwrap();
        let StageConfig::Pathway(config) = only_stage(&invocation) else {
            unreachable!()
        };
        assert_eq!(config.ranking_column, ColumnRef::Index(2));
        assert_eq!(config.ranking_column_2, None);
    }

    #[test]
    fn test_double_ranking_validates_second_column() {
        assert_flag(
            normalize_argv(&[
                "pathway",
                "--gene-ranking",
                "g.txt",
                "--gmt-file",
                "p.gmt",
                "--ranking-column-2",
                "-5",
            ]),
            "ranking-column-2",
        );
        let invocation = normalize_argv(&[
            "pathway",
            "--gene-ranking",
            "g.txt",
            "--gmt-file",
            "p.gmt",
            "--ranking-column-2",
            "pos|score",
            "--sort-criteria",
            "pos",
        ])
        .unwrap();
        let StageConfig::Pathway(config) = only_stage(&invocation) else {
            unreachable!()
        };
        assert_eq!(
            config.ranking_column_2,
            Some(ColumnRef::Label("pos|score".to_string()))
        );
        assert_eq!(config.sort_criteria, SortCriteria::Pos);
    }

    #[test]
    fn test_count_generates_control_labels() {
        let invocation = normalize_argv(&["count", "-c", "c1,c2", "-t", "t1"]).unwrap();
        let StageConfig::Count(config) = only_stage(&invocation) else {
            unreachable!()
        };
        assert_eq!(config.control_labels, vec!["sample1", "sample2"]);
        assert_eq!(config.barcode_len, 9);
    }

    #[test]
    fn test_count_label_count_must_match() {
        assert_flag(
            normalize_argv(&["count", "-c", "c1,c2", "--control-label", "only_one"]),
            "control-label",
        );
        assert_flag(normalize_argv(&["count", "--barcode-len", "0"]), "barcode-len");
    }

    #[test]
    fn test_mle_inline_design_matrix() {
        let invocation = normalize_argv(&["mle", "-k", "t.txt", "-d", "1,1;1,0"]).unwrap();
        let StageConfig::Mle(config) = only_stage(&invocation) else {
            unreachable!()
        };
        let grid = config.design_matrix.inline().unwrap();
        assert_eq!(grid.rows(), &[vec![1.0, 1.0], vec![1.0, 0.0]]);
        assert_eq!(config.beta_labels, vec!["beta_0", "beta_1"]);
        assert_eq!(config.threads, 1);
        assert_eq!(config.permutation_round, 10);
    }

    #[test]
    fn test_mle_rejects_bad_counts() {
        let base = ["mle", "-k", "t.txt", "-d", "1,1;1,0"];
        let with = |extra: &[&str]| {
            let mut args = base.to_vec();
            args.extend_from_slice(extra);
            normalize_argv(&args)
        };
        assert_flag(with(&["--threads", "0"]), "threads");
        assert_flag(with(&["--permutation-round", "-3"]), "permutation-round");
        assert_flag(with(&["--sgrna-eff-name-column", "-1"]), "sgrna-eff-name-column");
        assert_flag(with(&["--sgrna-eff-score-column", "x"]), "sgrna-eff-score-column");
        assert_flag(with(&["-b", "only_one"]), "beta-labels");
        assert_flag(with(&["-i", "A,B,C"]), "include-samples");
        assert_flag(with(&["-w", "heavy"]), "PPI-weighting");
    }

    #[test]
    fn test_mle_missing_design_file() {
        assert_flag(
            normalize_argv(&["mle", "-k", "t.txt", "-d", "missing_design.txt"]),
            "design-matrix",
        );
    }

    #[test]
    fn test_plot_samples_selector() {
        let invocation =
            normalize_argv(&["plot", "-k", "t.txt", "-g", "g.txt", "-s", "0,B", "--genes", "X,Y"])
                .unwrap();
        let StageConfig::Plot(config) = only_stage(&invocation) else {
            unreachable!()
        };
        assert_eq!(config.genes, vec!["X", "Y"]);
        assert_eq!(config.samples.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_run_yields_count_then_test_with_shared_prefix() {
        let invocation =
            normalize_argv(&["run", "-c", "c1,c2", "-t", "t1", "-o", "screen"]).unwrap();
        assert_eq!(invocation.subcommand(), Subcommand::Run);
        let [StageConfig::Count(count), StageConfig::Test(test)] = invocation.stages() else {
            panic!("run must yield count then test");
        };
        assert_eq!(count.output_prefix, "screen");
        assert_eq!(test.output_prefix, "screen");
        assert_eq!(test.count_table, PathBuf::from("screen.count.txt"));
        assert_eq!(test.treatment, SampleSelector::labels(&["t1"]).unwrap());
        assert_eq!(
            test.control,
            ControlSelection::Explicit(SampleSelector::labels(&["c1,c2"]).unwrap())
        );
        assert_eq!(test.gene_test, None);
    }

    #[test]
    fn test_run_selects_numeric_sample_ids_as_labels() {
        let invocation = normalize_argv(&["run", "-c", "100,101", "-t", "12345"]).unwrap();
        let [StageConfig::Count(count), StageConfig::Test(test)] = invocation.stages() else {
            panic!("run must yield count then test");
        };
        assert_eq!(count.test_ids, vec!["12345"]);
        assert_eq!(test.treatment.ids(), &[SampleId::Label("12345".to_string())]);
        assert_eq!(
            test.control,
            ControlSelection::Explicit(SampleSelector::labels(&["100", "101"]).unwrap())
        );
    }

    #[test]
    fn test_run_without_control_ids_uses_complement() {
        let invocation = normalize_argv(&["run", "-t", "t1"]).unwrap();
        let [_, StageConfig::Test(test)] = invocation.stages() else {
            panic!("run must yield count then test");
        };
        assert_eq!(test.control, ControlSelection::ComplementOfTreatment);
    }

    #[test]
    fn test_run_rejects_sample_in_both_groups() {
        assert_flag(normalize_argv(&["run", "-c", "s1", "-t", "s1"]), "control-id");
    }

    #[test]
    fn test_run_passes_gene_test_through() {
        let invocation =
            normalize_argv(&["run", "-c", "c1", "-t", "t1", "--gene-test", "map.txt"]).unwrap();
        let [_, StageConfig::Test(test)] = invocation.stages() else {
            panic!("run must yield count then test");
        };
        assert_eq!(test.gene_test, Some(PathBuf::from("map.txt")));
    }

    #[test]
    fn test_run_requires_test_samples() {
        assert_flag(normalize_argv(&["run", "-c", "c1"]), "test-ID");
    }

    #[test]
    fn test_download_splits_names() {
        let invocation = normalize_argv(&["download", "-c", "a, b", "-e", "x"]).unwrap();
        let StageConfig::Download(config) = only_stage(&invocation) else {
            unreachable!()
        };
        assert_eq!(config.control_names, vec!["a", "b"]);
        assert_eq!(config.experiment_names, vec!["x"]);
        assert_flag(normalize_argv(&["download", "-c", ","]), "control-name");
    }
}
