//! Process-wide logging set up once per invocation.
//!
//! Two sinks share one line format: the `<output-prefix>.log` file and the
//! console (stderr). `pathway` appends to the log so it can continue a prior
//! `test` log under the same prefix; every other subcommand truncates.

use crate::config::{Invocation, LoggingSettings, Subcommand};
use crate::constants::{APP_NAME, LOG_DATE_FORMAT, output_extensions};
use crate::error::{Error, Result};
use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{Event, Subscriber, info};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

/// How the log file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// Keep existing content and write after it.
    Append,
    /// Start from an empty file.
    Truncate,
}

impl LogMode {
    /// Log mode used by `subcommand`.
    pub fn for_subcommand(subcommand: Subcommand) -> Self {
        match subcommand {
            Subcommand::Pathway => Self::Append,
            _ => Self::Truncate,
        }
    }
}

/// Everything needed to set up logging for one invocation.
#[derive(Debug, Clone)]
pub struct LogPlan {
    path: PathBuf,
    mode: LogMode,
    subcommand: Subcommand,
    argv: Vec<String>,
}

impl LogPlan {
    /// Plan for a validated invocation started with `argv`.
    pub fn new(invocation: &Invocation, argv: &[String]) -> Self {
        let subcommand = invocation.subcommand();
        Self {
            path: PathBuf::from(format!(
                "{}{}",
                invocation.output_prefix(),
                output_extensions::LOG
            )),
            mode: LogMode::for_subcommand(subcommand),
            subcommand,
            argv: argv.to_vec(),
        }
    }

    /// Log file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Log file mode.
    pub fn mode(&self) -> LogMode {
        self.mode
    }

    /// Subcommand being logged.
    pub fn subcommand(&self) -> Subcommand {
        self.subcommand
    }

    /// First log entry: the full invocation.
    pub fn parameters_line(&self) -> String {
        format!("Parameters: {}", self.argv.join(" "))
    }

    /// Open the log file according to the plan's mode.
    pub fn open(&self) -> Result<File> {
        let mut options = OpenOptions::new();
        options.create(true);
        match self.mode {
            LogMode::Append => options.append(true),
            LogMode::Truncate => options.write(true).truncate(true),
        };
        options.open(&self.path).map_err(|source| Error::LoggingInit {
            path: self.path.clone(),
            source,
        })
    }
}

/// `LEVEL @ Day, DD Mon YYYY HH:MM:SS: message`
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{:<5} @ {}: ",
            event.metadata().level().as_str(),
            Local::now().format(LOG_DATE_FORMAT)
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Installs the process-wide log sinks.
pub trait LogInstaller {
    /// Set up logging for `plan` and record the invocation.
    fn install(&self, plan: &LogPlan) -> Result<()>;
}

/// Installs a global `tracing` subscriber with a file and a console sink.
#[derive(Debug, Clone, Default)]
pub struct TracingInstaller {
    settings: LoggingSettings,
}

impl TracingInstaller {
    /// Installer using the thresholds in `settings`.
    pub fn new(settings: LoggingSettings) -> Self {
        Self { settings }
    }
}

impl LogInstaller for TracingInstaller {
    fn install(&self, plan: &LogPlan) -> Result<()> {
        let file = plan.open()?;
        let subscriber = build_subscriber(file, &self.settings)?;
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|_| Error::LoggingAlreadyInitialized)?;
        log_preamble(plan);
        Ok(())
    }
}

/// Subscriber writing to `file` and stderr.
///
/// `RUST_LOG` overrides the console threshold from the settings file.
pub fn build_subscriber(
    file: File,
    settings: &LoggingSettings,
) -> Result<impl Subscriber + Send + Sync + 'static> {
    let file_filter = settings.file_filter()?;
    let console_level = settings.console_filter()?;
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_filter(file_filter);
    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    Ok(tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer))
}

/// Record the invocation and greet.
pub fn log_preamble(plan: &LogPlan) {
    info!("{}", plan.parameters_line());
    info!(
        "Welcome to {APP_NAME} v{}. Command: {}",
        env!("CARGO_PKG_VERSION"),
        plan.subcommand()
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::{Parsed, parse_args};
    use crate::config::normalize;
    use tempfile::TempDir;
    use tracing::{debug, trace};

    fn invocation(args: &[&str]) -> Invocation {
        match parse_args(args).unwrap() {
            Parsed::Command(command) => normalize(command).unwrap(),
            Parsed::Help => panic!("expected a command"),
        }
    }

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_only_pathway_appends() {
        for sub in [
            Subcommand::Download,
            Subcommand::Filter,
            Subcommand::Count,
            Subcommand::Test,
            Subcommand::Plot,
            Subcommand::Mle,
            Subcommand::Run,
        ] {
            assert_eq!(LogMode::for_subcommand(sub), LogMode::Truncate, "{sub}");
        }
        assert_eq!(LogMode::for_subcommand(Subcommand::Pathway), LogMode::Append);
    }

    #[test]
    fn test_plan_uses_output_prefix() {
        let args = ["barcode-processor", "filter", "-n", "screen"];
        let plan = LogPlan::new(&invocation(&args), &argv(&args));
        assert_eq!(plan.path(), Path::new("screen.log"));
        assert_eq!(plan.mode(), LogMode::Truncate);
        assert_eq!(
            plan.parameters_line(),
            "Parameters: barcode-processor filter -n screen"
        );
    }

    #[test]
    fn test_open_truncates_or_appends() {
        let dir = TempDir::new().unwrap();
        let prefix = dir.path().join("screen").to_string_lossy().into_owned();
        std::fs::write(dir.path().join("screen.log"), "earlier\n").unwrap();

        let args = [
            "barcode-processor",
            "pathway",
            "--gene-ranking",
            "g.txt",
            "--gmt-file",
            "p.gmt",
            "-n",
            prefix.as_str(),
        ];
        let plan = LogPlan::new(&invocation(&args), &argv(&args));
        drop(plan.open().unwrap());
        let text = std::fs::read_to_string(plan.path()).unwrap();
        assert_eq!(text, "earlier\n");

        let args = ["barcode-processor", "filter", "-n", prefix.as_str()];
        let plan = LogPlan::new(&invocation(&args), &argv(&args));
        drop(plan.open().unwrap());
        let text = std::fs::read_to_string(plan.path()).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_open_unwritable_path_is_logging_error() {
        let dir = TempDir::new().unwrap();
        let prefix = dir
            .path()
            .join("no-such-dir")
            .join("screen")
            .to_string_lossy()
            .into_owned();
        let args = ["barcode-processor", "filter", "-n", prefix.as_str()];
        let plan = LogPlan::new(&invocation(&args), &argv(&args));
        assert!(matches!(plan.open(), Err(Error::LoggingInit { .. })));
    }

    #[test]
    fn test_file_sink_format_and_threshold() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("screen.log");
        let args = ["barcode-processor", "count", "-o", "screen"];
        let plan = LogPlan::new(&invocation(&args), &argv(&args));

        let file = File::create(&path).unwrap();
        let subscriber = build_subscriber(file, &LoggingSettings::default()).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            log_preamble(&plan);
            debug!("counting");
            trace!("hidden");
        });

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("INFO  @ "));
        assert!(lines[0].ends_with(": Parameters: barcode-processor count -o screen"));
        assert!(lines[1].contains("Command: count"));
        assert!(lines[2].starts_with("DEBUG @ "));
        assert!(!text.contains("hidden"));
    }
}
