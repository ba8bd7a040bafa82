//! barcode-processor - command surface for barcode screening analysis.
//!
//! Parses the subcommand grammar, validates options into per-stage
//! configurations, sets up logging and hands each stage to its handler.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod stages;

use cli::Parsed;
use config::load_default_config;
use constants::exit_codes;
use dispatch::Dispatcher;
use logging::TracingInstaller;
use stages::StageRegistry;
use std::ffi::OsString;
use std::io::Write;

pub use error::{Error, Result};

/// Main entry point for the barcode-processor CLI.
pub fn run() -> Result<()> {
    install_interrupt_handler(&mut std::io::stderr());

    let args: Vec<OsString> = std::env::args_os().collect();
    let argv: Vec<String> = args
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    let command = match cli::parse_args(args)? {
        Parsed::Help => {
            cli::help::print_help();
            return Ok(());
        }
        Parsed::Command(command) => command,
    };

    let settings = load_default_config()?;
    let dispatcher = Dispatcher::new(
        StageRegistry::with_manifest_handlers(),
        TracingInstaller::new(settings.logging),
    );
    dispatcher.dispatch(command, &argv).into_result()
}

/// Install the Ctrl+C handler, reporting a failure on `out`.
///
/// Runs before logging is set up, so the warning cannot go through tracing.
fn install_interrupt_handler(out: &mut impl Write) {
    if let Err(e) = ctrlc::set_handler(on_interrupt) {
        let _ = writeln!(out, "warning: failed to install Ctrl+C handler: {e}");
    }
}

/// Interrupts are not failures: say so and exit cleanly.
#[allow(clippy::print_stderr)]
fn on_interrupt() {
    eprintln!("\nInterrupted by user, exiting.");
    std::process::exit(exit_codes::SUCCESS);
}
