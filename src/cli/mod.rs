//! CLI argument parsing.

mod args;
pub mod help;
pub mod validators;

pub use args::{
    Cli, Command, CountArgs, DownloadArgs, FilterArgs, MleArgs, PathwayArgs, PlotArgs, RunArgs,
    TestArgs, TestOptions,
};

use crate::error::{Error, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;

/// Outcome of parsing a command line.
#[derive(Debug)]
pub enum Parsed {
    /// No subcommand, or an unknown one: show help and stop.
    Help,
    /// A subcommand with its raw option values.
    Command(Command),
}

/// Parse a full argument vector, program name first.
///
/// An empty or unknown subcommand yields [`Parsed::Help`]. Any other
/// malformed input is an [`Error::ArgumentSyntax`].
pub fn parse_args<I, T>(args: I) -> Result<Parsed>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    if let Some(first) = args.get(1).and_then(|a| a.to_str())
        && !first.starts_with('-')
        && !is_known_subcommand(first)
    {
        return Ok(Parsed::Help);
    }

    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli.command.map_or(Parsed::Help, Parsed::Command)),
        Err(e) if e.kind() == ErrorKind::InvalidSubcommand => Ok(Parsed::Help),
        Err(e) => Err(Error::ArgumentSyntax(e)),
    }
}

fn is_known_subcommand(name: &str) -> bool {
    name == "help"
        || Cli::command()
            .get_subcommands()
            .any(|sub| sub.get_name() == name || sub.get_all_aliases().any(|a| a == name))
}
