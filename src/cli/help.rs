//! Help message display for CLI.

#![allow(clippy::print_stdout)]

use crate::cli::Cli;
use clap::CommandFactory;

/// Render the top-level help followed by a short quick-start section.
pub fn render_help() -> String {
    let mut help = Cli::command().render_long_help().to_string();
    help.push('\n');
    help.push_str(QUICK_START);
    help
}

/// Print the top-level help to stdout.
pub fn print_help() {
    print!("{}", render_help());
}

const QUICK_START: &str = "\
Quick start:
  barcode-processor count -c ctrl1,ctrl2 -t treat1,treat2 -o screen
  barcode-processor test -k screen.count.txt -t treat1,treat2 -n screen
  barcode-processor run -c ctrl1,ctrl2 -t treat1,treat2 -o screen
  barcode-processor mle -k screen.count.txt -d \"1,0;1,1\"

Run 'barcode-processor <COMMAND> -h' for the options of a command.
";
