//! barcode-processor CLI entry point.

#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use barcode_processor::Error;

fn main() {
    match barcode_processor::run() {
        Ok(()) => {}
        // clap prints usage and picks the exit code (0 for --help/--version)
        Err(Error::ArgumentSyntax(e)) => e.exit(),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
