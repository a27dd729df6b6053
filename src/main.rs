//! svgweld CLI entry point.
//!
//! Parses arguments, runs the selected command, and renders failures
//! through the user-friendly error layer before exiting non-zero.

use clap::Parser;
use svgweld::cli::Cli;
use svgweld::core::user_friendly_error;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = cli.execute() {
        user_friendly_error(error).display();
        std::process::exit(1);
    }
}
