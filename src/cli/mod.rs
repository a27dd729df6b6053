//! Command-line interface for svgweld.
//!
//! Each command lives in its own module with its own argument struct
//! and `execute()`:
//! - `build` — resolve the whole source universe and write the
//!   requested self-contained documents.
//! - `validate` — run the same pipeline without writing anything.
//! - `graph` — print the link-dependency tree of one file.
//!
//! Global flags: `--verbose` / `--quiet` control logging (everything
//! goes to stderr; stdout is reserved for command output), and
//! `--manifest-path` points at an `svgweld.toml` other than the one in
//! the working directory. Command-line values always override manifest
//! values.

pub mod build;
pub mod graph;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::core::Diagnostic;
use crate::manifest::Manifest;
use crate::reference::{DanglingPolicy, LinkPolicy, UrlAttrScope};

/// Top-level CLI: global flags plus the subcommand to run.
#[derive(Parser)]
#[command(
    name = "svgweld",
    about = "Build self-contained SVG documents by inlining cross-file fragment definitions",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress everything except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the manifest file (default: svgweld.toml in the working
    /// directory, if present).
    #[arg(long, global = true, value_name = "FILE")]
    manifest_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the requested files with all external definitions inlined.
    Build(build::BuildCommand),
    /// Check the source tree without writing any output.
    Validate(validate::ValidateCommand),
    /// Print the link-dependency tree of a source file.
    Graph(graph::GraphCommand),
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        init_logging(self.verbose, self.quiet);
        let manifest = Manifest::find(self.manifest_path.as_deref())?;
        match self.command {
            Commands::Build(cmd) => cmd.execute(manifest.as_ref()),
            Commands::Validate(cmd) => cmd.execute(manifest.as_ref()),
            Commands::Graph(cmd) => cmd.execute(manifest.as_ref()),
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default = if quiet {
        "error"
    } else if verbose {
        "svgweld=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Merges the manifest policy with command-line overrides.
fn effective_policy(
    manifest: Option<&Manifest>,
    deny_dangling: bool,
    presentation_only: bool,
) -> LinkPolicy {
    let mut policy = manifest.map(Manifest::policy).unwrap_or_default();
    if deny_dangling {
        policy.dangling = DanglingPolicy::Error;
    }
    if presentation_only {
        policy.url_attrs = UrlAttrScope::Presentation;
    }
    policy
}

/// Prints accumulated non-fatal diagnostics to stderr.
fn report_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{} {}", "warning:".yellow().bold(), diagnostic);
    }
}
