//! The `build` command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{effective_policy, report_diagnostics};
use crate::core::WeldError;
use crate::manifest::Manifest;
use crate::pipeline::{self, BuildOptions};

/// Build output documents with every external definition inlined.
///
/// Sources come from the directory given with `--src` (or `[build].src`
/// in the manifest); outputs land at the same relative paths under
/// `--dest`. Both directories must already exist. Files to build are
/// given as arguments or via `[build].files`.
#[derive(Args)]
pub struct BuildCommand {
    /// Directory containing the SVG fragment sources.
    #[arg(long, value_name = "DIR")]
    src: Option<PathBuf>,

    /// Existing directory that receives the built documents.
    #[arg(long, value_name = "DIR")]
    dest: Option<PathBuf>,

    /// Files to build, as paths relative to the source directory.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Fail the build on references that resolve to nothing.
    #[arg(long)]
    deny_dangling: bool,

    /// Only scan SVG presentation attributes for url(...) references.
    #[arg(long)]
    presentation_only: bool,
}

impl BuildCommand {
    pub fn execute(self, manifest: Option<&Manifest>) -> Result<()> {
        let options = self.resolve(manifest)?;
        let report = pipeline::build(&options)?;

        report_diagnostics(&report.diagnostics);
        println!(
            "{} built {} file(s) from {} source(s), {} resource(s)",
            "✓".green(),
            report.written.len(),
            report.files_loaded,
            report.resources
        );
        if !report.diagnostics.is_empty() {
            println!(
                "  {} warning(s); rerun with --deny-dangling to make them fatal",
                report.diagnostics.len()
            );
        }
        Ok(())
    }

    fn resolve(self, manifest: Option<&Manifest>) -> Result<BuildOptions> {
        let policy = effective_policy(manifest, self.deny_dangling, self.presentation_only);

        let src_dir = self
            .src
            .or_else(|| manifest.and_then(Manifest::src_dir))
            .ok_or_else(|| WeldError::Config {
                reason: "no source directory; pass --src or set [build].src".to_string(),
            })?;
        let dest_dir = self
            .dest
            .or_else(|| manifest.and_then(Manifest::dest_dir))
            .ok_or_else(|| WeldError::Config {
                reason: "no destination directory; pass --dest or set [build].dest".to_string(),
            })?;
        let targets = if self.files.is_empty() {
            manifest.map(|m| m.build.files.clone()).unwrap_or_default()
        } else {
            self.files
        };

        Ok(BuildOptions {
            src_dir,
            dest_dir,
            targets,
            policy,
        })
    }
}
