//! The `validate` command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{effective_policy, report_diagnostics};
use crate::core::WeldError;
use crate::manifest::Manifest;
use crate::pipeline;

/// Run the whole pipeline — parsing, identity assignment, graph
/// construction, cycle checking, rewriting, closure computation —
/// without writing anything. The exit status reflects fatal errors
/// only; dangling references stay warnings unless denied.
#[derive(Args)]
pub struct ValidateCommand {
    /// Directory containing the SVG fragment sources.
    #[arg(long, value_name = "DIR")]
    src: Option<PathBuf>,

    /// Files to check; all loaded files when omitted.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Fail on references that resolve to nothing.
    #[arg(long)]
    deny_dangling: bool,

    /// Only scan SVG presentation attributes for url(...) references.
    #[arg(long)]
    presentation_only: bool,
}

impl ValidateCommand {
    pub fn execute(self, manifest: Option<&Manifest>) -> Result<()> {
        let policy = effective_policy(manifest, self.deny_dangling, self.presentation_only);
        let src_dir = self
            .src
            .or_else(|| manifest.and_then(Manifest::src_dir))
            .ok_or_else(|| WeldError::Config {
                reason: "no source directory; pass --src or set [build].src".to_string(),
            })?;
        let targets = if self.files.is_empty() {
            manifest.map(|m| m.build.files.clone()).unwrap_or_default()
        } else {
            self.files
        };

        let report = pipeline::validate(&src_dir, &targets, &policy)?;

        report_diagnostics(&report.diagnostics);
        println!(
            "{} valid: {} source(s), {} resource(s), {} target(s) checked, {} warning(s)",
            "✓".green(),
            report.files_loaded,
            report.resources,
            report.targets_checked,
            report.diagnostics.len()
        );
        Ok(())
    }
}
