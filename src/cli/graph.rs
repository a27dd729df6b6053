//! The `graph` command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::effective_policy;
use crate::core::WeldError;
use crate::manifest::Manifest;
use crate::pipeline;

/// Print the link-dependency tree of one source file: every resource
/// in the file that references something, with the chain of
/// definitions it pulls in.
#[derive(Args)]
pub struct GraphCommand {
    /// File to inspect, as a path relative to the source directory.
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Directory containing the SVG fragment sources.
    #[arg(long, value_name = "DIR")]
    src: Option<PathBuf>,
}

impl GraphCommand {
    pub fn execute(self, manifest: Option<&Manifest>) -> Result<()> {
        let policy = effective_policy(manifest, false, false);
        let src_dir = self
            .src
            .or_else(|| manifest.and_then(Manifest::src_dir))
            .ok_or_else(|| WeldError::Config {
                reason: "no source directory; pass --src or set [build].src".to_string(),
            })?;

        let tree = pipeline::dependency_tree(&src_dir, &self.file, &policy)?;
        print!("{tree}");
        Ok(())
    }
}
