//! The optional `svgweld.toml` manifest.
//!
//! A project can pin its build configuration instead of repeating it on
//! the command line:
//!
//! ```toml
//! [build]
//! src = "art/src"
//! dest = "art/dist"
//! files = ["logo.svg", "favicon.svg"]
//!
//! [policy]
//! dangling-references = "warn"   # or "error"
//! url-attributes = "all"         # or "presentation"
//! ```
//!
//! Every section and key is optional; command-line flags always win
//! over manifest values. `~` in the configured paths is expanded.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::MANIFEST_FILE;
use crate::core::WeldError;
use crate::reference::{DanglingPolicy, LinkPolicy, UrlAttrScope};

/// Parsed `svgweld.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Manifest {
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub policy: PolicySection,
}

/// `[build]`: where sources live, where output goes, what to build.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct BuildSection {
    pub src: Option<String>,
    pub dest: Option<String>,
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

/// `[policy]`: the reference-handling knobs.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PolicySection {
    pub dangling_references: Option<DanglingPolicy>,
    pub url_attributes: Option<UrlAttrScope>,
}

impl Manifest {
    /// Parses a manifest from a file.
    pub fn load(path: &Path) -> Result<Self, WeldError> {
        if !path.is_file() {
            return Err(WeldError::ManifestNotFound {
                path: path.display().to_string(),
            });
        }
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| WeldError::ManifestParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Resolves the manifest to use: an explicit `--manifest-path` must
    /// exist; otherwise `svgweld.toml` in the working directory is
    /// picked up when present, and its absence is fine.
    pub fn find(explicit: Option<&Path>) -> Result<Option<Self>, WeldError> {
        match explicit {
            Some(path) => Self::load(path).map(Some),
            None => {
                let default = Path::new(MANIFEST_FILE);
                if default.is_file() {
                    Self::load(default).map(Some)
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Source directory with `~` expanded.
    pub fn src_dir(&self) -> Option<PathBuf> {
        self.build.src.as_deref().map(expand)
    }

    /// Destination directory with `~` expanded.
    pub fn dest_dir(&self) -> Option<PathBuf> {
        self.build.dest.as_deref().map(expand)
    }

    /// The policy encoded in the manifest, defaults for unset keys.
    pub fn policy(&self) -> LinkPolicy {
        LinkPolicy {
            dangling: self.policy.dangling_references.unwrap_or_default(),
            url_attrs: self.policy.url_attributes.unwrap_or_default(),
        }
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
