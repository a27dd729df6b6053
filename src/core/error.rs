//! Error handling for svgweld.
//!
//! The error system has two layers:
//! 1. [`WeldError`] — strongly-typed failure cases for precise handling
//!    in code and in tests.
//! 2. [`ErrorContext`] — a wrapper that adds a user-facing suggestion
//!    and optional details for CLI display.
//!
//! Fatal errors abort the whole build before any output file is
//! written; the pipeline renders every requested document in memory
//! first, so a failed build never leaves partial output behind.
//! Tolerated problems travel separately as
//! [`Diagnostic`](crate::core::Diagnostic)s.
//!
//! Use [`user_friendly_error`] at the CLI boundary to convert any
//! `anyhow::Error` into a displayable context with a suggestion
//! matched to the failure.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::xml::XmlTreeError;

/// The main error type for svgweld operations.
///
/// Every variant is a fatal build error: configuration problems caught
/// before any source content is read, malformed input, and the
/// structural errors the dependency engine refuses to build through
/// (cycles, identifier collisions, and — under the strict policy —
/// dangling references).
#[derive(Debug, Error)]
pub enum WeldError {
    /// The source directory is missing or not a directory. Checked
    /// before any source content is touched.
    #[error("source directory not found or not a directory: {path}")]
    SourceDirInvalid { path: String },

    /// The destination directory is missing or not a directory.
    /// Checked before any source content is touched.
    #[error("destination directory not found or not a directory: {path}")]
    DestDirInvalid { path: String },

    /// An explicitly requested manifest file does not exist.
    #[error("manifest not found: {path}")]
    ManifestNotFound { path: String },

    /// The manifest exists but is not valid TOML for our schema.
    #[error("failed to parse manifest {path}: {reason}")]
    ManifestParse { path: String, reason: String },

    /// The merged CLI/manifest configuration is incomplete.
    #[error("invalid build configuration: {reason}")]
    Config { reason: String },

    /// A source file could not be parsed as XML. Fatal for the build:
    /// an unreadable file may define resources other files depend on.
    #[error("failed to parse {path}: {source}")]
    XmlParse {
        path: String,
        #[source]
        source: XmlTreeError,
    },

    /// A file requested on the command line (or in the manifest) is
    /// not among the loaded source files.
    #[error("requested file was not found under the source directory: {path}")]
    UnknownTarget { path: String },

    /// Two resources produced the same output identifier. The rewrite
    /// pass verifies injectivity globally; this should only be
    /// reachable through pathological id choices.
    #[error("output identifier collision: \"{output_id}\" is produced by both {first} and {second}")]
    IdentityCollision {
        output_id: String,
        first: String,
        second: String,
    },

    /// The combined containment + link graph has a cycle. At least one
    /// offending path is reported.
    #[error("circular reference chain: {cycle}")]
    CircularDependency { cycle: String },

    /// A dangling reference under the `deny` policy. Under the default
    /// policy dangling references are diagnostics, not errors.
    #[error("{count} dangling reference(s), first: {first}")]
    DanglingReferences { count: usize, first: String },

    /// Wrapped I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// User-facing wrapper pairing an error with a suggestion and details.
///
/// The CLI displays the error message in red, then the suggestion and
/// details when present. Everything goes to stderr.
pub struct ErrorContext {
    pub error: anyhow::Error,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Prints the error, suggestion, and details to stderr with color.
    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.error);
        if let Some(details) = &self.details {
            eprintln!("  {} {}", "details:".yellow(), details);
        }
        if let Some(suggestion) = &self.suggestion {
            eprintln!("  {} {}", "hint:".cyan(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\n  details: {details}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  hint: {suggestion}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Converts any error into an [`ErrorContext`] with a suggestion
/// matched to the underlying [`WeldError`], when there is one.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let suggestion = match error.downcast_ref::<WeldError>() {
        Some(WeldError::SourceDirInvalid { .. }) => {
            Some("pass --src <DIR> or set [build].src in svgweld.toml to an existing directory")
        }
        Some(WeldError::DestDirInvalid { .. }) => {
            Some("create the destination directory first; svgweld does not create it for you")
        }
        Some(WeldError::ManifestNotFound { .. }) => {
            Some("check the --manifest-path value, or run from the directory containing svgweld.toml")
        }
        Some(WeldError::ManifestParse { .. }) => {
            Some("the manifest accepts [build] src/dest/files and [policy] dangling-references/url-attributes")
        }
        Some(WeldError::Config { .. }) => {
            Some("source and destination can come from flags (--src/--dest) or from svgweld.toml")
        }
        Some(WeldError::UnknownTarget { .. }) => {
            Some("files to build are given as paths relative to the source directory")
        }
        Some(WeldError::CircularDependency { .. }) => {
            Some("break the cycle by removing one of the listed references; a definition cannot depend on itself")
        }
        Some(WeldError::IdentityCollision { .. }) => {
            Some("rename one of the colliding ids; output identifiers must stay unique across the whole build")
        }
        Some(WeldError::DanglingReferences { .. }) => {
            Some("fix the listed references, or drop the deny policy to downgrade them to warnings")
        }
        _ => None,
    };

    let mut ctx = ErrorContext::new(error);
    if let Some(suggestion) = suggestion {
        ctx = ctx.with_suggestion(suggestion);
    }
    ctx
}
