//! Non-fatal diagnostics.
//!
//! Fatal problems abort the build through [`crate::core::WeldError`];
//! everything the build can tolerate — a reference that resolves to
//! nothing, a duplicated local id — is collected as a [`Diagnostic`]
//! and surfaced on stderr after the build completes. Diagnostics never
//! affect the exit status under the default policy.

use std::fmt;

/// What kind of tolerated problem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// An `href`/`url(...)` reference whose (file, id) coordinate does
    /// not match any loaded resource.
    DanglingReference,
    /// Two elements in the same file declared the same `id`; the first
    /// occurrence stays addressable, later ones do not.
    DuplicateId,
}

/// A single tolerated problem, with a human-readable description.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn dangling(origin: impl fmt::Display, reference: impl fmt::Display) -> Self {
        Self {
            kind: DiagnosticKind::DanglingReference,
            message: format!("{origin} references unknown resource {reference}"),
        }
    }

    pub fn duplicate_id(file: impl fmt::Display, id: &str) -> Self {
        Self {
            kind: DiagnosticKind::DuplicateId,
            message: format!("{file} declares id \"{id}\" more than once; keeping the first"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
