//! Core types shared across the build pipeline: the error taxonomy,
//! user-facing error display, and non-fatal diagnostics.

pub mod diagnostic;
pub mod error;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{ErrorContext, WeldError, user_friendly_error};
