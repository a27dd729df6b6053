//! Cross-cutting filesystem utilities.

pub mod fs;
