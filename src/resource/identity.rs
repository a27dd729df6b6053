//! Deterministic structural identity.
//!
//! Every element gets an identity derived from where it sits, not from
//! allocation order: a SHA-256 digest over (file path, tag name, parent
//! identity, sibling index). The same source tree therefore produces
//! the same identities on every run and on every machine, which is what
//! makes builds reproducible and output identifiers stable.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::constants::OUTPUT_ID_HASH_LEN;

/// Derives the stable identity of an element from its coordinates.
///
/// Pure function: identical inputs always produce the identical digest.
/// Fields are separated by NUL bytes so adjacent fields cannot run into
/// each other, and path separators are normalized so the digest agrees
/// across platforms.
pub fn identify(file: &Path, tag: &str, parent_identity: &str, index: usize) -> String {
    let file = file.to_string_lossy().replace('\\', "/");
    let mut hasher = Sha256::new();
    hasher.update(file.as_bytes());
    hasher.update([0u8]);
    hasher.update(tag.as_bytes());
    hasher.update([0u8]);
    hasher.update(parent_identity.as_bytes());
    hasher.update([0u8]);
    hasher.update(index.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Forms the identifier written into the output document: the authored
/// id plus a digest prefix, globally unique even when two files reuse
/// the same local id. Injectivity is verified separately at the end of
/// the rewrite pass.
pub fn output_identity(original_id: &str, identity: &str) -> String {
    format!("{original_id}-{}", &identity[..OUTPUT_ID_HASH_LEN])
}
