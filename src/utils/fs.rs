//! File system helpers: deterministic source discovery and atomic
//! output writes.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::constants::SVG_EXTENSION;

/// Recursively finds every SVG file under `root`, sorted by path so
/// load order — and everything derived from it — is deterministic.
/// Returns `(absolute, root-relative)` pairs.
pub fn find_svg_files(root: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(SVG_EXTENSION));
        if !is_svg {
            continue;
        }
        let relative = path
            .strip_prefix(root)
            .with_context(|| format!("{} escaped the source root", path.display()))?
            .to_path_buf();
        files.push((path, relative));
    }
    Ok(files)
}

/// Ensures a directory exists, creating it and all parents if needed.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        anyhow::bail!("path exists but is not a directory: {}", path.display());
    }
    Ok(())
}

/// Writes a file atomically: content goes to a temporary sibling first,
/// then an atomic rename replaces the target. A failed build can never
/// leave a half-written output behind.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        file.write_all(content)
            .with_context(|| format!("failed to write to temp file: {}", temp_path.display()))?;
        file.sync_all().context("failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("failed to rename temp file to: {}", path.display()))?;
    Ok(())
}

/// Componentwise path normalization without touching the filesystem:
/// drops `.`, folds `..` into its parent where possible. Used both for
/// reference targets that do not exist on disk and for comparing
/// user-supplied target spellings against loaded file paths.
pub fn normalize_relative(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_svg_files_sorted_and_relative() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("icons")).unwrap();
        fs::write(root.join("zebra.svg"), "<svg/>").unwrap();
        fs::write(root.join("icons/play.SVG"), "<svg/>").unwrap();
        fs::write(root.join("notes.txt"), "ignored").unwrap();

        let files = find_svg_files(root).unwrap();
        let relative: Vec<_> = files.iter().map(|(_, r)| r.clone()).collect();
        assert_eq!(
            relative,
            [PathBuf::from("icons/play.SVG"), PathBuf::from("zebra.svg")]
        );
    }

    #[test]
    fn atomic_write_creates_parents_and_replaces() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("out/nested/file.svg");

        atomic_write(&target, b"first").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"first");

        atomic_write(&target, b"second").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"second");
        assert!(!target.with_extension("tmp").exists());
    }

    #[test]
    fn normalization_folds_dot_segments() {
        assert_eq!(
            normalize_relative(Path::new("a/./b/../c.svg")),
            PathBuf::from("a/c.svg")
        );
        assert_eq!(normalize_relative(Path::new("./x.svg")), PathBuf::from("x.svg"));
    }
}
