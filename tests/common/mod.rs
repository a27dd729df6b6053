//! Common test utilities and fixtures for svgweld integration tests.

// Allow dead code because these utilities are shared across different
// test files and not every helper is used in every file.
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway project layout: a temp directory with `src/` and
/// `dist/` subdirectories and helpers to populate sources and run the
/// binary against them.
pub struct TestBuild {
    _tmp: TempDir,
    root: PathBuf,
}

impl TestBuild {
    pub fn new() -> Result<Self> {
        let tmp = TempDir::new().context("failed to create temp directory")?;
        let root = tmp.path().to_path_buf();
        fs::create_dir(root.join("src"))?;
        fs::create_dir(root.join("dist"))?;
        Ok(Self {
            _tmp: tmp,
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.root.join("dist")
    }

    /// Writes a source file under `src/`, creating parent directories.
    pub fn write_source(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.src_dir().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)
            .with_context(|| format!("failed to write source {relative}"))?;
        Ok(path)
    }

    /// Writes an `svgweld.toml` at the project root.
    pub fn write_manifest(&self, content: &str) -> Result<()> {
        fs::write(self.root.join("svgweld.toml"), content)
            .context("failed to write manifest")?;
        Ok(())
    }

    /// Creates an extra directory under the project root.
    pub fn make_dir(&self, relative: &str) -> Result<PathBuf> {
        let path = self.root.join(relative);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// A command for the svgweld binary, running in the project root.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("svgweld").expect("binary builds");
        cmd.current_dir(&self.root);
        cmd
    }

    /// A `build` command preconfigured with `--src src --dest dist`.
    pub fn build_cmd(&self, files: &[&str]) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg("build").arg("--src").arg("src").arg("--dest").arg("dist");
        for file in files {
            cmd.arg(file);
        }
        cmd
    }

    /// A `validate` command preconfigured with `--src src`.
    pub fn validate_cmd(&self, files: &[&str]) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg("validate").arg("--src").arg("src");
        for file in files {
            cmd.arg(file);
        }
        cmd
    }

    /// Reads a built file from `dist/`.
    pub fn read_output(&self, relative: &str) -> Result<String> {
        fs::read_to_string(self.dist_dir().join(relative))
            .with_context(|| format!("failed to read output {relative}"))
    }

    /// True when `dist/` contains no files at all.
    pub fn dist_is_empty(&self) -> Result<bool> {
        Ok(fs::read_dir(self.dist_dir())?.next().is_none())
    }
}

/// The two-file scenario used throughout: a definitions file and a
/// document referencing it across files.
pub fn defs_and_logo(project: &TestBuild) -> Result<()> {
    project.write_source(
        "defs.svg",
        r#"<svg xmlns="http://www.w3.org/2000/svg"><rect id="icon" width="4" height="4"/></svg>"#,
    )?;
    project.write_source(
        "logo.svg",
        r#"<svg xmlns="http://www.w3.org/2000/svg"><use href="defs.svg#icon" x="1"/></svg>"#,
    )?;
    Ok(())
}
