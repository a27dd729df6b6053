//! The batch build pipeline.
//!
//! Everything runs sequentially over the full input set before any
//! output is emitted: load & parse → assign identities and rewrite `id`
//! attributes → extract references against authored ids → build the
//! containment and link graphs → check the composed graph for cycles →
//! rewrite references to output identities → verify identifier
//! injectivity → compute closures → render → write. Correctness needs
//! the whole dependency universe in view before any single file can be
//! finalized, so there is no partial or incremental mode.
//!
//! Output is all-or-nothing: every requested document is rendered in
//! memory first, and files are only written once the entire build has
//! succeeded. Non-fatal diagnostics accumulate in the reports and are
//! surfaced by the CLI after completion.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::{Diagnostic, DiagnosticKind, WeldError};
use crate::graph::ResourceGraph;
use crate::inline::{compute_closure, render_document};
use crate::reference::{DanglingPolicy, LinkPolicy, Reference};
use crate::resource::{Content, ResourceSet};
use crate::rewrite::{rewrite_references, verify_unique_output_ids};
use crate::utils::fs::{atomic_write, find_svg_files, normalize_relative};
use crate::xml::{parse_document, write_document};

/// Inputs of a full build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub src_dir: PathBuf,
    pub dest_dir: PathBuf,
    /// Files to build, as paths relative to the source directory.
    pub targets: Vec<PathBuf>,
    pub policy: LinkPolicy,
}

/// The fully analyzed source universe: all resources, both graphs and
/// their union, with identities assigned, references rewritten, and
/// injectivity verified.
#[derive(Debug)]
pub struct Universe {
    pub set: ResourceSet,
    pub containment: ResourceGraph,
    pub links: ResourceGraph,
    pub full: ResourceGraph,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of a successful build.
#[derive(Debug)]
pub struct BuildReport {
    pub files_loaded: usize,
    pub resources: usize,
    pub written: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of a successful validation pass (a build minus the writes).
#[derive(Debug)]
pub struct ValidateReport {
    pub files_loaded: usize,
    pub resources: usize,
    pub targets_checked: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Loads and analyzes every source file under `src_dir`, running the
/// pipeline through reference rewriting and injectivity verification.
pub fn load_universe(src_dir: &Path, policy: &LinkPolicy) -> Result<Universe> {
    if !src_dir.is_dir() {
        return Err(WeldError::SourceDirInvalid {
            path: src_dir.display().to_string(),
        }
        .into());
    }
    let root = fs::canonicalize(src_dir)
        .with_context(|| format!("failed to resolve {}", src_dir.display()))?;

    let mut set = ResourceSet::new(root.clone());
    let mut diagnostics = Vec::new();
    let files = find_svg_files(&root)?;
    for (absolute, relative) in files {
        let text = fs::read_to_string(&absolute)
            .with_context(|| format!("failed to read {}", absolute.display()))?;
        let tree = parse_document(&text).map_err(|source| WeldError::XmlParse {
            path: relative.display().to_string(),
            source,
        })?;
        let root_id = set.load_document(relative.clone(), tree, policy, &mut diagnostics);
        debug!(file = %relative.display(), root = root_id.index(), "loaded source file");
    }

    let mut containment = ResourceGraph::new();
    let mut links = ResourceGraph::new();
    for resource in set.iter() {
        containment.add_node(resource.id);
        links.add_node(resource.id);
        for content in &resource.children {
            if let Content::Element(child) = content {
                containment.add_edge(resource.id, *child);
            }
        }
        for reference in &resource.references {
            let Reference::Local(coord) = reference else {
                continue;
            };
            match set.resolve(coord) {
                Some(target) => links.add_edge(resource.id, target),
                None => diagnostics.push(Diagnostic::dangling(resource.display_name(), coord)),
            }
        }
    }

    if policy.dangling == DanglingPolicy::Error {
        let dangling: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::DanglingReference)
            .collect();
        if let Some(first) = dangling.first() {
            return Err(WeldError::DanglingReferences {
                count: dangling.len(),
                first: first.message.clone(),
            }
            .into());
        }
    }

    let full = containment.compose(&links);
    if let Some(cycle) = full.detect_cycle() {
        let path = cycle
            .iter()
            .map(|id| set.get(*id).display_name())
            .collect::<Vec<_>>()
            .join(" → ");
        return Err(WeldError::CircularDependency {
            cycle: path,
        }
        .into());
    }

    rewrite_references(&mut set, policy);
    verify_unique_output_ids(set.iter())?;

    debug!(
        files = set.documents().len(),
        resources = set.len(),
        link_edges = links.edge_count(),
        "universe loaded"
    );

    Ok(Universe {
        set,
        containment,
        links,
        full,
        diagnostics,
    })
}

/// Runs a full build: analyze, render every requested document in
/// memory, then write them all.
pub fn build(options: &BuildOptions) -> Result<BuildReport> {
    // Both directories are checked before any source content is read.
    if !options.src_dir.is_dir() {
        return Err(WeldError::SourceDirInvalid {
            path: options.src_dir.display().to_string(),
        }
        .into());
    }
    if !options.dest_dir.is_dir() {
        return Err(WeldError::DestDirInvalid {
            path: options.dest_dir.display().to_string(),
        }
        .into());
    }
    if options.targets.is_empty() {
        return Err(WeldError::Config {
            reason: "no files to build; pass them as arguments or list them in [build].files"
                .to_string(),
        }
        .into());
    }

    let universe = load_universe(&options.src_dir, &options.policy)?;

    let mut rendered = Vec::with_capacity(options.targets.len());
    for target in &options.targets {
        let target = normalize_relative(target);
        let document = universe.set.document_for(&target).ok_or_else(|| {
            WeldError::UnknownTarget {
                path: target.display().to_string(),
            }
        })?;
        let closure = compute_closure(
            &universe.set,
            &universe.containment,
            &universe.full,
            document.root,
        );
        debug!(
            file = %target.display(),
            imports = closure.roots.len(),
            "computed inline closure"
        );
        let tree = render_document(&universe.set, document.root, &closure.roots);
        let bytes = write_document(&tree)?;
        rendered.push((target, bytes));
    }

    // Everything rendered successfully; only now touch the destination.
    let mut written = Vec::with_capacity(rendered.len());
    for (target, bytes) in rendered {
        let out_path = options.dest_dir.join(&target);
        atomic_write(&out_path, &bytes)?;
        written.push(out_path);
    }

    Ok(BuildReport {
        files_loaded: universe.set.documents().len(),
        resources: universe.set.len(),
        written,
        diagnostics: universe.diagnostics,
    })
}

/// Runs the pipeline through closure computation without writing
/// anything. With no explicit targets, every loaded file is checked.
pub fn validate(src_dir: &Path, targets: &[PathBuf], policy: &LinkPolicy) -> Result<ValidateReport> {
    let universe = load_universe(src_dir, policy)?;

    let targets: Vec<PathBuf> = if targets.is_empty() {
        universe.set.documents().iter().map(|d| d.file.clone()).collect()
    } else {
        targets.iter().map(|t| normalize_relative(t)).collect()
    };

    for target in &targets {
        let document = universe.set.document_for(target).ok_or_else(|| {
            WeldError::UnknownTarget {
                path: target.display().to_string(),
            }
        })?;
        compute_closure(
            &universe.set,
            &universe.containment,
            &universe.full,
            document.root,
        );
    }

    Ok(ValidateReport {
        files_loaded: universe.set.documents().len(),
        resources: universe.set.len(),
        targets_checked: targets.len(),
        diagnostics: universe.diagnostics,
    })
}

/// Renders the link-dependency trees of one file's resources as text.
pub fn dependency_tree(src_dir: &Path, file: &Path, policy: &LinkPolicy) -> Result<String> {
    let universe = load_universe(src_dir, policy)?;
    let file = normalize_relative(file);
    if universe.set.document_for(&file).is_none() {
        return Err(WeldError::UnknownTarget {
            path: file.display().to_string(),
        }
        .into());
    }

    // Start a tree at every resource of the file that references
    // something, then expand through the full graph so definitions
    // pulled in by a dependency's own children show up too.
    let label = |id| universe.set.get(id).display_name();
    let mut out = format!("{}\n", file.display());
    let mut any = false;
    for resource in universe.set.iter().filter(|r| r.file == file) {
        if !universe.links.direct_deps(resource.id).is_empty() {
            out.push_str(&universe.full.to_tree_string(resource.id, &label));
            any = true;
        }
    }
    if !any {
        out.push_str("(no references)\n");
    }
    Ok(out)
}
