//! Reference extraction and canonicalization.
//!
//! An element can point at another resource in two ways: an `href`
//! attribute (with or without a namespace prefix) whose whole value is
//! the reference, or any other attribute whose value has the literal
//! shape `url(...)`. Each raw value is classified as either a local
//! reference — canonicalized to an absolute `(file, fragment)`
//! coordinate so different spellings of the same target compare equal —
//! or an external URL, which is passed through untouched and never
//! enters the dependency graph.
//!
//! Which attributes are scanned for `url(...)` values, and whether a
//! reference that resolves to nothing is tolerated, are policy rather
//! than fixed semantics; see [`LinkPolicy`].

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::{fmt, fs};

use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::utils::fs::normalize_relative;
use crate::xml::AttrMap;

static URL_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^url\((.*)\)").expect("url() pattern is valid"));

/// SVG presentation attributes that may carry `url(...)` paint or
/// clip references, for the narrow scanning policy.
const PRESENTATION_ATTRS: &[&str] = &[
    "fill",
    "stroke",
    "clip-path",
    "mask",
    "filter",
    "marker-start",
    "marker-mid",
    "marker-end",
];

/// How to treat references that resolve to no loaded resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingPolicy {
    /// Report and continue; the reference is assumed to be
    /// intentionally external to the build.
    #[default]
    Warn,
    /// Abort the build.
    Error,
}

/// Which attributes are scanned for `url(...)` values. `href` is
/// always scanned regardless of this setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlAttrScope {
    /// Any attribute whose value matches `url(...)`.
    #[default]
    All,
    /// Only the fixed list of SVG presentation attributes.
    Presentation,
}

/// The configurable knobs of reference handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkPolicy {
    pub dangling: DanglingPolicy,
    pub url_attrs: UrlAttrScope,
}

/// A reference normalized to an absolute `(file, fragment)` coordinate.
/// `file` is relative to the canonicalized source root, so two
/// different relative spellings of the same file compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalRef {
    pub file: PathBuf,
    pub fragment: String,
}

impl CanonicalRef {
    pub fn new(file: impl Into<PathBuf>, fragment: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            fragment: fragment.into(),
        }
    }
}

impl fmt::Display for CanonicalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.file.display(), self.fragment)
    }
}

/// A classified reference found in an attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Points inside the loaded source tree.
    Local(CanonicalRef),
    /// Carries a scheme or network location. Never rewritten, never
    /// followed, excluded from the dependency graph.
    External(String),
}

/// How a reference was embedded in its attribute, which decides how the
/// rewriter re-wraps the new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// The whole attribute value is the reference (`href`).
    Href,
    /// The reference sits inside a `url(...)` wrapper.
    Url,
}

/// One reference-shaped attribute value found on an element.
#[derive(Debug, Clone)]
pub struct ScannedRef {
    /// Local (namespace-stripped) name of the carrying attribute.
    pub attr: String,
    pub kind: RefKind,
    /// The raw reference value, unwrapped and unquoted.
    pub target: String,
}

/// Finds every reference-shaped value on an element's attributes.
pub fn scan_attributes(attrs: &AttrMap, policy: &LinkPolicy) -> Vec<ScannedRef> {
    let mut found = Vec::new();
    for attr in attrs.iter() {
        let local = attr.local();
        if local == "href" {
            found.push(ScannedRef {
                attr: local.to_string(),
                kind: RefKind::Href,
                target: attr.value.clone(),
            });
            continue;
        }
        if policy.url_attrs == UrlAttrScope::Presentation && !PRESENTATION_ATTRS.contains(&local) {
            continue;
        }
        if let Some(caps) = URL_VALUE.captures(&attr.value) {
            found.push(ScannedRef {
                attr: local.to_string(),
                kind: RefKind::Url,
                target: unquote(caps[1].trim()).to_string(),
            });
        }
    }
    found
}

/// Classifies and canonicalizes one raw reference value.
///
/// A value with a scheme or network location is external. A pure
/// fragment resolves against the referencing element's own file. A
/// relative path resolves against the source root, through the
/// filesystem where the target exists so symlinked spellings collapse,
/// lexically otherwise. Query components are discarded.
pub fn canonicalize(raw: &str, own_file: &Path, root: &Path) -> Reference {
    let raw = raw.trim();
    if raw.starts_with("//") || Url::parse(raw).is_ok() {
        return Reference::External(raw.to_string());
    }

    let (path_part, fragment) = match raw.split_once('#') {
        Some((p, f)) => (p, f),
        None => (raw, ""),
    };
    let path_part = path_part.split('?').next().unwrap_or("");

    if path_part.is_empty() {
        return Reference::Local(CanonicalRef::new(own_file, fragment));
    }

    let joined = root.join(path_part);
    let file = match fs::canonicalize(&joined) {
        Ok(real) => real.strip_prefix(root).unwrap_or(&real).to_path_buf(),
        Err(_) => normalize_relative(Path::new(path_part)),
    };
    Reference::Local(CanonicalRef::new(file, fragment))
}

/// Scans and canonicalizes all references on an element. Called once
/// at load time; the result set drives link-graph construction.
pub fn extract_references(
    attrs: &AttrMap,
    own_file: &Path,
    root: &Path,
    policy: &LinkPolicy,
) -> Vec<Reference> {
    scan_attributes(attrs, policy)
        .iter()
        .map(|scanned| canonicalize(&scanned.target, own_file, root))
        .collect()
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
