//! The resource model: every element of every loaded source file,
//! wrapped as an addressable, identity-bearing node.
//!
//! Resources live in a single arena ([`ResourceSet`]) indexed by
//! [`ResourceId`]; containment is parent/child indices, so the whole
//! universe can be walked, graphed, and mutated without reference
//! cycles. Construction assigns each element its structural identity,
//! captures the authored `id`, rewrites the `id` attribute to the
//! globally unique output identifier, and extracts the element's
//! references — in that order, so canonicalization always works
//! against authored ids and never sees a rewritten one.
//!
//! Comments and text are carried as inert [`Content`] so they survive
//! into the output, but they are never resources and never hold
//! references.

mod identity;

pub use identity::{identify, output_identity};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::Diagnostic;
use crate::reference::{CanonicalRef, LinkPolicy, Reference, extract_references};
use crate::xml::{AttrMap, XmlElement, XmlNode, local_name};

/// Index of a resource in its [`ResourceSet`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(usize);

impl ResourceId {
    pub fn index(self) -> usize {
        self.0
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }
}

/// Ordered child content of a resource. Only `Element` entries are
/// resources; the rest is preserved for serialization.
#[derive(Debug, Clone)]
pub enum Content {
    Element(ResourceId),
    Text(String),
    CData(String),
    Comment(String),
}

/// One XML element from a source tree, with identity and reference
/// metadata attached.
#[derive(Debug, Clone)]
pub struct Resource {
    pub id: ResourceId,
    /// Structural identity digest; see [`identify`].
    pub identity: String,
    /// Owning file, relative to the source root.
    pub file: PathBuf,
    /// Qualified tag name as authored.
    pub tag: String,
    pub attrs: AttrMap,
    /// The `id` attribute as authored, captured before rewriting.
    pub original_id: Option<String>,
    /// The globally unique identifier written into the output; present
    /// iff the element was authored with an `id`.
    pub output_id: Option<String>,
    pub children: Vec<Content>,
    /// Canonicalized references, computed once at load time.
    pub references: Vec<Reference>,
    pub parent: Option<ResourceId>,
}

impl Resource {
    /// Tag name with any namespace prefix stripped.
    pub fn local_tag(&self) -> &str {
        local_name(&self.tag)
    }

    /// Human-readable name for diagnostics and cycle reports.
    pub fn display_name(&self) -> String {
        match &self.original_id {
            Some(id) => format!("{}#{}", self.file.display(), id),
            None => format!(
                "{}:<{}@{}>",
                self.file.display(),
                self.tag,
                &self.identity[..8]
            ),
        }
    }
}

/// One loaded source file: its path and the resource wrapping its root
/// element.
#[derive(Debug, Clone)]
pub struct Document {
    pub file: PathBuf,
    pub root: ResourceId,
}

/// The whole loaded universe: every resource from every source file,
/// plus the coordinate registry that resolves canonical references.
///
/// The registry maps both `(file, original_id)` and
/// `(file, output_id)` to the resource. Graph construction resolves
/// authored coordinates; registering the output coordinate as well is
/// what makes the reference rewrite idempotent — an already-rewritten
/// fragment resolves straight back to the same resource.
#[derive(Debug)]
pub struct ResourceSet {
    root_dir: PathBuf,
    resources: Vec<Resource>,
    documents: Vec<Document>,
    by_coord: HashMap<CanonicalRef, ResourceId>,
}

impl ResourceSet {
    /// `root_dir` must already be canonicalized; reference paths are
    /// compared against it.
    pub fn new(root_dir: PathBuf) -> Self {
        Self {
            root_dir,
            resources: Vec::new(),
            documents: Vec::new(),
            by_coord: HashMap::new(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Converts a parsed tree into resources, registering the file as a
    /// document. Returns the root resource.
    pub fn load_document(
        &mut self,
        file: PathBuf,
        root: XmlElement,
        policy: &LinkPolicy,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ResourceId {
        let root_id = self.add_element(&file, root, None, "", 0, policy, diagnostics);
        self.documents.push(Document {
            file,
            root: root_id,
        });
        root_id
    }

    #[allow(clippy::too_many_arguments)]
    fn add_element(
        &mut self,
        file: &Path,
        element: XmlElement,
        parent: Option<ResourceId>,
        parent_identity: &str,
        index: usize,
        policy: &LinkPolicy,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ResourceId {
        let XmlElement {
            tag,
            mut attrs,
            children,
        } = element;

        let identity = identify(file, &tag, parent_identity, index);
        let original_id = attrs.get("id").map(str::to_string);
        let output_id = original_id.as_deref().map(|oid| output_identity(oid, &identity));
        if let Some(out) = &output_id {
            attrs.set("id", out.clone());
        }
        let references = extract_references(&attrs, file, &self.root_dir, policy);

        let id = ResourceId(self.resources.len());
        self.resources.push(Resource {
            id,
            identity: identity.clone(),
            file: file.to_path_buf(),
            tag,
            attrs,
            original_id: original_id.clone(),
            output_id: output_id.clone(),
            children: Vec::new(),
            references,
            parent,
        });

        if let Some(original) = &original_id {
            let coord = CanonicalRef::new(file, original.clone());
            if self.by_coord.contains_key(&coord) {
                diagnostics.push(Diagnostic::duplicate_id(file.display(), original));
            } else {
                self.by_coord.insert(coord, id);
            }
        }
        if let Some(out) = &output_id {
            self.by_coord
                .entry(CanonicalRef::new(file, out.clone()))
                .or_insert(id);
        }

        let mut contents = Vec::with_capacity(children.len());
        let mut element_index = 0;
        for child in children {
            match child {
                XmlNode::Element(child_element) => {
                    let child_id = self.add_element(
                        file,
                        child_element,
                        Some(id),
                        &identity,
                        element_index,
                        policy,
                        diagnostics,
                    );
                    contents.push(Content::Element(child_id));
                    element_index += 1;
                }
                XmlNode::Text(t) => contents.push(Content::Text(t)),
                XmlNode::CData(t) => contents.push(Content::CData(t)),
                XmlNode::Comment(t) => contents.push(Content::Comment(t)),
            }
        }
        self.resources[id.0].children = contents;
        id
    }

    pub fn get(&self, id: ResourceId) -> &Resource {
        &self.resources[id.0]
    }

    pub fn get_mut(&mut self, id: ResourceId) -> &mut Resource {
        &mut self.resources[id.0]
    }

    /// Resources in load order (files in load order, elements in
    /// document preorder). Every downstream ordering derives from this.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = ResourceId> {
        (0..self.resources.len()).map(ResourceId)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document_for(&self, file: &Path) -> Option<&Document> {
        self.documents.iter().find(|d| d.file == file)
    }

    /// Resolves a canonical coordinate to a loaded resource, by
    /// authored id or by output id.
    pub fn resolve(&self, coord: &CanonicalRef) -> Option<ResourceId> {
        self.by_coord.get(coord).copied()
    }
}
