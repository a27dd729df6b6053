//! Closure computation and `<defs>` inlining.
//!
//! For a requested output file, the engine determines what the file
//! already owns (its *home set*: everything reachable from its root
//! through containment), what it transitively depends on through the
//! full dependency graph, and the difference — the *external set* of
//! definitions the output document must import. Only the *roots* of
//! the external set are spliced in: a root's descendants are physical
//! children of its XML subtree and come along for free.
//!
//! Inlining is copy-based and non-destructive. Rendering detaches a
//! deep copy of each subtree from the arena, so the same definition can
//! be inlined into any number of output files in one build.

use std::collections::HashSet;

use crate::graph::ResourceGraph;
use crate::resource::{Content, ResourceId, ResourceSet};
use crate::xml::{XmlElement, XmlNode};

/// The import plan for one output file.
#[derive(Debug)]
pub struct Closure {
    /// Resources the file owns through containment, root included.
    pub home: HashSet<ResourceId>,
    /// External definition roots to splice into `<defs>`, dependencies
    /// first.
    pub roots: Vec<ResourceId>,
}

/// Computes the minimal external import set for the file rooted at
/// `target_root`.
pub fn compute_closure(
    set: &ResourceSet,
    containment: &ResourceGraph,
    full: &ResourceGraph,
    target_root: ResourceId,
) -> Closure {
    let mut home = containment.descendants(target_root);
    home.insert(target_root);

    let reachable = full.descendants(target_root);
    let external: HashSet<ResourceId> =
        reachable.difference(&home).copied().collect();

    // Keep only roots: external nodes with no external ancestor under
    // containment. Descendants of a kept node are already inside its
    // subtree.
    let is_root = |id: ResourceId| {
        let mut cursor = set.get(id).parent;
        while let Some(parent) = cursor {
            if external.contains(&parent) {
                return false;
            }
            cursor = set.get(parent).parent;
        }
        true
    };

    // Order dependencies first so a spliced definition never precedes
    // something it refers to. The full graph is checked acyclic before
    // closures are computed; the fallback is arena order.
    let ordered = full
        .topological_order()
        .unwrap_or_else(|| full.nodes());
    let roots = ordered
        .into_iter()
        .filter(|id| external.contains(id) && is_root(*id))
        .collect();

    Closure {
        home,
        roots,
    }
}

/// Deep-copies a resource subtree back into a plain XML tree.
pub fn detach(set: &ResourceSet, id: ResourceId) -> XmlElement {
    let resource = set.get(id);
    let mut element = XmlElement::new(resource.tag.clone());
    element.attrs = resource.attrs.clone();
    for content in &resource.children {
        element.children.push(match content {
            Content::Element(child) => XmlNode::Element(detach(set, *child)),
            Content::Text(t) => XmlNode::Text(t.clone()),
            Content::CData(t) => XmlNode::CData(t.clone()),
            Content::Comment(t) => XmlNode::Comment(t.clone()),
        });
    }
    element
}

/// Renders the output document for `target_root`: the file's own tree
/// with copies of the external roots appended to its `<defs>`. When the
/// document has no `<defs>` and needs one, it is synthesized as the
/// first child of the root element. With nothing to import, the
/// document is rendered unchanged.
pub fn render_document(set: &ResourceSet, target_root: ResourceId, roots: &[ResourceId]) -> XmlElement {
    let mut document = detach(set, target_root);
    if roots.is_empty() {
        return document;
    }

    let imports: Vec<XmlNode> = roots
        .iter()
        .map(|id| XmlNode::Element(detach(set, *id)))
        .collect();

    match find_defs_mut(&mut document) {
        Some(defs) => defs.children.extend(imports),
        None => {
            let mut defs = XmlElement::new("defs");
            defs.children = imports;
            document.children.insert(0, XmlNode::Element(defs));
        }
    }
    document
}

/// First `<defs>` element in document order, namespace-stripped match.
fn find_defs_mut(element: &mut XmlElement) -> Option<&mut XmlElement> {
    if element.local_tag() == "defs" {
        return Some(element);
    }
    for child in &mut element.children {
        if let XmlNode::Element(e) = child
            && let Some(found) = find_defs_mut(e)
        {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Diagnostic;
    use crate::reference::{LinkPolicy, Reference};
    use crate::xml::parse_document;
    use std::path::PathBuf;

    struct Fixture {
        set: ResourceSet,
        containment: ResourceGraph,
        full: ResourceGraph,
    }

    fn build(files: &[(&str, &str)]) -> Fixture {
        let mut set = ResourceSet::new(PathBuf::from("/nonexistent-root"));
        let mut diags: Vec<Diagnostic> = Vec::new();
        let policy = LinkPolicy::default();
        for (file, content) in files {
            let doc = parse_document(content).unwrap();
            set.load_document(PathBuf::from(file), doc, &policy, &mut diags);
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
                if let Reference::Local(coord) = reference
                    && let Some(target) = set.resolve(coord)
                {
                    links.add_edge(resource.id, target);
                }
            }
        }
        let full = containment.compose(&links);
        Fixture {
            set,
            containment,
            full,
        }
    }

    fn root_of(fixture: &Fixture, file: &str) -> ResourceId {
        fixture
            .set
            .document_for(&PathBuf::from(file))
            .expect("file loaded")
            .root
    }

    fn closure_of(fixture: &Fixture, file: &str) -> Closure {
        compute_closure(
            &fixture.set,
            &fixture.containment,
            &fixture.full,
            root_of(fixture, file),
        )
    }

    #[test]
    fn external_definition_is_imported_by_its_root_only() {
        // A contains child B and references C; the import set must be
        // exactly {A, C} — B rides along inside A's subtree.
        let fixture = build(&[
            (
                "defs.svg",
                r##"<svg><symbol id="a"><rect id="b"/><use href="#c"/></symbol><circle id="c"/></svg>"##,
            ),
            ("logo.svg", r#"<svg><use href="defs.svg#a"/></svg>"#),
        ]);

        let closure = closure_of(&fixture, "logo.svg");
        let names: Vec<_> = closure
            .roots
            .iter()
            .map(|id| fixture.set.get(*id).original_id.clone().unwrap())
            .collect();
        assert!(names.contains(&"a".to_string()));
        assert!(names.contains(&"c".to_string()));
        assert!(!names.contains(&"b".to_string()));
        assert_eq!(closure.roots.len(), 2);
    }

    #[test]
    fn dependencies_precede_their_dependents() {
        let fixture = build(&[
            (
                "defs.svg",
                r##"<svg><symbol id="a"><use href="#c"/></symbol><circle id="c"/></svg>"##,
            ),
            ("logo.svg", r#"<svg><use href="defs.svg#a"/></svg>"#),
        ]);

        let closure = closure_of(&fixture, "logo.svg");
        let names: Vec<_> = closure
            .roots
            .iter()
            .map(|id| fixture.set.get(*id).original_id.clone().unwrap())
            .collect();
        assert_eq!(names, ["c", "a"]);
    }

    #[test]
    fn self_contained_file_needs_no_imports() {
        let fixture = build(&[(
            "a.svg",
            r##"<svg><use href="#self"/><rect id="self"/></svg>"##,
        )]);

        let closure = closure_of(&fixture, "a.svg");
        assert!(closure.roots.is_empty());

        let rendered = render_document(&fixture.set, root_of(&fixture, "a.svg"), &closure.roots);
        assert!(rendered.child_elements().all(|e| e.local_tag() != "defs"));
    }

    #[test]
    fn imports_land_in_existing_defs() {
        let fixture = build(&[
            ("defs.svg", r#"<svg><rect id="icon"/></svg>"#),
            (
                "logo.svg",
                r#"<svg><defs><circle id="own"/></defs><use href="defs.svg#icon"/></svg>"#,
            ),
        ]);

        let closure = closure_of(&fixture, "logo.svg");
        let rendered = render_document(&fixture.set, root_of(&fixture, "logo.svg"), &closure.roots);

        let defs: Vec<_> = rendered
            .child_elements()
            .filter(|e| e.local_tag() == "defs")
            .collect();
        assert_eq!(defs.len(), 1);
        // Own circle plus the imported rect.
        assert_eq!(defs[0].child_elements().count(), 2);
        assert_eq!(defs[0].child_elements().last().unwrap().tag, "rect");
    }

    #[test]
    fn defs_is_synthesized_as_first_child_when_missing() {
        let fixture = build(&[
            ("defs.svg", r#"<svg><rect id="icon"/></svg>"#),
            ("logo.svg", r#"<svg><use href="defs.svg#icon"/></svg>"#),
        ]);

        let closure = closure_of(&fixture, "logo.svg");
        let rendered = render_document(&fixture.set, root_of(&fixture, "logo.svg"), &closure.roots);

        let first = rendered.child_elements().next().unwrap();
        assert_eq!(first.local_tag(), "defs");
        assert_eq!(first.child_elements().count(), 1);
    }

    #[test]
    fn rendering_is_nondestructive_across_targets() {
        let fixture = build(&[
            ("defs.svg", r#"<svg><rect id="icon"/></svg>"#),
            ("a.svg", r#"<svg><use href="defs.svg#icon"/></svg>"#),
            ("b.svg", r#"<svg><use href="defs.svg#icon"/></svg>"#),
        ]);

        let closure_a = closure_of(&fixture, "a.svg");
        let closure_b = closure_of(&fixture, "b.svg");
        let a = render_document(&fixture.set, root_of(&fixture, "a.svg"), &closure_a.roots);
        let b = render_document(&fixture.set, root_of(&fixture, "b.svg"), &closure_b.roots);

        for doc in [&a, &b] {
            let defs = doc.child_elements().find(|e| e.local_tag() == "defs").unwrap();
            assert_eq!(defs.child_elements().count(), 1);
        }
    }
}
