//! Reference rewriting.
//!
//! Once every resource has its output identity, each resolvable
//! reference attribute is rewritten to a pure local fragment pointing
//! at the target's output identifier. After inlining, every pointer in
//! an output document is self-contained: nothing refers to the file a
//! definition originally lived in.
//!
//! The pass re-scans attribute values with the same extraction logic
//! used at load time and resolves through the registry, which answers
//! for output identifiers as well as authored ones — so applying the
//! pass twice is a no-op. External references and references that
//! resolve to nothing are left untouched.

use std::collections::HashMap;

use crate::core::WeldError;
use crate::reference::{LinkPolicy, RefKind, Reference, canonicalize, scan_attributes};
use crate::resource::{Resource, ResourceSet};

/// Rewrites every resolvable reference on every resource in place.
pub fn rewrite_references(set: &mut ResourceSet, policy: &LinkPolicy) {
    let ids: Vec<_> = set.ids().collect();
    for id in ids {
        let resource = set.get(id);
        let file = resource.file.clone();
        let scanned = scan_attributes(&resource.attrs, policy);

        let mut replacements = Vec::new();
        for reference in scanned {
            let Reference::Local(coord) = canonicalize(&reference.target, &file, set.root_dir())
            else {
                continue;
            };
            let Some(target) = set.resolve(&coord) else {
                continue;
            };
            let Some(output_id) = set.get(target).output_id.clone() else {
                continue;
            };
            let value = match reference.kind {
                RefKind::Href => format!("#{output_id}"),
                RefKind::Url => format!("url(#{output_id})"),
            };
            replacements.push((reference.attr, value));
        }

        let resource = set.get_mut(id);
        for (attr, value) in replacements {
            resource.attrs.set(&attr, value);
        }
    }
}

/// Verifies that output identities are injective across the whole
/// universe. Runs once, globally, after the rewrite pass.
pub fn verify_unique_output_ids<'a>(
    resources: impl Iterator<Item = &'a Resource>,
) -> Result<(), WeldError> {
    let mut seen: HashMap<&str, &Resource> = HashMap::new();
    for resource in resources {
        let Some(output_id) = resource.output_id.as_deref() else {
            continue;
        };
        if let Some(first) = seen.insert(output_id, resource)
            && first.id != resource.id
        {
            return Err(WeldError::IdentityCollision {
                output_id: output_id.to_string(),
                first: first.display_name(),
                second: resource.display_name(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Diagnostic;
    use crate::xml::parse_document;
    use std::path::PathBuf;

    fn load_two_files() -> ResourceSet {
        let mut set = ResourceSet::new(PathBuf::from("/nonexistent-root"));
        let mut diags = Vec::new();
        let policy = LinkPolicy::default();
        let defs = parse_document(r#"<svg><rect id="icon"/></svg>"#).unwrap();
        set.load_document(PathBuf::from("defs.svg"), defs, &policy, &mut diags);
        let logo = parse_document(
            r#"<svg><use href="defs.svg#icon"/><g fill="url(#local)"/><circle id="local"/></svg>"#,
        )
        .unwrap();
        set.load_document(PathBuf::from("logo.svg"), logo, &policy, &mut diags);
        set
    }

    fn attr_of(set: &ResourceSet, file: &str, tag: &str, attr: &str) -> String {
        set.iter()
            .find(|r| r.file == PathBuf::from(file) && r.tag == tag)
            .and_then(|r| r.attrs.get(attr))
            .unwrap_or_else(|| panic!("missing {attr} on {tag} in {file}"))
            .to_string()
    }

    #[test]
    fn cross_file_href_becomes_local_fragment() {
        let mut set = load_two_files();
        rewrite_references(&mut set, &LinkPolicy::default());

        let href = attr_of(&set, "logo.svg", "use", "href");
        assert!(href.starts_with("#icon-"), "got {href}");
        assert!(!href.contains("defs.svg"));
    }

    #[test]
    fn url_reference_keeps_its_wrapper() {
        let mut set = load_two_files();
        rewrite_references(&mut set, &LinkPolicy::default());

        let fill = attr_of(&set, "logo.svg", "g", "fill");
        assert!(fill.starts_with("url(#local-"), "got {fill}");
        assert!(fill.ends_with(')'));
    }

    #[test]
    fn rewrite_is_idempotent() {
        let mut set = load_two_files();
        rewrite_references(&mut set, &LinkPolicy::default());
        let href_once = attr_of(&set, "logo.svg", "use", "href");
        let fill_once = attr_of(&set, "logo.svg", "g", "fill");

        rewrite_references(&mut set, &LinkPolicy::default());
        assert_eq!(attr_of(&set, "logo.svg", "use", "href"), href_once);
        assert_eq!(attr_of(&set, "logo.svg", "g", "fill"), fill_once);
    }

    #[test]
    fn unresolved_and_external_references_are_untouched() {
        let mut set = ResourceSet::new(PathBuf::from("/nonexistent-root"));
        let mut diags: Vec<Diagnostic> = Vec::new();
        let doc = parse_document(
            r#"<svg><use href="missing.svg#nope"/><image href="https://example.com/x.png"/></svg>"#,
        )
        .unwrap();
        set.load_document(PathBuf::from("a.svg"), doc, &LinkPolicy::default(), &mut diags);

        rewrite_references(&mut set, &LinkPolicy::default());
        assert_eq!(attr_of(&set, "a.svg", "use", "href"), "missing.svg#nope");
        assert_eq!(
            attr_of(&set, "a.svg", "image", "href"),
            "https://example.com/x.png"
        );
    }

    #[test]
    fn distinct_files_reusing_an_id_get_distinct_output_ids() {
        let mut set = ResourceSet::new(PathBuf::from("/nonexistent-root"));
        let mut diags = Vec::new();
        let policy = LinkPolicy::default();
        for file in ["a.svg", "b.svg"] {
            let doc = parse_document(r#"<svg><rect id="icon"/></svg>"#).unwrap();
            set.load_document(PathBuf::from(file), doc, &policy, &mut diags);
        }

        let outputs: Vec<_> = set.iter().filter_map(|r| r.output_id.clone()).collect();
        assert_eq!(outputs.len(), 2);
        assert_ne!(outputs[0], outputs[1]);
        assert!(verify_unique_output_ids(set.iter()).is_ok());
    }

    #[test]
    fn crafted_collision_is_rejected() {
        let mut set = load_two_files();
        // Force two resources onto the same output identity.
        let ids: Vec<_> = set
            .iter()
            .filter(|r| r.output_id.is_some())
            .map(|r| r.id)
            .collect();
        set.get_mut(ids[0]).output_id = Some("forced".into());
        set.get_mut(ids[1]).output_id = Some("forced".into());

        let err = verify_unique_output_ids(set.iter()).unwrap_err();
        assert!(matches!(err, WeldError::IdentityCollision { .. }));
        assert!(err.to_string().contains("forced"));
    }
}
