//! Namespace-preserving attribute storage.
//!
//! Attribute names arrive from the parser fully qualified (`xlink:href`),
//! but reference extraction and `id` handling want to look attributes up
//! by their local name, while serialization must write the original
//! qualified name back out unchanged. [`AttrMap`] is the adapter between
//! those two views: lookups and updates go by local name, iteration and
//! write-back keep the authored qualified names and their order.
//!
//! Lookup is by local name only; two attributes sharing a local name
//! under different prefixes on the same element are not distinguished.

/// A single attribute as authored, qualified name and all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Qualified name exactly as it appeared in the source, e.g. `xlink:href`.
    pub qualified: String,
    /// Attribute value, unescaped.
    pub value: String,
}

impl Attr {
    /// The namespace-stripped name used for lookups.
    pub fn local(&self) -> &str {
        local_name(&self.qualified)
    }
}

/// Strips a namespace prefix from a qualified name: `xlink:href` → `href`.
pub fn local_name(qualified: &str) -> &str {
    match qualified.rsplit_once(':') {
        Some((_, local)) => local,
        None => qualified,
    }
}

/// Ordered attribute map with namespace-stripped lookup and
/// namespace-preserving write-back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrMap {
    entries: Vec<Attr>,
}

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute, keeping document order.
    pub fn push(&mut self, qualified: impl Into<String>, value: impl Into<String>) {
        self.entries.push(Attr {
            qualified: qualified.into(),
            value: value.into(),
        });
    }

    /// Looks up an attribute value by its namespace-stripped name.
    pub fn get(&self, local: &str) -> Option<&str> {
        self.entries.iter().find(|a| a.local() == local).map(|a| a.value.as_str())
    }

    /// Rewrites the value of an existing attribute in place, keeping its
    /// qualified name. When no attribute with the given local name
    /// exists, one is appended under the bare (unprefixed) name.
    pub fn set(&mut self, local: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(attr) = self.entries.iter_mut().find(|a| a.local() == local) {
            attr.value = value;
        } else {
            self.entries.push(Attr {
                qualified: local.to_string(),
                value,
            });
        }
    }

    /// Attributes in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_strips_namespace_prefix() {
        let mut attrs = AttrMap::new();
        attrs.push("xlink:href", "#target");
        attrs.push("width", "10");

        assert_eq!(attrs.get("href"), Some("#target"));
        assert_eq!(attrs.get("width"), Some("10"));
        assert_eq!(attrs.get("height"), None);
    }

    #[test]
    fn set_preserves_qualified_name() {
        let mut attrs = AttrMap::new();
        attrs.push("xlink:href", "#old");

        attrs.set("href", "#new");

        let attr = attrs.iter().next().unwrap();
        assert_eq!(attr.qualified, "xlink:href");
        assert_eq!(attr.value, "#new");
    }

    #[test]
    fn set_appends_missing_attribute_under_bare_name() {
        let mut attrs = AttrMap::new();
        attrs.set("id", "fresh");

        let attr = attrs.iter().next().unwrap();
        assert_eq!(attr.qualified, "id");
        assert_eq!(attr.value, "fresh");
    }

    #[test]
    fn iteration_keeps_document_order() {
        let mut attrs = AttrMap::new();
        attrs.push("width", "1");
        attrs.push("xlink:href", "#a");
        attrs.push("height", "2");

        let names: Vec<_> = attrs.iter().map(|a| a.qualified.as_str()).collect();
        assert_eq!(names, ["width", "xlink:href", "height"]);
    }
}
