//! Owned XML element tree with namespace-preserving attributes.
//!
//! The build pipeline needs three things from its XML layer: a tree it
//! can walk while assigning identities, attribute access keyed by
//! namespace-stripped local names that still serializes the original
//! qualified names, and a pretty-printing writer for the output
//! documents. quick-xml provides the event stream; this module owns the
//! tree on top of it.
//!
//! Comments and CDATA sections are carried through the tree so they
//! survive into the output, but they never participate in resource or
//! reference handling.

mod attrs;
mod tree;
mod writer;

pub use attrs::{Attr, AttrMap, local_name};
pub use tree::{XmlElement, XmlNode, XmlTreeError, parse_document};
pub use writer::write_document;
