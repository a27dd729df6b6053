//! Parsing source files into an owned element tree.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use super::attrs::{AttrMap, local_name};

/// One node of the parsed tree. Only elements become resources; text,
/// CDATA, and comments are inert content carried through to the output.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
}

/// An element with its authored tag name, attributes, and children.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Qualified tag name exactly as authored, e.g. `svg` or `xlink:use`.
    pub tag: String,
    pub attrs: AttrMap,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: AttrMap::new(),
            children: Vec::new(),
        }
    }

    /// Tag name with any namespace prefix stripped.
    pub fn local_tag(&self) -> &str {
        local_name(&self.tag)
    }

    /// Direct element children, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }
}

/// Failures while turning bytes into an element tree.
#[derive(Debug, Error)]
pub enum XmlTreeError {
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),
    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("invalid character escape: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    #[error("document contains no root element")]
    NoRoot,
    #[error("unexpected end of document")]
    Truncated,
    #[error("content after the root element")]
    TrailingContent,
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, XmlTreeError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(tag);
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attrs.push(key, value);
    }
    Ok(element)
}

/// Parses one source document into its root element.
///
/// The XML declaration, doctype, and processing instructions are
/// dropped; whitespace-only text between elements is dropped too, since
/// the writer re-indents everything on the way out. Anything else is
/// preserved.
pub fn parse_document(input: &str) -> Result<XmlElement, XmlTreeError> {
    let mut reader = Reader::from_str(input);
    // Stack of open elements; the completed root lands in `root`.
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlTreeError::TrailingContent);
                }
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlTreeError::TrailingContent);
                }
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack.pop().ok_or(XmlTreeError::Truncated)?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                let text = text.xml_content().map_err(quick_xml::Error::from)?.into_owned();
                if let Some(parent) = stack.last_mut() {
                    if !text.trim().is_empty() {
                        parent.children.push(XmlNode::Text(text));
                    }
                }
            }
            Event::CData(cdata) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&cdata).into_owned();
                    parent.children.push(XmlNode::CData(text));
                }
            }
            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&comment).into_owned();
                    parent.children.push(XmlNode::Comment(text));
                }
            }
            Event::Eof => break,
            // Declaration, doctype, and processing instructions.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlTreeError::Truncated);
    }
    root.ok_or(XmlTreeError::NoRoot)
}

fn attach(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, element: XmlElement) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
    } else {
        *root = Some(element);
    }
}
