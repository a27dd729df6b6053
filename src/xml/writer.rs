//! Pretty-printing serializer for output documents.

use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::tree::{XmlElement, XmlNode};
use crate::constants::{INDENT_WIDTH, XML_ENCODING, XML_VERSION};

/// Serializes a document with an XML declaration, UTF-8 encoding, and
/// stable two-space indentation. Building the same tree twice yields
/// byte-identical output.
pub fn write_document(root: &XmlElement) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
    writer.write_event(Event::Decl(BytesDecl::new(XML_VERSION, Some(XML_ENCODING), None)))?;
    write_element(&mut writer, root)?;
    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.tag.as_str());
    for attr in element.attrs.iter() {
        start.push_attribute((attr.qualified.as_str(), attr.value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            XmlNode::Element(e) => write_element(writer, e)?,
            XmlNode::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
            XmlNode::CData(t) => writer.write_event(Event::CData(BytesCData::new(t.as_str())))?,
            XmlNode::Comment(t) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(t.as_str())))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.tag.as_str())))?;
    Ok(())
}
