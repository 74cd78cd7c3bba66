//! Serializes a [`Document`] back to UTF-8 bytes with quick-xml's writer.

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::document::{Document, Element, Misc, Node};
use super::text::cdata_sections;
use crate::error::{InjectError, Result};

/// Serialize the whole document, declaration included
pub fn to_bytes(document: &Document) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    writer.get_mut().push(b'\n');

    for misc in &document.prolog {
        write_misc(&mut writer, misc)?;
        writer.get_mut().push(b'\n');
    }

    write_element(&mut writer, &document.root)?;

    for misc in &document.epilog {
        writer.get_mut().push(b'\n');
        write_misc(&mut writer, misc)?;
    }
    writer.get_mut().push(b'\n');

    Ok(writer.into_inner())
}

/// Serialize a single element subtree without a declaration
pub fn element_to_string(element: &Element) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, element)?;
    String::from_utf8(writer.into_inner()).map_err(|e| InjectError::Render(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => {
                emit(writer, Event::Text(BytesText::from_escaped(partial_escape(text))))?
            }
            Node::CData(text) => {
                for section in cdata_sections(text) {
                    emit(writer, Event::CData(BytesCData::new(section)))?;
                }
            }
            Node::Comment(comment) => {
                emit(writer, Event::Comment(BytesText::from_escaped(comment.as_str())))?
            }
            Node::ProcessingInstruction(instruction) => {
                write_raw(writer, &format!("<?{}?>", instruction))
            }
        }
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn write_misc(writer: &mut Writer<Vec<u8>>, misc: &Misc) -> Result<()> {
    match misc {
        Misc::Comment(comment) => {
            emit(writer, Event::Comment(BytesText::from_escaped(comment.as_str())))
        }
        Misc::ProcessingInstruction(instruction) => {
            write_raw(writer, &format!("<?{}?>", instruction));
            Ok(())
        }
        Misc::DocType(doctype) => {
            write_raw(writer, &format!("<!DOCTYPE {}>", doctype));
            Ok(())
        }
    }
}

fn write_raw(writer: &mut Writer<Vec<u8>>, markup: &str) {
    writer.get_mut().extend_from_slice(markup.as_bytes());
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| InjectError::Render(e.to_string()))
}
