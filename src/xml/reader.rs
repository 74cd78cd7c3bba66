//! Builds a [`Document`] from XML text with quick-xml's pull reader.

use log::debug;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::document::{Document, Element, Misc, Node};
use crate::error::{InjectError, Result};

/// Parse a complete XML document
///
/// Whitespace and text inside the root are preserved. Whitespace outside
/// the root and the XML declaration are dropped; the writer emits its own.
pub fn parse(content: &str) -> Result<Document> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);

    let mut prolog = Vec::new();
    let mut epilog = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|e| parse_error(position, e))?;

        match event {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(parse_error(position, "content after the root element"));
                }
                stack.push(element_from_start(&start, position)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start, position)?;
                attach(&mut stack, &mut root, Node::Element(element), position)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| parse_error(position, "closing tag without an open element"))?;
                attach(&mut stack, &mut root, Node::Element(element), position)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| parse_error(position, e))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Text(text.into_owned())),
                    None if text.trim().is_empty() => {}
                    None => return Err(parse_error(position, "text outside the root element")),
                }
            }
            Event::CData(cdata) => {
                let text = String::from_utf8_lossy(&cdata).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::CData(text)),
                    None => return Err(parse_error(position, "CDATA outside the root element")),
                }
            }
            Event::Comment(comment) => {
                let comment = String::from_utf8_lossy(&comment).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Comment(comment)),
                    None if root.is_none() => prolog.push(Misc::Comment(comment)),
                    None => epilog.push(Misc::Comment(comment)),
                }
            }
            Event::PI(instruction) => {
                let instruction = String::from_utf8_lossy(&instruction).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent
                        .children
                        .push(Node::ProcessingInstruction(instruction)),
                    None if root.is_none() => prolog.push(Misc::ProcessingInstruction(instruction)),
                    None => epilog.push(Misc::ProcessingInstruction(instruction)),
                }
            }
            Event::DocType(doctype) => {
                prolog.push(Misc::DocType(
                    String::from_utf8_lossy(&doctype).trim().to_string(),
                ));
            }
            Event::Decl(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(parse_error(
            reader.buffer_position(),
            format!("unclosed element <{}>", open.name),
        ));
    }

    let root = root.ok_or_else(|| parse_error(0, "document has no root element"))?;
    debug!(
        "Parsed XML document with root <{}> and {} child elements",
        root.name,
        root.child_elements().count()
    );

    Ok(Document {
        prolog,
        root,
        epilog,
    })
}

fn element_from_start(start: &BytesStart<'_>, position: u64) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| parse_error(position, e))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| parse_error(position, e))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Add a finished node to the open parent, or make it the root
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    node: Node,
    position: u64,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }

    match node {
        Node::Element(element) if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        _ => Err(parse_error(position, "more than one root element")),
    }
}

fn parse_error(position: u64, message: impl ToString) -> InjectError {
    InjectError::Parse {
        position,
        message: message.to_string(),
    }
}
