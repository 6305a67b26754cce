use crate::tree::{NodeKind, Tree};
use domqueue_core::NodeId;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::fmt::Display;
use thiserror::Error;

/// Elements that never have content and may appear without an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("malformed markup at byte {position}: {message}")]
    Syntax { position: u64, message: String },
    #[error("failed to serialize markup: {0}")]
    Write(String),
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn syntax_error(reader: &Reader<&[u8]>, err: impl Display) -> MarkupError {
    MarkupError::Syntax { position: reader.buffer_position() as u64, message: err.to_string() }
}

fn lowercase_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn element_parts(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<(String, Vec<(String, String)>), MarkupError> {
    let tag = lowercase_name(start.name().as_ref());
    let mut attributes: Vec<(String, String)> = Vec::new();
    for attribute in start.html_attributes() {
        let attribute = attribute.map_err(|err| syntax_error(reader, err))?;
        let name = lowercase_name(attribute.key.as_ref());
        let value = attribute
            .decode_and_unescape_value(reader.decoder())
            .map_err(|err| syntax_error(reader, err))?;
        if !attributes.iter().any(|(existing, _)| *existing == name) {
            attributes.push((name, value.into_owned()));
        }
    }
    Ok((tag, attributes))
}

/// Parses XHTML-like markup into a fresh tree.
///
/// The reader is lenient in the ways HTML authors expect: void elements need
/// no end tag and an end tag closes every element opened after its match.
/// Stray end tags are ignored. Named references resolve against the HTML5
/// entity table; unknown ones are kept as literal text.
pub(crate) fn parse(markup: &str) -> Result<Tree, MarkupError> {
    let mut reader = Reader::from_str(markup);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut tree = Tree::new();
    let mut stack: Vec<NodeId> = vec![Tree::root()];

    loop {
        let parent = stack.last().copied().unwrap_or(Tree::root());
        match reader.read_event().map_err(|err| syntax_error(&reader, err))? {
            Event::Start(start) => {
                let (tag, attributes) = element_parts(&reader, &start)?;
                let void = is_void(&tag);
                let id = tree.create_element(parent, tag, attributes);
                if !void {
                    stack.push(id);
                }
            }
            Event::Empty(start) => {
                let (tag, attributes) = element_parts(&reader, &start)?;
                tree.create_element(parent, tag, attributes);
            }
            Event::End(end) => {
                let name = lowercase_name(end.name().as_ref());
                let open = stack.iter().rposition(|id| {
                    tree.element(*id).is_some_and(|element| element.tag == name)
                });
                if let Some(position) = open {
                    stack.truncate(position);
                }
            }
            Event::Text(text) => {
                let decoded = text.decode().map_err(|err| syntax_error(&reader, err))?;
                tree.append_text(parent, &decoded);
            }
            Event::CData(data) => {
                let decoded = data.decode().map_err(|err| syntax_error(&reader, err))?;
                tree.append_text(parent, &decoded);
            }
            Event::GeneralRef(reference) => {
                let name = reference.decode().map_err(|err| syntax_error(&reader, err))?;
                let resolved = match reference.resolve_char_ref() {
                    Ok(Some(ch)) => ch.to_string(),
                    _ => match resolve_predefined_entity(&name) {
                        Some(text) => text.to_owned(),
                        None => format!("&{name};"),
                    },
                };
                tree.append_text(parent, &resolved);
            }
            Event::Comment(comment) => {
                let decoded = comment.decode().map_err(|err| syntax_error(&reader, err))?;
                tree.create_comment(parent, decoded.into_owned());
            }
            Event::DocType(doctype) => {
                let decoded = doctype.decode().map_err(|err| syntax_error(&reader, err))?;
                tree.set_doctype(decoded.trim().to_owned());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::trace!(nodes = tree.descendant_elements(Tree::root()).len(), "markup parsed");
    Ok(tree)
}

/// Serializes `node` (or the whole document for the root) back to markup.
pub(crate) fn serialize(tree: &Tree, node: NodeId) -> Result<String, MarkupError> {
    let mut writer = Writer::new(Vec::new());
    if node == Tree::root() {
        if let Some(doctype) = tree.doctype() {
            write(&mut writer, Event::DocType(BytesText::from_escaped(doctype)))?;
        }
        for child in tree.children(node) {
            write_node(&mut writer, tree, *child)?;
        }
    } else {
        write_node(&mut writer, tree, node)?;
    }
    String::from_utf8(writer.into_inner()).map_err(|err| MarkupError::Write(err.to_string()))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), MarkupError> {
    writer.write_event(event).map_err(|err| MarkupError::Write(err.to_string()))
}

fn write_node(writer: &mut Writer<Vec<u8>>, tree: &Tree, node: NodeId) -> Result<(), MarkupError> {
    let Some(data) = tree.node(node) else {
        return Ok(());
    };
    match &data.kind {
        NodeKind::Document => {
            for child in &data.children {
                write_node(writer, tree, *child)?;
            }
        }
        NodeKind::Text(text) => write(writer, Event::Text(BytesText::new(text)))?,
        NodeKind::Comment(text) => write(writer, Event::Comment(BytesText::from_escaped(text)))?,
        NodeKind::Element(element) => {
            let mut start = BytesStart::new(element.tag.as_str());
            for (name, value) in &element.attributes {
                start.push_attribute((name.as_str(), value.as_str()));
            }
            if is_void(&element.tag) && data.children.is_empty() {
                write(writer, Event::Empty(start))?;
                return Ok(());
            }
            write(writer, Event::Start(start))?;
            for child in &data.children {
                write_node(writer, tree, *child)?;
            }
            write(writer, Event::End(BytesEnd::new(element.tag.as_str())))?;
        }
    }
    Ok(())
}
