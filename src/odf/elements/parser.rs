//! quick-xml driven builder for [`XmlTree`].
//!
//! Parsing is strict: mismatched or unclosed tags, stray text outside the
//! document element and invalid UTF-8 all fail with
//! [`Error::MalformedDocument`]. No partial tree is ever returned.

use super::namespace::{NamespaceScope, QualifiedName, split_name};
use super::tree::{Attribute, ElementData, NodeId, NodeKind, XmlTree};
use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parse one XML part into a mutable tree.
///
/// Text and attribute values are kept escaped, entity references included,
/// so unchanged content serializes exactly as it was read.
pub fn parse(bytes: &[u8]) -> Result<XmlTree> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut scope = NamespaceScope::new();
    let mut tree: Option<XmlTree> = None;
    let mut stack: Vec<NodeId> = Vec::new();

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let id = open_element(e, &mut scope, &mut tree, &stack, position)?;
                stack.push(id);
            },
            Ok(Event::Empty(ref e)) => {
                open_element(e, &mut scope, &mut tree, &stack, position)?;
                scope.pop();
            },
            Ok(Event::End(_)) => {
                if stack.pop().is_none() {
                    return Err(malformed(position, "unexpected closing tag"));
                }
                scope.pop();
            },
            Ok(Event::Text(ref t)) => {
                let text = utf8(t.to_vec(), position)?;
                match (tree.as_mut(), stack.last()) {
                    (Some(tree), Some(&parent)) => tree.push_raw_text(parent, &text),
                    _ if text.trim().is_empty() => {},
                    _ => return Err(malformed(position, "text outside the document element")),
                }
            },
            Ok(Event::GeneralRef(ref r)) => {
                let name = utf8(r.to_vec(), position)?;
                match (tree.as_mut(), stack.last()) {
                    (Some(tree), Some(&parent)) => tree.push_raw_text(parent, &format!("&{name};")),
                    _ => return Err(malformed(position, "entity reference outside the document element")),
                }
            },
            Ok(Event::CData(ref c)) => {
                let raw = format!("<![CDATA[{}]]>", utf8(c.to_vec(), position)?);
                append_raw(&mut tree, &stack, raw);
            },
            Ok(Event::Comment(ref c)) => {
                let raw = format!("<!--{}-->", utf8(c.to_vec(), position)?);
                append_raw(&mut tree, &stack, raw);
            },
            Ok(Event::PI(ref p)) => {
                let raw = format!("<?{}?>", utf8(p.to_vec(), position)?);
                append_raw(&mut tree, &stack, raw);
            },
            // The declaration is rewritten on serialization; ODF parts carry no DTD.
            Ok(Event::Decl(_)) | Ok(Event::DocType(_)) => {},
            Ok(Event::Eof) => break,
            Err(e) => return Err(malformed(position, &e.to_string())),
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(Error::MalformedDocument(format!(
            "{} unclosed element(s) at end of input",
            stack.len()
        )));
    }
    tree.ok_or_else(|| Error::MalformedDocument("No root element found".to_string()))
}

fn open_element(
    e: &BytesStart,
    scope: &mut NamespaceScope,
    tree: &mut Option<XmlTree>,
    stack: &[NodeId],
    position: u64,
) -> Result<NodeId> {
    let tag = utf8(e.name().as_ref().to_vec(), position)?;

    let mut raw_attributes = Vec::new();
    let mut declarations = Vec::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|err| malformed(position, &format!("invalid attribute: {err}")))?;
        let key = utf8(attr.key.as_ref().to_vec(), position)?;
        let mut value = utf8(attr.value.to_vec(), position)?;
        // Values are written back inside double quotes.
        if value.contains('"') {
            value = value.replace('"', "&quot;");
        }

        match split_name(&key) {
            (Some("xmlns"), prefix) => declarations.push((Some(prefix.to_string()), value.clone())),
            (None, "xmlns") => declarations.push((None, value.clone())),
            _ => {},
        }
        raw_attributes.push((key, value));
    }
    scope.push(declarations);

    let attributes = raw_attributes
        .into_iter()
        .map(|(key, value)| {
            let name = match split_name(&key) {
                (Some("xmlns"), prefix) => QualifiedName::new(Some("xmlns"), prefix, None),
                (None, "xmlns") => QualifiedName::new(None, "xmlns", None),
                _ => scope.attribute_name(&key),
            };
            Attribute { name, value }
        })
        .collect();
    let data = ElementData {
        name: scope.element_name(&tag),
        attributes,
    };

    if tree.is_none() {
        let created = XmlTree::with_root(data);
        let root = created.root();
        *tree = Some(created);
        return Ok(root);
    }
    let (Some(tree), Some(&parent)) = (tree.as_mut(), stack.last()) else {
        return Err(malformed(position, "more than one document element"));
    };
    let id = tree.create_node(NodeKind::Element(data));
    tree.append_child(parent, id);
    Ok(id)
}

fn append_raw(tree: &mut Option<XmlTree>, stack: &[NodeId], raw: String) {
    // Comments and PIs outside the document element are not kept.
    if let (Some(tree), Some(&parent)) = (tree.as_mut(), stack.last()) {
        let id = tree.create_node(NodeKind::Raw(raw));
        tree.append_child(parent, id);
    }
}

fn utf8(bytes: Vec<u8>, position: u64) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| malformed(position, "invalid UTF-8"))
}

fn malformed(position: u64, message: &str) -> Error {
    Error::MalformedDocument(format!("XML parsing error at byte {position}: {message}"))
}
