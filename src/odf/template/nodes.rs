//! Builders for the small text structures every template operation emits.

use crate::odf::constants::{ATTR_STYLE_NAME, TEXT_H, TEXT_LINE_BREAK, TEXT_P, TEXT_SPAN};
use crate::odf::elements::{NodeId, TEXTNS, XmlTree};

/// Whether `id` is a paragraph-level block (`text:p` or `text:h`)
pub fn is_block(tree: &XmlTree, id: NodeId) -> bool {
    tree.is_element(id, TEXTNS, TEXT_P) || tree.is_element(id, TEXTNS, TEXT_H)
}

/// Nearest block containing `id`, `id` itself included
pub fn enclosing_block(tree: &XmlTree, id: NodeId) -> Option<NodeId> {
    std::iter::once(id)
        .chain(tree.ancestors(id))
        .find(|&n| is_block(tree, n))
}

/// `<text:span>text</text:span>`; an empty `text` yields an empty span
pub fn span(tree: &mut XmlTree, text: &str) -> NodeId {
    let span = tree.create_element(TEXTNS, TEXT_SPAN);
    if !text.is_empty() {
        let content = tree.create_text(text);
        tree.append_child(span, content);
    }
    span
}

/// `<text:line-break/>`
pub fn line_break(tree: &mut XmlTree) -> NodeId {
    tree.create_element(TEXTNS, TEXT_LINE_BREAK)
}

pub fn is_line_break(tree: &XmlTree, id: NodeId) -> bool {
    tree.is_element(id, TEXTNS, TEXT_LINE_BREAK)
}

/// A new, empty block of the same kind as `template`, carrying its style.
pub fn block_like(tree: &mut XmlTree, template: NodeId) -> NodeId {
    let local = if tree.is_element(template, TEXTNS, TEXT_H) {
        TEXT_H
    } else {
        TEXT_P
    };
    let block = tree.create_element(TEXTNS, local);
    tree.copy_attribute(template, block, TEXTNS, ATTR_STYLE_NAME);
    block
}

/// A new `text:p` with the given style, or none
pub fn paragraph(tree: &mut XmlTree, style: Option<&str>) -> NodeId {
    let block = tree.create_element(TEXTNS, TEXT_P);
    if let Some(style) = style {
        tree.set_attribute(block, TEXTNS, ATTR_STYLE_NAME, style);
    }
    block
}

/// Whether a block holds neither element children nor visible text
pub fn is_empty_block(tree: &XmlTree, block: NodeId) -> bool {
    tree.children(block)
        .iter()
        .all(|&c| tree.element(c).is_none() && tree.text_content(c).trim().is_empty())
}
