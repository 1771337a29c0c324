//! Inline field substitution.
//!
//! Each `text:user-field-get` named after a field is swapped for a
//! `text:span` holding the value. The cleanup variant additionally keeps
//! empty optional fields from leaving blank lines or empty paragraphs behind.

use super::nodes::{enclosing_block, is_empty_block, is_line_break, span};
use super::placeholder::find_inline_field_refs;
use crate::odf::constants::TEXT_SPAN;
use crate::odf::elements::{NodeId, NodeKind, TEXTNS, XmlTree};

/// Replace every reference to field `name` with `value`.
///
/// Returns the number of references replaced; 0 means the template does not
/// use the field.
pub fn substitute_field(tree: &mut XmlTree, name: &str, value: &str) -> usize {
    let refs = find_inline_field_refs(tree, name);
    for &field in &refs {
        let replacement = span(tree, value);
        tree.replace(field, replacement);
    }
    refs.len()
}

/// Like [`substitute_field`], but an empty `value` removes the reference
/// instead of leaving an empty span.
///
/// Spans left holding nothing but the reference are removed along with it.
/// When `trim_preceding_break` is set, a line break directly before the
/// outermost removed node (ignoring whitespace-only text) goes too. A block
/// left with no content at all is removed from its parent.
pub fn substitute_field_with_cleanup(
    tree: &mut XmlTree,
    name: &str,
    value: &str,
    trim_preceding_break: bool,
) -> usize {
    if !value.is_empty() {
        return substitute_field(tree, name, value);
    }

    let refs = find_inline_field_refs(tree, name);
    for &field in &refs {
        let outermost = emptied_wrapper(tree, field);
        let Some(container) = tree.parent(outermost) else {
            continue;
        };

        if trim_preceding_break && let Some(lb) = preceding_line_break(tree, outermost) {
            tree.detach(lb);
        }
        tree.detach(outermost);

        if let Some(block) = enclosing_block(tree, container)
            && is_empty_block(tree, block)
        {
            tree.detach(block);
        }
    }
    refs.len()
}

/// The outermost `text:span` around `node` whose only content is `node`
/// (whitespace text aside), or `node` itself.
fn emptied_wrapper(tree: &XmlTree, node: NodeId) -> NodeId {
    let mut outermost = node;
    while let Some(parent) = tree.parent(outermost)
        && tree.is_element(parent, TEXTNS, TEXT_SPAN)
        && tree.children(parent).iter().all(|&c| {
            c == outermost || (tree.element(c).is_none() && tree.text_content(c).trim().is_empty())
        })
    {
        outermost = parent;
    }
    outermost
}

fn preceding_line_break(tree: &XmlTree, node: NodeId) -> Option<NodeId> {
    let mut current = tree.previous_sibling(node)?;
    loop {
        match tree.kind(current) {
            NodeKind::Text(t) if t.trim().is_empty() => current = tree.previous_sibling(current)?,
            NodeKind::Element(_) if is_line_break(tree, current) => return Some(current),
            _ => return None,
        }
    }
}
