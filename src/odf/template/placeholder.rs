//! Locating named placeholders in a tree.
//!
//! Three placeholder forms exist, all keyed by their `text:name`:
//!
//! - point markers: `<text:bookmark text:name="X"/>`
//! - range markers: `<text:bookmark-start text:name="X"/> ... <text:bookmark-end text:name="X"/>`
//!   where the end must be a following sibling of the start
//! - inline field references: `<text:user-field-get text:name="X">...</text:user-field-get>`
//!
//! Names are not unique; every occurrence is reported, in document order.

use super::nodes::enclosing_block;
use crate::odf::constants::{
    ATTR_NAME, TEXT_BOOKMARK, TEXT_BOOKMARK_END, TEXT_BOOKMARK_START, TEXT_USER_FIELD_GET,
};
use crate::odf::elements::{NodeId, TEXTNS, XmlTree};

/// A resolved placeholder occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Single empty node replaced in place
    PointMarker(NodeId),
    /// Start/end pair sharing `container`; both ends and everything between
    /// them are replaced
    RangeMarker {
        start: NodeId,
        end: NodeId,
        container: NodeId,
    },
    /// Node standing for one scalar value
    InlineFieldRef(NodeId),
}

impl Placeholder {
    /// The node the placeholder is anchored at
    pub fn anchor(&self) -> NodeId {
        match *self {
            Placeholder::PointMarker(node) | Placeholder::InlineFieldRef(node) => node,
            Placeholder::RangeMarker { start, .. } => start,
        }
    }

    /// Nearest paragraph-level block around the placeholder
    pub fn enclosing_block(&self, tree: &XmlTree) -> Option<NodeId> {
        enclosing_block(tree, self.anchor())
    }
}

fn named(tree: &XmlTree, local_name: &str, name: &str) -> Vec<NodeId> {
    tree.find_elements(TEXTNS, local_name)
        .into_iter()
        .filter(|&n| tree.attribute(n, TEXTNS, ATTR_NAME).as_deref() == Some(name))
        .collect()
}

/// All point markers named `name`
pub fn find_point_markers(tree: &XmlTree, name: &str) -> Vec<NodeId> {
    named(tree, TEXT_BOOKMARK, name)
}

/// All complete range markers named `name`.
///
/// A start whose end is not among its following siblings is skipped.
pub fn find_range_markers(tree: &XmlTree, name: &str) -> Vec<Placeholder> {
    named(tree, TEXT_BOOKMARK_START, name)
        .into_iter()
        .filter_map(|start| {
            let container = tree.parent(start)?;
            let from = tree.index_in_parent(start)? + 1;
            let end = tree.children(container)[from..].iter().copied().find(|&n| {
                tree.is_element(n, TEXTNS, TEXT_BOOKMARK_END)
                    && tree.attribute(n, TEXTNS, ATTR_NAME).as_deref() == Some(name)
            })?;
            Some(Placeholder::RangeMarker {
                start,
                end,
                container,
            })
        })
        .collect()
}

/// All inline field references named `name`
pub fn find_inline_field_refs(tree: &XmlTree, name: &str) -> Vec<NodeId> {
    named(tree, TEXT_USER_FIELD_GET, name)
}

/// Markers named `name`: point markers when there are any, range markers
/// otherwise. Templates are expected to use one form per name.
pub fn resolve_markers(tree: &XmlTree, name: &str) -> Vec<Placeholder> {
    let points = find_point_markers(tree, name);
    if !points.is_empty() {
        return points.into_iter().map(Placeholder::PointMarker).collect();
    }
    find_range_markers(tree, name)
}
