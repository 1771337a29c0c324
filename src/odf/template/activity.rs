//! Numbered title/description lists.

use super::nodes::{block_like, line_break, paragraph, span};
use super::placeholder::resolve_markers;
use crate::odf::elements::{NodeId, XmlTree};
use tracing::debug;

/// One numbered entry: a title line and a free-form description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityRecord {
    pub label: String,
    pub description: String,
}

impl ActivityRecord {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }
}

/// Replace the block around each marker named `marker` with two blocks per
/// record, in record order:
///
/// 1. `"{n}. {label}"` in the marker block's style, `n` counting from 1
/// 2. the description in `description_style`, one span per line with a
///    `text:line-break` between lines
///
/// Returns the number of markers replaced; no records leaves the template
/// untouched.
pub fn build_numbered_activity_list(
    tree: &mut XmlTree,
    marker: &str,
    records: &[ActivityRecord],
    description_style: &str,
) -> usize {
    if records.is_empty() {
        return 0;
    }

    let mut replaced = 0;
    for placeholder in resolve_markers(tree, marker) {
        let Some(block) = placeholder.enclosing_block(tree) else {
            continue;
        };
        let (Some(parent), Some(index)) = (tree.parent(block), tree.index_in_parent(block)) else {
            continue;
        };
        tree.detach(block);

        let mut at = index;
        for (i, record) in records.iter().enumerate() {
            let title = title_block(tree, block, i + 1, &record.label);
            tree.insert_child(parent, at, title);
            let description = description_block(tree, &record.description, description_style);
            tree.insert_child(parent, at + 1, description);
            at += 2;
        }
        replaced += 1;
    }
    debug!(marker, replaced, records = records.len(), "activity list");
    replaced
}

fn title_block(tree: &mut XmlTree, template: NodeId, number: usize, label: &str) -> NodeId {
    let block = block_like(tree, template);
    let text = span(tree, &format!("{number}. {label}"));
    tree.append_child(block, text);
    block
}

fn description_block(tree: &mut XmlTree, description: &str, style: &str) -> NodeId {
    let block = paragraph(tree, Some(style));
    for (i, line) in description.lines().enumerate() {
        if i > 0 {
            let lb = line_break(tree);
            tree.append_child(block, lb);
        }
        let text = span(tree, line);
        tree.append_child(block, text);
    }
    block
}
