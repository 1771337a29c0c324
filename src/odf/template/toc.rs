//! Generated table of contents.
//!
//! The engine only emits the index definition: the source templates, the
//! title and an empty `text:index-body`. Entries are computed by the office
//! suite when the document is opened and the index updated.

use super::placeholder::resolve_markers;
use crate::odf::constants::{
    ATTR_LEADER_CHAR, ATTR_NAME, ATTR_OUTLINE_LEVEL, ATTR_PROTECTED, ATTR_STYLE_NAME, ATTR_TYPE,
    STYLE_CONTENTS_HEADING, TEXT_INDEX_BODY, TEXT_INDEX_ENTRY_CHAPTER, TEXT_INDEX_ENTRY_PAGE_NUMBER,
    TEXT_INDEX_ENTRY_TAB_STOP, TEXT_INDEX_ENTRY_TEXT, TEXT_INDEX_TITLE_TEMPLATE, TEXT_TABLE_OF_CONTENT,
    TEXT_TABLE_OF_CONTENT_ENTRY_TEMPLATE, TEXT_TABLE_OF_CONTENT_SOURCE, contents_level_style,
};
use crate::odf::elements::{NodeId, STYLENS, TEXTNS, XmlTree};
use tracing::debug;

/// Deepest outline level ODF allows in an index source
pub const MAX_OUTLINE_LEVEL: u8 = 10;

/// Replace the block around each marker named `marker` with a
/// `text:table-of-content` covering headings down to `outline_levels`
/// (clamped to `1..=10`).
///
/// The index is named after the marker. With `protect` it is marked
/// read-only for the user. Returns the number of markers replaced.
pub fn insert_generated_index(
    tree: &mut XmlTree,
    marker: &str,
    title: &str,
    outline_levels: u8,
    protect: bool,
) -> usize {
    let levels = outline_levels.clamp(1, MAX_OUTLINE_LEVEL);

    let mut replaced = 0;
    for placeholder in resolve_markers(tree, marker) {
        let Some(block) = placeholder.enclosing_block(tree) else {
            continue;
        };
        let index = table_of_content(tree, marker, title, levels, protect);
        if tree.replace(block, index) {
            replaced += 1;
        }
    }
    debug!(marker, replaced, levels, "table of contents");
    replaced
}

fn table_of_content(tree: &mut XmlTree, name: &str, title: &str, levels: u8, protect: bool) -> NodeId {
    let toc = tree.create_element(TEXTNS, TEXT_TABLE_OF_CONTENT);
    tree.set_attribute(toc, TEXTNS, ATTR_PROTECTED, if protect { "true" } else { "false" });
    tree.set_attribute(toc, TEXTNS, ATTR_NAME, name);

    let source = tree.create_element(TEXTNS, TEXT_TABLE_OF_CONTENT_SOURCE);
    tree.set_attribute(source, TEXTNS, ATTR_OUTLINE_LEVEL, &levels.to_string());

    let title_template = tree.create_element(TEXTNS, TEXT_INDEX_TITLE_TEMPLATE);
    tree.set_attribute(title_template, TEXTNS, ATTR_STYLE_NAME, STYLE_CONTENTS_HEADING);
    if !title.is_empty() {
        let text = tree.create_text(title);
        tree.append_child(title_template, text);
    }
    tree.append_child(source, title_template);

    for level in 1..=levels {
        let entry = entry_template(tree, level);
        tree.append_child(source, entry);
    }
    tree.append_child(toc, source);

    let body = tree.create_element(TEXTNS, TEXT_INDEX_BODY);
    tree.append_child(toc, body);
    toc
}

fn entry_template(tree: &mut XmlTree, level: u8) -> NodeId {
    let entry = tree.create_element(TEXTNS, TEXT_TABLE_OF_CONTENT_ENTRY_TEMPLATE);
    tree.set_attribute(entry, TEXTNS, ATTR_OUTLINE_LEVEL, &level.to_string());
    tree.set_attribute(entry, TEXTNS, ATTR_STYLE_NAME, &contents_level_style(level));

    for local in [
        TEXT_INDEX_ENTRY_CHAPTER,
        TEXT_INDEX_ENTRY_TEXT,
        TEXT_INDEX_ENTRY_TAB_STOP,
        TEXT_INDEX_ENTRY_PAGE_NUMBER,
    ] {
        let component = tree.create_element(TEXTNS, local);
        if local == TEXT_INDEX_ENTRY_TAB_STOP {
            tree.set_attribute(component, STYLENS, ATTR_TYPE, "right");
            tree.set_attribute(component, STYLENS, ATTR_LEADER_CHAR, ".");
        }
        tree.append_child(entry, component);
    }
    entry
}
