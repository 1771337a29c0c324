//! Bulleted list generation.

use super::nodes::{block_like, span};
use super::placeholder::resolve_markers;
use crate::odf::constants::{ATTR_STYLE_NAME, TEXT_LIST, TEXT_LIST_ITEM};
use crate::odf::elements::{NodeId, TEXTNS, XmlTree};
use tracing::debug;

/// Replace the block around each marker named `marker` with a `text:list`.
///
/// Every non-empty item becomes a `text:list-item` holding one block in the
/// marker block's style. `list_style` sets `text:style-name` on the list
/// itself. Items are taken as given; nested literals must be flattened
/// beforehand (see [`super::normalize_nested_items`]).
///
/// Returns the number of markers replaced. Without any non-empty item the
/// template is left as is.
pub fn build_bullet_list<S: AsRef<str>>(
    tree: &mut XmlTree,
    marker: &str,
    items: &[S],
    list_style: Option<&str>,
) -> usize {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        return 0;
    }

    let mut replaced = 0;
    for placeholder in resolve_markers(tree, marker) {
        let Some(block) = placeholder.enclosing_block(tree) else {
            continue;
        };
        let list = list_container(tree, block, &items, list_style);
        if tree.replace(block, list) {
            replaced += 1;
        }
    }
    debug!(marker, replaced, items = items.len(), "bullet list");
    replaced
}

fn list_container(tree: &mut XmlTree, template: NodeId, items: &[&str], list_style: Option<&str>) -> NodeId {
    let list = tree.create_element(TEXTNS, TEXT_LIST);
    if let Some(style) = list_style {
        tree.set_attribute(list, TEXTNS, ATTR_STYLE_NAME, style);
    }
    for item in items {
        let entry = tree.create_element(TEXTNS, TEXT_LIST_ITEM);
        let block = block_like(tree, template);
        let text = span(tree, item);
        tree.append_child(block, text);
        tree.append_child(entry, block);
        tree.append_child(list, entry);
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::template::test_support::{body, content};

    #[test]
    fn test_marker_block_becomes_list() {
        let mut tree = XmlTree::parse(&content(concat!(
            "<text:p>Palavras-chave:</text:p>",
            r#"<text:p text:style-name="P3"><text:bookmark text:name="BM_PALAVRAS_CHAVE"/></text:p>"#,
            "<text:p>fim</text:p>"
        )))
        .unwrap();
        let n = build_bullet_list(&mut tree, "BM_PALAVRAS_CHAVE", &["Compras", "", "  Licitação "], Some("L1"));
        assert_eq!(n, 1);
        assert_eq!(
            body(&tree),
            concat!(
                "<text:p>Palavras-chave:</text:p>",
                r#"<text:list text:style-name="L1">"#,
                r#"<text:list-item><text:p text:style-name="P3"><text:span>Compras</text:span></text:p></text:list-item>"#,
                r#"<text:list-item><text:p text:style-name="P3"><text:span>Licitação</text:span></text:p></text:list-item>"#,
                "</text:list>",
                "<text:p>fim</text:p>"
            )
        );
    }

    #[test]
    fn test_items_are_escaped() {
        let mut tree = XmlTree::parse(&content(r#"<text:p><text:bookmark text:name="K"/></text:p>"#)).unwrap();
        build_bullet_list(&mut tree, "K", &["P&D <interno>"], None);
        assert_eq!(
            body(&tree),
            "<text:list><text:list-item><text:p><text:span>P&amp;D &lt;interno&gt;</text:span></text:p></text:list-item></text:list>"
        );
    }

    #[test]
    fn test_range_marker_is_used_without_point_marker() {
        let mut tree = XmlTree::parse(&content(
            r#"<text:p><text:bookmark-start text:name="K"/>x<text:bookmark-end text:name="K"/></text:p>"#,
        ))
        .unwrap();
        assert_eq!(build_bullet_list(&mut tree, "K", &["a"], None), 1);
        assert!(body(&tree).starts_with("<text:list>"));
    }

    #[test]
    fn test_no_items_leaves_marker() {
        let source = r#"<text:p><text:bookmark text:name="K"/></text:p>"#;
        let mut tree = XmlTree::parse(&content(source)).unwrap();
        assert_eq!(build_bullet_list(&mut tree, "K", &["", " "], None), 0);
        assert_eq!(body(&tree), source);
    }
}
