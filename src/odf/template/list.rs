//! Multi-line list expansion.
//!
//! A list of strings reaches the document in one of two layouts:
//!
//! - inline: spans joined by `text:line-break` inside the marker's block
//! - paragraphs: the marker's block is replaced by one sibling block per line,
//!   each inheriting the block's style
//!
//! Both resolve the marker name point-first, then as a range.

use super::nodes::{block_like, line_break, span};
use super::placeholder::{Placeholder, resolve_markers};
use crate::odf::elements::{NodeId, XmlTree};
use tracing::debug;

/// Punctuate items as an enumerated clause list.
///
/// Items are trimmed and empty ones dropped. Every item but the last two
/// ends with `;`, the second-to-last with `; e`, the last with `.`:
///
/// ```
/// use odfill::odf::template::format_semicolon_list;
/// assert_eq!(format_semicolon_list(&["A", "B", "C"]), ["A;", "B; e", "C."]);
/// assert_eq!(format_semicolon_list(&["A", "B"]), ["A; e", "B."]);
/// assert_eq!(format_semicolon_list(&["A"]), ["A."]);
/// ```
pub fn format_semicolon_list<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect();

    let n = items.len();
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match n - i {
            1 => format!("{item}."),
            2 => format!("{item}; e"),
            _ => format!("{item};"),
        })
        .collect()
}

/// Insert `lines` as spans into `block` starting at child index `at`, with a
/// line break between consecutive lines and none after the last.
///
/// Returns the number of nodes inserted.
pub fn expand_inline<S: AsRef<str>>(tree: &mut XmlTree, block: NodeId, at: usize, lines: &[S]) -> usize {
    let mut index = at;
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            let lb = line_break(tree);
            tree.insert_child(block, index, lb);
            index += 1;
        }
        let text = span(tree, line.as_ref());
        tree.insert_child(block, index, text);
        index += 1;
    }
    index - at
}

/// Replace `block` with one block per line, each carrying `block`'s style
/// and a single span with the line's text.
///
/// Returns the new blocks in order; empty when `block` is detached.
pub fn expand_as_sibling_blocks<S: AsRef<str>>(tree: &mut XmlTree, block: NodeId, lines: &[S]) -> Vec<NodeId> {
    let (Some(parent), Some(index)) = (tree.parent(block), tree.index_in_parent(block)) else {
        return Vec::new();
    };
    tree.detach(block);

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let sibling = block_like(tree, block);
            let text = span(tree, line.as_ref());
            tree.append_child(sibling, text);
            tree.insert_child(parent, index + i, sibling);
            sibling
        })
        .collect()
}

/// Fill every marker named `name` with `lines`, inline.
///
/// A point marker is replaced by the lines at its position. A range marker
/// loses everything between start and end; the lines go where the start was
/// and both ends are removed. Returns the number of markers filled.
pub fn fill_inline_list<S: AsRef<str>>(tree: &mut XmlTree, name: &str, lines: &[S]) -> usize {
    let mut filled = 0;
    for placeholder in resolve_markers(tree, name) {
        match placeholder {
            Placeholder::PointMarker(marker) => {
                let (Some(parent), Some(index)) = (tree.parent(marker), tree.index_in_parent(marker)) else {
                    continue;
                };
                expand_inline(tree, parent, index, lines);
                tree.detach(marker);
            },
            Placeholder::RangeMarker { start, end, container } => {
                let (Some(i0), Some(i1)) = (tree.index_in_parent(start), tree.index_in_parent(end)) else {
                    continue;
                };
                let between: Vec<NodeId> = tree.children(container)[i0 + 1..i1].to_vec();
                for node in between {
                    tree.detach(node);
                }
                expand_inline(tree, container, i0, lines);
                tree.detach(end);
                tree.detach(start);
            },
            Placeholder::InlineFieldRef(_) => continue,
        }
        filled += 1;
    }
    debug!(marker = name, filled, lines = lines.len(), "inline list");
    filled
}

/// Fill every marker named `name` by replacing its enclosing block with one
/// block per line. Returns the number of markers filled.
pub fn fill_paragraph_list<S: AsRef<str>>(tree: &mut XmlTree, name: &str, lines: &[S]) -> usize {
    let mut filled = 0;
    for placeholder in resolve_markers(tree, name) {
        let Some(block) = placeholder.enclosing_block(tree) else {
            continue;
        };
        if !expand_as_sibling_blocks(tree, block, lines).is_empty() {
            filled += 1;
        }
    }
    debug!(marker = name, filled, lines = lines.len(), "paragraph list");
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::elements::TEXTNS;
    use crate::odf::template::test_support::{body, content, first_paragraph};
    use proptest::prelude::*;

    #[test]
    fn test_semicolon_list_small_sizes() {
        let empty: [&str; 0] = [];
        assert!(format_semicolon_list(&empty).is_empty());
        assert_eq!(format_semicolon_list(&["A"]), ["A."]);
        assert_eq!(format_semicolon_list(&["A", "B"]), ["A; e", "B."]);
        assert_eq!(format_semicolon_list(&["A", "B", "C"]), ["A;", "B; e", "C."]);
        assert_eq!(
            format_semicolon_list(&["A", "B", "C", "D"]),
            ["A;", "B;", "C; e", "D."]
        );
    }

    #[test]
    fn test_semicolon_list_drops_blank_items() {
        assert_eq!(
            format_semicolon_list(&["  Reduzir custos ", "", "   ", "Ampliar acesso"]),
            ["Reduzir custos; e", "Ampliar acesso."]
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_semicolon_list_punctuation(items in prop::collection::vec("[a-zA-Z][a-zA-Z ]{0,12}[a-zA-Z]", 0..8)) {
            let lines = format_semicolon_list(&items);
            prop_assert_eq!(lines.len(), items.len());
            let n = lines.len();
            for (i, (line, item)) in lines.iter().zip(&items).enumerate() {
                let expected = if i + 1 == n {
                    format!("{item}.")
                } else if i + 2 == n {
                    format!("{item}; e")
                } else {
                    format!("{item};")
                };
                prop_assert_eq!(line, &expected);
            }
        }
    }

    #[test]
    fn test_expand_inline_interleaves_breaks() {
        let mut tree = XmlTree::parse(&content("<text:p>x</text:p>")).unwrap();
        let p = first_paragraph(&tree);
        assert_eq!(expand_inline(&mut tree, p, 0, &["a", "b", "c"]), 5);
        assert_eq!(
            body(&tree),
            "<text:p><text:span>a</text:span><text:line-break/><text:span>b</text:span><text:line-break/><text:span>c</text:span>x</text:p>"
        );
    }

    #[test]
    fn test_sibling_blocks_inherit_style() {
        let mut tree = XmlTree::parse(&content(
            r#"<text:p>before</text:p><text:p text:style-name="S">marker</text:p><text:p>after</text:p>"#,
        ))
        .unwrap();
        let block = tree.find_elements(TEXTNS, "p")[1];
        let created = expand_as_sibling_blocks(&mut tree, block, &["one", "two", "three"]);

        assert_eq!(created.len(), 3);
        assert!(tree.parent(block).is_none());
        for &node in &created {
            assert_eq!(tree.attribute(node, TEXTNS, "style-name").as_deref(), Some("S"));
        }
        assert_eq!(
            body(&tree),
            concat!(
                "<text:p>before</text:p>",
                r#"<text:p text:style-name="S"><text:span>one</text:span></text:p>"#,
                r#"<text:p text:style-name="S"><text:span>two</text:span></text:p>"#,
                r#"<text:p text:style-name="S"><text:span>three</text:span></text:p>"#,
                "<text:p>after</text:p>"
            )
        );
    }

    #[test]
    fn test_fill_inline_point_marker() {
        let mut tree = XmlTree::parse(&content(
            r#"<text:p>Objetivos: <text:bookmark text:name="BM_OE_LIST"/></text:p>"#,
        ))
        .unwrap();
        let lines = format_semicolon_list(&["A", "B"]);
        assert_eq!(fill_inline_list(&mut tree, "BM_OE_LIST", &lines), 1);
        assert_eq!(
            body(&tree),
            "<text:p>Objetivos: <text:span>A; e</text:span><text:line-break/><text:span>B.</text:span></text:p>"
        );
    }

    #[test]
    fn test_fill_inline_range_marker_drops_old_content() {
        let mut tree = XmlTree::parse(&content(concat!(
            r#"<text:p>pre<text:bookmark-start text:name="BM_IE_LIST"/>"#,
            r#"old <text:span>text</text:span><text:bookmark-end text:name="BM_IE_LIST"/>post</text:p>"#
        )))
        .unwrap();
        assert_eq!(fill_inline_list(&mut tree, "BM_IE_LIST", &["X."]), 1);
        assert_eq!(body(&tree), "<text:p>pre<text:span>X.</text:span>post</text:p>");
    }

    #[test]
    fn test_fill_inline_prefers_point_markers() {
        let mut tree = XmlTree::parse(&content(concat!(
            r#"<text:p><text:bookmark text:name="L"/></text:p>"#,
            r#"<text:p><text:bookmark-start text:name="L"/>keep<text:bookmark-end text:name="L"/></text:p>"#
        )))
        .unwrap();
        assert_eq!(fill_inline_list(&mut tree, "L", &["v"]), 1);
        assert_eq!(
            body(&tree),
            concat!(
                "<text:p><text:span>v</text:span></text:p>",
                r#"<text:p><text:bookmark-start text:name="L"/>keep<text:bookmark-end text:name="L"/></text:p>"#
            )
        );
    }

    #[test]
    fn test_fill_paragraph_list_from_nested_marker() {
        let mut tree = XmlTree::parse(&content(
            r#"<text:p text:style-name="P7"><text:span><text:bookmark text:name="K"/></text:span></text:p>"#,
        ))
        .unwrap();
        assert_eq!(fill_paragraph_list(&mut tree, "K", &["a", "b"]), 1);
        assert_eq!(
            body(&tree),
            concat!(
                r#"<text:p text:style-name="P7"><text:span>a</text:span></text:p>"#,
                r#"<text:p text:style-name="P7"><text:span>b</text:span></text:p>"#
            )
        );
    }

    #[test]
    fn test_fill_missing_marker_is_zero() {
        let mut tree = XmlTree::parse(&content("<text:p/>")).unwrap();
        assert_eq!(fill_inline_list(&mut tree, "NOPE", &["a"]), 0);
        assert_eq!(fill_paragraph_list(&mut tree, "NOPE", &["a"]), 0);
    }
}
