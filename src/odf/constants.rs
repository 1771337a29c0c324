//! ODF constants: MIME types, part paths and the element vocabulary used by
//! the template engine.
//!
//! # References
//!
//! - OpenDocument v1.3, Part 2 (Packages) §3.3 for the `mimetype` entry
//! - OpenDocument v1.3, Part 3 (Schema) §5, §6, §8 for text, list and index elements

// ============================================================================
// MIME TYPES
// ============================================================================

/// MIME type for OpenDocument Text (.odt)
pub const ODF_TEXT: &str = "application/vnd.oasis.opendocument.text";

/// MIME type for OpenDocument Text Template (.ott)
pub const ODF_TEXT_TEMPLATE: &str = "application/vnd.oasis.opendocument.text-template";

/// Media type written when a template archive carries no `mimetype` entry
pub const FALLBACK_MIMETYPE: &str = ODF_TEXT;

// ============================================================================
// PACKAGE PARTS
// ============================================================================

/// The media-type declaration entry; first in the archive and stored uncompressed
pub const MIMETYPE_PATH: &str = "mimetype";

/// Main document content
pub const CONTENT_XML: &str = "content.xml";

/// Document-wide styles, master pages, headers and footers
pub const STYLES_XML: &str = "styles.xml";

// ============================================================================
// TEXT ELEMENTS (local names in the text namespace)
// ============================================================================

/// Paragraph block
pub const TEXT_P: &str = "p";
/// Heading block
pub const TEXT_H: &str = "h";
/// Inline text-bearing run
pub const TEXT_SPAN: &str = "span";
/// Soft line break inside a block
pub const TEXT_LINE_BREAK: &str = "line-break";
/// Point bookmark
pub const TEXT_BOOKMARK: &str = "bookmark";
/// Start of a bookmark range
pub const TEXT_BOOKMARK_START: &str = "bookmark-start";
/// End of a bookmark range
pub const TEXT_BOOKMARK_END: &str = "bookmark-end";
/// Reference to a user-defined field
pub const TEXT_USER_FIELD_GET: &str = "user-field-get";
/// List container
pub const TEXT_LIST: &str = "list";
/// List item
pub const TEXT_LIST_ITEM: &str = "list-item";

/// Generated table of contents
pub const TEXT_TABLE_OF_CONTENT: &str = "table-of-content";
/// Source definition of a table of contents
pub const TEXT_TABLE_OF_CONTENT_SOURCE: &str = "table-of-content-source";
/// Per-level entry template
pub const TEXT_TABLE_OF_CONTENT_ENTRY_TEMPLATE: &str = "table-of-content-entry-template";
/// Template for the index title
pub const TEXT_INDEX_TITLE_TEMPLATE: &str = "index-title-template";
/// Rendered index content, filled by the consuming office suite
pub const TEXT_INDEX_BODY: &str = "index-body";
/// Chapter number component of an entry template
pub const TEXT_INDEX_ENTRY_CHAPTER: &str = "index-entry-chapter";
/// Heading text component of an entry template
pub const TEXT_INDEX_ENTRY_TEXT: &str = "index-entry-text";
/// Tab stop component of an entry template
pub const TEXT_INDEX_ENTRY_TAB_STOP: &str = "index-entry-tab-stop";
/// Page number component of an entry template
pub const TEXT_INDEX_ENTRY_PAGE_NUMBER: &str = "index-entry-page-number";

// ============================================================================
// ATTRIBUTES (local names)
// ============================================================================

/// `text:name`, identifies bookmarks, fields and indexes
pub const ATTR_NAME: &str = "name";
/// `text:style-name`, the block style reference
pub const ATTR_STYLE_NAME: &str = "style-name";
/// `text:protected`
pub const ATTR_PROTECTED: &str = "protected";
/// `text:outline-level`
pub const ATTR_OUTLINE_LEVEL: &str = "outline-level";
/// `style:type` on a tab stop
pub const ATTR_TYPE: &str = "type";
/// `style:leader-char` on a tab stop
pub const ATTR_LEADER_CHAR: &str = "leader-char";

// ============================================================================
// STYLE NAMES
// ============================================================================

/// Paragraph style LibreOffice uses for index headings
pub const STYLE_CONTENTS_HEADING: &str = "Contents_20_Heading";

/// Paragraph style LibreOffice uses for index entries of the given level
pub fn contents_level_style(level: u8) -> String {
    format!("Contents_20_{level}")
}
