//! Structural template operations over a parsed ODF part.
//!
//! Every operation takes an [`XmlTree`](crate::odf::elements::XmlTree),
//! looks up placeholders by name and edits the tree in place, returning how
//! many placeholders it replaced. A name the template does not use is not an
//! error; the count is simply 0.
//!
//! - [`field`]: `text:user-field-get` substitution, with optional cleanup of
//!   empty values
//! - [`list`]: semicolon-punctuated lists, inline or one paragraph per line
//! - [`bullet`]: bulleted `text:list` generation
//! - [`activity`]: numbered title/description paragraphs
//! - [`toc`]: generated table of contents
//!
//! Bookmark markers are resolved point-first: `text:bookmark` occurrences are
//! used when there are any, otherwise `text:bookmark-start`/`-end` pairs.

pub mod activity;
pub mod bullet;
pub mod field;
pub mod list;
pub mod literal;
pub mod nodes;
pub mod placeholder;
pub mod toc;

#[cfg(test)]
pub(crate) mod test_support;

pub use activity::{ActivityRecord, build_numbered_activity_list};
pub use bullet::build_bullet_list;
pub use field::{substitute_field, substitute_field_with_cleanup};
pub use list::{
    expand_as_sibling_blocks, expand_inline, fill_inline_list, fill_paragraph_list, format_semicolon_list,
};
pub use literal::normalize_nested_items;
pub use placeholder::{
    Placeholder, find_inline_field_refs, find_point_markers, find_range_markers, resolve_markers,
};
pub use toc::insert_generated_index;
