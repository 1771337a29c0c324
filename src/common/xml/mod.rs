//! XML text helpers shared by the tree model and the template builders.

mod escape;

pub use escape::{escape_attr, escape_text, unescape_xml};
