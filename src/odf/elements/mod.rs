//! XML tree model for ODF parts.
//!
//! - `namespace`: namespace URIs, qualified names and scope resolution
//! - `tree`: the arena-backed mutable tree and its serializer
//! - `parser`: strict quick-xml builder for the tree

pub mod namespace;
pub mod parser;
pub mod tree;

pub use namespace::{OFFICENS, QualifiedName, STYLENS, TEXTNS};
pub use tree::{Attribute, ElementData, NodeId, NodeKind, XML_DECLARATION, XmlTree};
