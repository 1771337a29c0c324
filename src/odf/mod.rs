/// ODF constants: media types, part names and element vocabulary
pub mod constants;
/// ODF package (ZIP container) reading and writing
pub mod core;
/// Mutable XML tree for ODF parts
pub mod elements;
/// Structural template operations
pub mod template;

pub use core::{Package, PackageWriter, repackage};
pub use elements::XmlTree;
