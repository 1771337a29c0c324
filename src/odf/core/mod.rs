//! Core ODF package handling.
//!
//! This module reads OpenDocument files as ZIP archives and writes them back
//! following the packaging rules consumers rely on.
//!
//! # Package Reading (`package.rs`)
//! - `Package::open()` / `from_bytes()` / `from_reader()` - eager, ordered entry list
//! - `get_file()` - Extract an entry by path (`MissingArchiveMember` when absent)
//! - `mimetype()` - Declared media type
//!
//! # Package Writing (`writer.rs`)
//! - `PackageWriter<W>` - ZIP writer with the stored-first `mimetype` rule
//! - `repackage()` - Rebuild a template package around updated parts
//!
//! # References
//! - ODF Specification: Part 2 (Packages) §3
//! - ZIP format: PKZIP Application Note

/// ODF package handling
mod package;
/// ODF package writing
mod writer;

pub use package::{ArchivePart, Package};
pub use writer::{PackageWriter, repackage};
