//! ODF package writing.
//!
//! [`PackageWriter`] knows the one packaging rule ODF imposes on the ZIP
//! container: the `mimetype` entry comes first and is stored uncompressed.
//! [`repackage`] rebuilds a template package around updated parts.

use super::package::Package;
use crate::common::Result;
use crate::odf::constants::{FALLBACK_MIMETYPE, MIMETYPE_PATH};
use std::collections::HashMap;
use std::io::{Cursor, Seek, Write};
use tracing::{debug, warn};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Writer for ODF packages (ZIP archives)
///
/// # Examples
///
/// ```no_run
/// # use odfill::odf::core::PackageWriter;
/// # use odfill::Result;
/// # fn example() -> Result<()> {
/// let mut writer = PackageWriter::new();
/// writer.write_mimetype(b"application/vnd.oasis.opendocument.text")?;
/// writer.add_file("content.xml", b"<office:document-content/>")?;
/// let bytes = writer.finish_to_bytes()?;
/// # Ok(())
/// # }
/// ```
pub struct PackageWriter<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
    entries_written: usize,
}

impl PackageWriter<Cursor<Vec<u8>>> {
    /// Create a new package writer that writes to memory
    pub fn new() -> Self {
        Self::with_writer(Cursor::new(Vec::new()))
    }

    /// Finish writing and return the bytes
    pub fn finish_to_bytes(self) -> Result<Vec<u8>> {
        let cursor = self.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for PackageWriter<Cursor<Vec<u8>>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Seek> PackageWriter<W> {
    /// Create a new package writer with a custom writer
    pub fn with_writer(writer: W) -> Self {
        Self {
            zip_writer: ZipWriter::new(writer),
            entries_written: 0,
        }
    }

    /// Write the `mimetype` entry: stored, bytes untouched.
    ///
    /// Must be the first entry of the package.
    pub fn write_mimetype(&mut self, content: &[u8]) -> Result<()> {
        debug_assert_eq!(self.entries_written, 0, "mimetype must be the first entry");
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        self.zip_writer.start_file(MIMETYPE_PATH, options)?;
        self.zip_writer.write_all(content)?;
        self.entries_written += 1;
        Ok(())
    }

    /// Add a deflated file to the package
    pub fn add_file(&mut self, path: &str, content: &[u8]) -> Result<()> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.zip_writer.start_file(path, options)?;
        self.zip_writer.write_all(content)?;
        self.entries_written += 1;
        Ok(())
    }

    /// Add a directory entry (`Pictures/`, ...)
    pub fn add_directory(&mut self, path: &str) -> Result<()> {
        self.zip_writer
            .add_directory(path, SimpleFileOptions::default())?;
        self.entries_written += 1;
        Ok(())
    }

    /// Finish the ZIP archive and return the underlying writer
    pub fn finish(self) -> Result<W> {
        Ok(self.zip_writer.finish()?)
    }
}

/// Rebuild `original` with some parts replaced.
///
/// - the `mimetype` entry is written first, stored and byte-identical, no
///   matter where it sat in the source or whether `updated_parts` names it;
///   when the source has none, [`FALLBACK_MIMETYPE`] is written instead
/// - every other entry keeps its source position and takes its content from
///   `updated_parts` when present there, else from the source
/// - names in `updated_parts` that the source lacks are ignored
///
/// The archive is assembled in memory; nothing is returned on failure.
pub fn repackage(original: &Package, updated_parts: &HashMap<String, Vec<u8>>) -> Result<Vec<u8>> {
    let mut writer = PackageWriter::new();

    match original.media_type_part() {
        Some(part) => writer.write_mimetype(&part.bytes)?,
        None => {
            warn!(
                fallback = FALLBACK_MIMETYPE,
                "template has no mimetype entry, writing fallback"
            );
            writer.write_mimetype(FALLBACK_MIMETYPE.as_bytes())?;
        },
    }

    for part in original.parts() {
        if part.is_media_type_declaration {
            continue;
        }
        if part.is_directory {
            writer.add_directory(&part.name)?;
            continue;
        }
        match updated_parts.get(&part.name) {
            Some(bytes) => {
                debug!(part = %part.name, size = bytes.len(), "writing updated part");
                writer.add_file(&part.name, bytes)?;
            },
            None => writer.add_file(&part.name, &part.bytes)?,
        }
    }

    for name in updated_parts.keys() {
        if name != MIMETYPE_PATH && !original.has_file(name) {
            warn!(part = %name, "updated part is not in the template archive, ignoring");
        }
    }

    writer.finish_to_bytes()
}
