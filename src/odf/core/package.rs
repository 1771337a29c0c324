//! ODF package (ZIP archive) reading.
//!
//! A [`Package`] is read eagerly: every entry is decompressed once, in archive
//! order, and the archive handle is released before any editing starts.

use crate::common::{Error, Result};
use crate::odf::constants::{MIMETYPE_PATH, ODF_TEXT, ODF_TEXT_TEMPLATE};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Upper bound on the buffer reserved from an entry's declared size
const MAX_PREALLOCATION: usize = 1 << 20;

/// One entry of an ODF package
#[derive(Debug, Clone)]
pub struct ArchivePart {
    /// Entry path inside the archive
    pub name: String,
    /// Decompressed entry content
    pub bytes: Vec<u8>,
    /// True for the `mimetype` entry
    pub is_media_type_declaration: bool,
    /// True for directory entries (`Pictures/`, `META-INF/`, ...)
    pub is_directory: bool,
}

/// An ODF package with its entries in archive order
#[derive(Debug, Clone)]
pub struct Package {
    parts: Vec<ArchivePart>,
}

impl Package {
    /// Open a package from a file on disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Open a package from an in-memory buffer
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Open a package from any Read + Seek source
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Invalid ZIP archive: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();
            let is_directory = file.is_dir();
            // Declared sizes are untrusted; cap the preallocation.
            let mut bytes = Vec::with_capacity((file.size() as usize).min(MAX_PREALLOCATION));
            if !is_directory {
                file.read_to_end(&mut bytes)?;
            }
            parts.push(ArchivePart {
                is_media_type_declaration: name == MIMETYPE_PATH,
                name,
                bytes,
                is_directory,
            });
        }

        Ok(Self { parts })
    }

    /// Entries in archive order
    pub fn parts(&self) -> &[ArchivePart] {
        &self.parts
    }

    /// The media-type declaration entry, if the archive has one
    pub fn media_type_part(&self) -> Option<&ArchivePart> {
        self.parts.iter().find(|p| p.is_media_type_declaration)
    }

    /// The declared MIME type, trimmed
    pub fn mimetype(&self) -> Option<&str> {
        self.media_type_part()
            .and_then(|p| std::str::from_utf8(&p.bytes).ok())
            .map(str::trim)
    }

    /// Whether the declared media type is a text document or text template.
    /// A package without a `mimetype` entry counts as text.
    pub fn is_text_document(&self) -> bool {
        self.mimetype()
            .is_none_or(|m| m == ODF_TEXT || m == ODF_TEXT_TEMPLATE)
    }

    /// Get a file from the package by path
    pub fn get_file(&self, path: &str) -> Result<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == path && !p.is_directory)
            .map(|p| p.bytes.as_slice())
            .ok_or_else(|| Error::MissingArchiveMember(path.to_string()))
    }

    /// Check if a file exists in the package
    pub fn has_file(&self, path: &str) -> bool {
        self.parts.iter().any(|p| p.name == path)
    }

    /// List all entry names in archive order
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::{SimpleFileOptions, ZipWriter};

    fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_parts_keep_archive_order() {
        let bytes = build_archive(&[
            ("mimetype", b"application/vnd.oasis.opendocument.text"),
            ("content.xml", b"<r/>"),
            ("styles.xml", b"<s/>"),
        ]);
        let package = Package::from_bytes(&bytes).unwrap();
        let names: Vec<&str> = package.files().collect();
        assert_eq!(names, ["mimetype", "content.xml", "styles.xml"]);
        assert_eq!(package.mimetype(), Some("application/vnd.oasis.opendocument.text"));
        assert!(package.parts()[0].is_media_type_declaration);
    }

    #[test]
    fn test_missing_member_is_reported() {
        let bytes = build_archive(&[("content.xml", b"<r/>")]);
        let package = Package::from_bytes(&bytes).unwrap();
        assert!(package.mimetype().is_none());
        let err = package.get_file("styles.xml").unwrap_err();
        assert!(matches!(err, Error::MissingArchiveMember(ref name) if name == "styles.xml"));
    }

    #[test]
    fn test_text_media_types() {
        let text = build_archive(&[("mimetype", ODF_TEXT.as_bytes())]);
        let template = build_archive(&[("mimetype", ODF_TEXT_TEMPLATE.as_bytes())]);
        let sheet = build_archive(&[("mimetype", b"application/vnd.oasis.opendocument.spreadsheet")]);
        let bare = build_archive(&[("content.xml", b"<r/>")]);
        assert!(Package::from_bytes(&text).unwrap().is_text_document());
        assert!(Package::from_bytes(&template).unwrap().is_text_document());
        assert!(!Package::from_bytes(&sheet).unwrap().is_text_document());
        assert!(Package::from_bytes(&bare).unwrap().is_text_document());
    }

    #[test]
    fn test_oversized_declared_length_is_not_trusted() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        writer.start_file("content.xml", stored).unwrap();
        writer.write_all(b"<r/>").unwrap();
        let mut bytes = writer.finish().unwrap().into_inner();

        // Uncompressed size fields of the local and central headers
        let huge = 0x7FFF_FFF0u32.to_le_bytes();
        for (signature, offset) in [(b"PK\x03\x04", 22), (b"PK\x01\x02", 24)] {
            let at = bytes.windows(4).position(|w| w == signature).unwrap() + offset;
            bytes[at..at + 4].copy_from_slice(&huge);
        }

        match Package::from_bytes(&bytes) {
            Ok(package) => assert_eq!(package.get_file("content.xml").unwrap(), b"<r/>"),
            Err(err) => assert!(matches!(err, Error::ZipError(_) | Error::Io(_))),
        }
    }

    #[test]
    fn test_garbage_is_not_a_package() {
        let err = Package::from_bytes(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, Error::ZipError(_)));
    }
}
