//! Unified error types for odfill.
//!
//! Structural failures (unparseable XML, missing document parts, broken ZIP
//! containers) abort a render. Absent placeholders are not errors: every
//! substitution operation reports a replacement count instead.
use thiserror::Error;

/// Main error type for odfill operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An XML part could not be parsed into a tree
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A document part required by the render is absent from the package
    #[error("Missing archive member: {0}")]
    MissingArchiveMember(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// Template binding configuration could not be loaded
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Context document could not be loaded
    #[error("Invalid context: {0}")]
    InvalidContext(String),
}

/// Result type for odfill operations.
pub type Result<T> = std::result::Result<T, Error>;
