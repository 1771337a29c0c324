//! Unified error types for odfill.
//!
//! This module provides the single error type surfaced by the tree model,
//! the package layer and the template engine.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result};
