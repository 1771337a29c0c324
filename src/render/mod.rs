//! Rendering ODF text templates from a context.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use odfill::render::{Context, TemplateConfig, TemplateEngine};
//!
//! # fn main() -> Result<(), odfill::Error> {
//! let config = TemplateConfig::from_yaml_file("bindings.yaml")?;
//! let context = Context::from_json_file("contexto.json")?;
//!
//! let engine = TemplateEngine::new(config);
//! let bytes = engine.render_file("modelo.odt", &context)?;
//! std::fs::write("documento.odt", bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! The module is organized around:
//! - [`TemplateEngine`]: runs the pipeline over an archive
//! - [`TemplateConfig`]: placeholder-to-context bindings, YAML loadable
//! - [`Context`]: the values, JSON loadable

pub mod config;
pub mod context;
pub mod engine;

pub use config::{
    ActivityListBinding, BulletListBinding, FieldBinding, FieldCleanup, ListBinding, ListLayout,
    TemplateConfig, TocBinding,
};
pub use context::{Context, ContextValue};
pub use engine::{RenderReport, TemplateEngine};
