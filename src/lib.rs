//! odfill - Structural templating for OpenDocument Text files
//!
//! This library fills `.odt` templates by editing their XML structure rather
//! than doing text replacement: user fields become text, bookmarks become
//! punctuated lists, bulleted lists, numbered title/description paragraphs or
//! a generated table of contents. The result is written back as an ODF
//! package that any compliant office suite opens.
//!
//! # Features
//!
//! - **Field substitution**: `text:user-field-get` references replaced by text,
//!   with cleanup of empty optional fields
//! - **List expansion**: inline (line breaks) or one paragraph per item, with
//!   the enumerated-clause punctuation `a;` / `b; e` / `c.`
//! - **Structured lists**: bulleted `text:list` and numbered activity blocks
//! - **Table of contents**: index definition regenerated by the office suite
//! - **Faithful packaging**: untouched parts and entries are copied byte for
//!   byte, `mimetype` stays first and stored
//!
//! # Example - Rendering a template
//!
//! ```no_run
//! use odfill::{Context, TemplateEngine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let context = Context::new()
//!     .with("nome_processo", "Gestão de Compras")
//!     .with("objetivos_estrategicos", vec!["Reduzir custos", "Ampliar acesso"]);
//!
//! let engine = TemplateEngine::default();
//! let report = engine.render_to_file("modelo_POP.odt", &context, "POP.odt")?;
//! println!("placeholders filled: {}", report.total());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Low-level tree editing
//!
//! ```no_run
//! use odfill::odf::{Package, XmlTree, repackage};
//! use odfill::odf::template::{fill_inline_list, format_semicolon_list, substitute_field};
//! use std::collections::HashMap;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let package = Package::open("modelo.odt")?;
//! let mut tree = XmlTree::parse(package.get_file("content.xml")?)?;
//!
//! substitute_field(&mut tree, "POP_CODIGO", "POP-001");
//! fill_inline_list(&mut tree, "BM_OE_LIST", &format_semicolon_list(&["A", "B"]));
//!
//! let mut updated = HashMap::new();
//! updated.insert("content.xml".to_string(), tree.serialize());
//! std::fs::write("saida.odt", repackage(&package, &updated)?)?;
//! # Ok(())
//! # }
//! ```

/// Common types shared across the crate (errors, XML escaping)
pub mod common;

/// OpenDocument package, XML tree and template operations
pub mod odf;

/// Template engine, bindings and render context
pub mod render;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use render::{Context, ContextValue, RenderReport, TemplateConfig, TemplateEngine};
