//! The render pipeline: template archive + context -> filled archive.
//!
//! Each configured part is parsed once and edited in a fixed order:
//!
//! 1. field substitution
//! 2. punctuated lists
//! 3. bulleted lists
//! 4. numbered activity lists
//! 5. table of contents
//!
//! Scalar fields go first so later structural edits see resolved text. A part
//! nothing matched in keeps its original bytes; all other archive entries are
//! copied through unchanged.

use super::config::{FieldCleanup, ListLayout, TemplateConfig};
use super::context::Context;
use crate::common::Result;
use crate::odf::core::{Package, repackage};
use crate::odf::elements::XmlTree;
use crate::odf::template::{
    build_bullet_list, build_numbered_activity_list, fill_inline_list, fill_paragraph_list,
    format_semicolon_list, insert_generated_index, normalize_nested_items, substitute_field,
    substitute_field_with_cleanup,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Replacement counts of one render, summed over all processed parts.
///
/// A zero count means the placeholder is not in the template (or there was
/// nothing to put in it); it is never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    /// Field name -> references replaced
    pub fields: BTreeMap<String, usize>,
    /// Marker name -> markers filled, for punctuated lists
    pub lists: BTreeMap<String, usize>,
    pub bullet_lists: BTreeMap<String, usize>,
    pub activity_lists: BTreeMap<String, usize>,
    pub table_of_contents: usize,
    /// Parts that were rewritten, in processing order
    pub updated_parts: Vec<String>,
}

impl RenderReport {
    /// Total number of placeholders replaced
    pub fn total(&self) -> usize {
        self.fields.values().sum::<usize>()
            + self.lists.values().sum::<usize>()
            + self.bullet_lists.values().sum::<usize>()
            + self.activity_lists.values().sum::<usize>()
            + self.table_of_contents
    }
}

/// Fills ODF text templates according to a [`TemplateConfig`].
///
/// The engine holds no state between renders; one instance can serve any
/// number of templates and contexts.
///
/// # Examples
///
/// ```no_run
/// use odfill::render::{Context, TemplateEngine};
///
/// # fn main() -> odfill::Result<()> {
/// let engine = TemplateEngine::default();
/// let context = Context::from_json_file("primeira_pagina.contexto.json")?;
/// let report = engine.render_to_file("modelo_POP.odt", &context, "POP.odt")?;
/// println!("{} placeholders filled", report.total());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    config: TemplateConfig,
}

impl TemplateEngine {
    pub fn new(config: TemplateConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Render template archive bytes.
    pub fn render(&self, template: &[u8], context: &Context) -> Result<Vec<u8>> {
        self.render_with_report(template, context)
            .map(|(bytes, _)| bytes)
    }

    /// Render template archive bytes, also returning what was replaced.
    ///
    /// Fails without output when the archive cannot be read, the content part
    /// is missing, or any processed part is not well-formed XML.
    pub fn render_with_report(&self, template: &[u8], context: &Context) -> Result<(Vec<u8>, RenderReport)> {
        let package = Package::from_bytes(template)?;
        if !package.is_text_document() {
            warn!(
                mimetype = package.mimetype().unwrap_or_default(),
                "template is not declared as an ODF text document"
            );
        }
        let mut report = RenderReport::default();
        let mut updated = HashMap::new();

        let content = package.get_file(&self.config.content_part)?;
        if let Some(bytes) = self.render_part(content, context, &mut report)? {
            report.updated_parts.push(self.config.content_part.clone());
            updated.insert(self.config.content_part.clone(), bytes);
        }

        if let Some(styles_part) = &self.config.styles_part {
            if package.has_file(styles_part) {
                let styles = package.get_file(styles_part)?;
                if let Some(bytes) = self.render_part(styles, context, &mut report)? {
                    report.updated_parts.push(styles_part.clone());
                    updated.insert(styles_part.clone(), bytes);
                }
            } else {
                debug!(part = %styles_part, "optional part not in template, skipping");
            }
        }

        let output = repackage(&package, &updated)?;
        info!(
            replaced = report.total(),
            parts = report.updated_parts.len(),
            size = output.len(),
            "rendered template"
        );
        Ok((output, report))
    }

    /// Read a template from disk and render it.
    pub fn render_file<P: AsRef<Path>>(&self, template: P, context: &Context) -> Result<Vec<u8>> {
        let bytes = fs::read(template.as_ref())?;
        self.render(&bytes, context)
    }

    /// Render a template file into `output`.
    ///
    /// The archive is written next to `output` under a temporary name and
    /// renamed into place, so `output` is either the complete result or
    /// untouched.
    pub fn render_to_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        template: P,
        context: &Context,
        output: Q,
    ) -> Result<RenderReport> {
        let output = output.as_ref();
        let bytes = fs::read(template.as_ref())?;
        let (rendered, report) = self.render_with_report(&bytes, context)?;

        let staging = staging_path(output);
        if let Err(e) = fs::write(&staging, &rendered).and_then(|()| fs::rename(&staging, output)) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        info!(path = %output.display(), "wrote rendered document");
        Ok(report)
    }

    /// Apply every binding to one XML part. Returns the serialized part when
    /// anything was replaced.
    fn render_part(&self, bytes: &[u8], context: &Context, report: &mut RenderReport) -> Result<Option<Vec<u8>>> {
        let mut tree = XmlTree::parse(bytes)?;
        let mut edits = 0;

        for binding in &self.config.fields {
            let value = context.first_text(&binding.keys);
            let count = match binding.cleanup {
                FieldCleanup::None => substitute_field(&mut tree, &binding.field, &value),
                FieldCleanup::RemoveEmpty => substitute_field_with_cleanup(&mut tree, &binding.field, &value, false),
                FieldCleanup::TrimPrecedingBreak => {
                    substitute_field_with_cleanup(&mut tree, &binding.field, &value, true)
                },
            };
            *report.fields.entry(binding.field.clone()).or_default() += count;
            edits += count;
        }

        for binding in &self.config.lists {
            let lines = format_semicolon_list(&context.list(&binding.key));
            let count = if lines.is_empty() {
                0
            } else {
                match binding.layout {
                    ListLayout::Inline => fill_inline_list(&mut tree, &binding.marker, &lines),
                    ListLayout::Paragraphs => fill_paragraph_list(&mut tree, &binding.marker, &lines),
                }
            };
            *report.lists.entry(binding.marker.clone()).or_default() += count;
            edits += count;
        }

        for binding in &self.config.bullet_lists {
            let items = normalize_nested_items(&context.list(&binding.key));
            let count = build_bullet_list(&mut tree, &binding.marker, &items, binding.list_style.as_deref());
            *report.bullet_lists.entry(binding.marker.clone()).or_default() += count;
            edits += count;
        }

        for binding in &self.config.activity_lists {
            let records = context.records(&binding.key);
            let count = build_numbered_activity_list(&mut tree, &binding.marker, records, &binding.description_style);
            *report.activity_lists.entry(binding.marker.clone()).or_default() += count;
            edits += count;
        }

        if let Some(toc) = &self.config.table_of_contents {
            let count = insert_generated_index(&mut tree, &toc.marker, &toc.title, toc.outline_levels, toc.protect);
            report.table_of_contents += count;
            edits += count;
        }

        Ok((edits > 0).then(|| tree.serialize()))
    }
}

fn staging_path(output: &Path) -> std::path::PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use crate::odf::constants::ODF_TEXT;
    use crate::odf::template::ActivityRecord;
    use crate::odf::template::test_support::{content, odt};
    use std::io::{Cursor, Read};
    use zip::CompressionMethod;

    fn read_entry(archive: &[u8], name: &str) -> String {
        let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
        let mut file = zip.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    fn names(archive: &[u8]) -> Vec<String> {
        let zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
        zip.file_names().map(str::to_string).collect::<Vec<_>>()
    }

    const FIRST_PAGE: &str = concat!(
        r#"<text:p text:style-name="Titulo"><text:user-field-get text:name="POP_NOME_PROCESSO">nome</text:user-field-get></text:p>"#,
        r#"<text:p>Versão <text:user-field-get text:name="POP_VERSAO">0</text:user-field-get></text:p>"#,
        r#"<text:p>Setor<text:line-break/><text:user-field-get text:name="EORG_SUP"/></text:p>"#,
        r#"<text:p>Objetivos: <text:bookmark text:name="BM_OE_LIST"/></text:p>"#,
        r#"<text:p><text:bookmark-start text:name="BM_IE_LIST"/>sem indicadores<text:bookmark-end text:name="BM_IE_LIST"/></text:p>"#,
        r#"<text:p text:style-name="Lista"><text:bookmark text:name="BM_PALAVRAS_CHAVE"/></text:p>"#,
        r#"<text:p text:style-name="Atividade"><text:bookmark text:name="BM_DESCRICAO_ATIVIDADES"/></text:p>"#,
        r#"<text:p><text:bookmark text:name="BM_SUMARIO"/></text:p>"#
    );

    const STYLES: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<office:document-styles xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" "#,
        r#"xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0"><office:master-styles>"#,
        r#"<text:p>Elaborado por: <text:user-field-get text:name="POP_ELABORADOR"/></text:p>"#,
        r#"<text:p><text:user-field-get text:name="POP_APROVACAO_DATA"/></text:p>"#,
        r#"</office:master-styles></office:document-styles>"#
    );

    fn template() -> Vec<u8> {
        let body = content(FIRST_PAGE);
        odt(&[
            ("content.xml", body.as_slice()),
            ("styles.xml", STYLES.as_bytes()),
            ("Pictures/logo.png", b"\x89PNG\r\n"),
        ])
    }

    fn context() -> Context {
        Context::from_json_str(
            r#"{
                "nome_processo": "Gestão de Compras & Contratos",
                "versao": 2,
                "EORG_SUP": "",
                "objetivos_estrategicos": ["Reduzir custos", "Ampliar acesso", "Integrar sistemas"],
                "indicadores_estrategicos": ["Tempo médio"],
                "palavras_chave": ["compras", "['licitação', 'contrato']"],
                "descricao_processo_atividades": [{"elemento": "Receber pedido", "descricao": "Confere.\nRegistra."}],
                "rodape_elaborador": "Ana"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_render_pop_template() {
        let engine = TemplateEngine::default();
        let (out, report) = engine.render_with_report(&template(), &context()).unwrap();

        let xml = read_entry(&out, "content.xml");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains("<text:span>Gestão de Compras &amp; Contratos</text:span>"));
        assert!(xml.contains("Versão <text:span>2</text:span>"));
        // empty EORG_SUP takes its line break with it, the label stays
        assert!(xml.contains("<text:p>Setor</text:p>"));
        assert!(xml.contains(concat!(
            "Objetivos: <text:span>Reduzir custos;</text:span><text:line-break/>",
            "<text:span>Ampliar acesso; e</text:span><text:line-break/><text:span>Integrar sistemas.</text:span>"
        )));
        assert!(xml.contains("<text:p><text:span>Tempo médio.</text:span></text:p>"));
        assert!(!xml.contains("sem indicadores"));
        assert!(xml.contains("<text:span>licitação</text:span>"));
        assert!(xml.contains("<text:span>1. Receber pedido</text:span>"));
        assert!(xml.contains("<text:span>Confere.</text:span><text:line-break/><text:span>Registra.</text:span>"));
        assert!(xml.contains("<text:table-of-content"));
        assert!(!xml.contains("user-field-get"));
        assert!(!xml.contains("bookmark"));

        let styles = read_entry(&out, "styles.xml");
        assert!(styles.contains("Elaborado por: <text:span>Ana</text:span>"));
        assert!(!styles.contains("POP_APROVACAO_DATA"));
        assert!(!styles.contains("<text:p/>"));

        assert_eq!(report.fields["POP_NOME_PROCESSO"], 1);
        assert_eq!(report.fields["POP_CODIGO"], 0);
        assert_eq!(report.lists["BM_OE_LIST"], 1);
        assert_eq!(report.lists["BM_IE_LIST"], 1);
        assert_eq!(report.bullet_lists["BM_PALAVRAS_CHAVE"], 1);
        assert_eq!(report.activity_lists["BM_DESCRICAO_ATIVIDADES"], 1);
        assert_eq!(report.table_of_contents, 1);
        assert_eq!(report.updated_parts, ["content.xml", "styles.xml"]);
    }

    #[test]
    fn test_archive_layout_is_kept() {
        let source = template();
        let out = TemplateEngine::default().render(&source, &context()).unwrap();
        assert_eq!(names(&out), names(&source));

        let mut zip = zip::ZipArchive::new(Cursor::new(&out)).unwrap();
        let mimetype = zip.by_index(0).unwrap();
        assert_eq!(mimetype.name(), "mimetype");
        assert_eq!(mimetype.compression(), CompressionMethod::Stored);
        drop(mimetype);
        assert_eq!(read_entry(&out, "mimetype"), ODF_TEXT);

        let mut logo = Vec::new();
        zip.by_name("Pictures/logo.png").unwrap().read_to_end(&mut logo).unwrap();
        assert_eq!(logo, b"\x89PNG\r\n");
    }

    #[test]
    fn test_untouched_part_keeps_original_bytes() {
        let body = content("<text:p>Sem   campos &#233;</text:p>");
        let source = odt(&[("content.xml", body.as_slice())]);
        let (out, report) = TemplateEngine::default()
            .render_with_report(&source, &Context::new())
            .unwrap();
        assert!(report.updated_parts.is_empty());
        assert_eq!(read_entry(&out, "content.xml").as_bytes(), body.as_slice());
    }

    #[test]
    fn test_empty_list_leaves_marker() {
        let body = content(r#"<text:p><text:bookmark text:name="BM_OE_LIST"/></text:p>"#);
        let source = odt(&[("content.xml", body.as_slice())]);
        let context = Context::new().with("objetivos_estrategicos", vec!["", "  "]);
        let (out, report) = TemplateEngine::default().render_with_report(&source, &context).unwrap();
        assert_eq!(report.lists["BM_OE_LIST"], 0);
        assert!(read_entry(&out, "content.xml").contains(r#"<text:bookmark text:name="BM_OE_LIST"/>"#));
    }

    #[test]
    fn test_point_marker_wins_over_range_in_render() {
        let body = content(concat!(
            r#"<text:p><text:bookmark text:name="BM_OE_LIST"/></text:p>"#,
            r#"<text:p><text:bookmark-start text:name="BM_OE_LIST"/>antigo<text:bookmark-end text:name="BM_OE_LIST"/></text:p>"#
        ));
        let source = odt(&[("content.xml", body.as_slice())]);
        let context = Context::new().with("objetivos_estrategicos", vec!["Único"]);
        let out = TemplateEngine::default().render(&source, &context).unwrap();
        let xml = read_entry(&out, "content.xml");
        assert!(xml.contains("<text:p><text:span>Único.</text:span></text:p>"));
        assert!(xml.contains("antigo"));
        assert!(xml.contains("bookmark-start"));
    }

    #[test]
    fn test_custom_config_paragraph_layout() {
        let config = TemplateConfig::empty()
            .with_list("BM_GOALS", "goals", ListLayout::Paragraphs)
            .with_styles_part(None);
        let body = content(r#"<text:p text:style-name="G"><text:bookmark text:name="BM_GOALS"/></text:p>"#);
        let source = odt(&[("content.xml", body.as_slice())]);
        let context = Context::new().with("goals", vec!["a", "b"]);
        let out = TemplateEngine::new(config).render(&source, &context).unwrap();
        assert!(read_entry(&out, "content.xml").contains(concat!(
            r#"<text:p text:style-name="G"><text:span>a; e</text:span></text:p>"#,
            r#"<text:p text:style-name="G"><text:span>b.</text:span></text:p>"#
        )));
    }

    #[test]
    fn test_records_from_code() {
        let body = content(r#"<text:p><text:bookmark text:name="BM_DESCRICAO_ATIVIDADES"/></text:p>"#);
        let source = odt(&[("content.xml", body.as_slice())]);
        let context = Context::new().with(
            "descricao_processo_atividades",
            vec![ActivityRecord::new("A", "x"), ActivityRecord::new("B", "y")],
        );
        let (out, report) = TemplateEngine::default().render_with_report(&source, &context).unwrap();
        assert_eq!(report.activity_lists["BM_DESCRICAO_ATIVIDADES"], 1);
        let xml = read_entry(&out, "content.xml");
        assert!(xml.find("1. A").unwrap() < xml.find("2. B").unwrap());
    }

    #[test]
    fn test_missing_content_part() {
        let source = odt(&[("styles.xml", STYLES.as_bytes())]);
        let err = TemplateEngine::default().render(&source, &context()).unwrap_err();
        assert!(matches!(err, Error::MissingArchiveMember(_)));
    }

    #[test]
    fn test_malformed_part_aborts() {
        let source = odt(&[("content.xml", b"<office:document-content><text:p>")]);
        let err = TemplateEngine::default().render(&source, &context()).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_malformed_styles_part_aborts() {
        let body = content("<text:p/>");
        let source = odt(&[("content.xml", body.as_slice()), ("styles.xml", b"<a><b></a>")]);
        let err = TemplateEngine::default().render(&source, &context()).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_render_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("modelo.odt");
        let output_path = dir.path().join("POP.odt");
        fs::write(&template_path, template()).unwrap();

        let report = TemplateEngine::default()
            .render_to_file(&template_path, &context(), &output_path)
            .unwrap();
        assert!(report.total() > 0);

        let written = fs::read(&output_path).unwrap();
        assert!(read_entry(&written, "content.xml").contains("Gestão de Compras"));
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_failed_render_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("broken.odt");
        let output_path = dir.path().join("out.odt");
        fs::write(&template_path, b"not a zip").unwrap();

        assert!(TemplateEngine::default()
            .render_to_file(&template_path, &context(), &output_path)
            .is_err());
        assert!(!output_path.exists());
    }
}
