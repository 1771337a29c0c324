//! Template bindings: which context keys feed which placeholders.
//!
//! A [`TemplateConfig`] lists every placeholder the engine fills and the
//! context key(s) its value comes from. [`TemplateConfig::default`] is the
//! binding set of the standard operating-procedure (POP) template; other
//! templates describe theirs in YAML:
//!
//! ```yaml
//! fields:
//!   - field: DOC_TITLE
//!     keys: [title]
//!   - field: DOC_APPROVER
//!     keys: [approver]
//!     cleanup: remove_empty
//! lists:
//!   - marker: BM_GOALS
//!     key: goals
//!     layout: paragraphs
//! table_of_contents:
//!   marker: BM_TOC
//!   title: Contents
//! ```
//!
//! Tables omitted from a YAML file are empty.

use crate::common::{Error, Result};
use crate::odf::constants::{CONTENT_XML, STYLES_XML};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What happens to a field reference whose value is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCleanup {
    /// Replace with an empty span like any other value
    #[default]
    None,
    /// Remove the reference, and its paragraph if nothing else is left
    RemoveEmpty,
    /// As `RemoveEmpty`, also removing a line break right before the reference
    TrimPrecedingBreak,
}

/// A user field filled from the first present context key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBinding {
    pub field: String,
    pub keys: Vec<String>,
    #[serde(default)]
    pub cleanup: FieldCleanup,
}

/// How a punctuated list is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListLayout {
    /// One paragraph, items separated by line breaks
    #[default]
    Inline,
    /// One paragraph per item
    Paragraphs,
}

/// A marker replaced by a semicolon-punctuated list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBinding {
    pub marker: String,
    pub key: String,
    #[serde(default)]
    pub layout: ListLayout,
}

/// A marker replaced by a bulleted `text:list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletListBinding {
    pub marker: String,
    pub key: String,
    /// List style applied to the generated `text:list`
    #[serde(default)]
    pub list_style: Option<String>,
}

/// A marker replaced by numbered title/description pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityListBinding {
    pub marker: String,
    pub key: String,
    /// Paragraph style of the description blocks
    #[serde(default = "default_description_style")]
    pub description_style: String,
}

/// A marker replaced by a generated table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocBinding {
    pub marker: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_outline_levels")]
    pub outline_levels: u8,
    #[serde(default = "default_protect")]
    pub protect: bool,
}

impl TocBinding {
    pub fn new(marker: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            title: title.into(),
            outline_levels: default_outline_levels(),
            protect: default_protect(),
        }
    }

    #[inline]
    pub fn with_outline_levels(mut self, levels: u8) -> Self {
        self.outline_levels = levels;
        self
    }

    #[inline]
    pub fn with_protect(mut self, protect: bool) -> Self {
        self.protect = protect;
        self
    }
}

fn default_description_style() -> String {
    "Text_20_body".to_string()
}

fn default_outline_levels() -> u8 {
    3
}

fn default_protect() -> bool {
    true
}

fn default_content_part() -> String {
    CONTENT_XML.to_string()
}

fn default_styles_part() -> Option<String> {
    Some(STYLES_XML.to_string())
}

/// Complete binding set for one template family.
///
/// # Examples
///
/// ```rust
/// use odfill::render::{FieldCleanup, ListLayout, TemplateConfig, TocBinding};
///
/// let config = TemplateConfig::empty()
///     .with_field("DOC_TITLE", ["title"], FieldCleanup::None)
///     .with_list("BM_GOALS", "goals", ListLayout::Paragraphs)
///     .with_table_of_contents(TocBinding::new("BM_TOC", "Contents"));
/// assert_eq!(config.fields.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default)]
    pub fields: Vec<FieldBinding>,
    #[serde(default)]
    pub lists: Vec<ListBinding>,
    #[serde(default)]
    pub bullet_lists: Vec<BulletListBinding>,
    #[serde(default)]
    pub activity_lists: Vec<ActivityListBinding>,
    #[serde(default)]
    pub table_of_contents: Option<TocBinding>,
    /// Required document part
    #[serde(default = "default_content_part")]
    pub content_part: String,
    /// Optional second part (headers and footers); skipped when absent
    #[serde(default = "default_styles_part")]
    pub styles_part: Option<String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self::pop()
    }
}

impl TemplateConfig {
    /// No bindings; standard part names.
    pub fn empty() -> Self {
        Self {
            fields: Vec::new(),
            lists: Vec::new(),
            bullet_lists: Vec::new(),
            activity_lists: Vec::new(),
            table_of_contents: None,
            content_part: default_content_part(),
            styles_part: default_styles_part(),
        }
    }

    /// Bindings of the standard operating-procedure template.
    pub fn pop() -> Self {
        use FieldCleanup::{None as Keep, RemoveEmpty, TrimPrecedingBreak};

        Self::empty()
            .with_field("POP_NOME_PROCESSO", ["nome_processo"], Keep)
            .with_field("POP_CODIGO", ["codigo"], Keep)
            .with_field("POP_VERSAO", ["versao"], Keep)
            .with_field("POP_SETOR_SUPERIOR", ["POP_SETOR_SUPERIOR", "setor_superior"], Keep)
            .with_field("POP_SETOR_EXECUTOR", ["POP_SETOR_EXECUTOR", "setor_executor"], Keep)
            .with_field("NVL_GERENCIAL", ["NVL_GERENCIAL"], Keep)
            .with_field("NVL_OPERACIONAL", ["NVL_OPERACIONAL"], Keep)
            .with_field("EORG_SUP", ["EORG_SUP"], TrimPrecedingBreak)
            .with_field("EORG_EXEC", ["EORG_EXEC"], TrimPrecedingBreak)
            .with_field("POP_ELABORADOR", ["rodape_elaborador"], RemoveEmpty)
            .with_field("POP_APROVACAO_DATA", ["aprovacao_data"], RemoveEmpty)
            .with_field("POP_APROVACAO_RESPONSAVEL", ["aprovacao_responsavel"], RemoveEmpty)
            .with_field("POP_APROVACAO_SETOR", ["aprovacao_setor"], RemoveEmpty)
            .with_list("BM_OE_LIST", "objetivos_estrategicos", ListLayout::Inline)
            .with_list("BM_IE_LIST", "indicadores_estrategicos", ListLayout::Inline)
            .with_bullet_list("BM_PALAVRAS_CHAVE", "palavras_chave", None)
            .with_activity_list(
                "BM_DESCRICAO_ATIVIDADES",
                "descricao_processo_atividades",
                default_description_style(),
            )
            .with_table_of_contents(TocBinding::new("BM_SUMARIO", "Sumário"))
    }

    /// Parse a YAML binding file's contents.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_saphyr::from_str(yaml).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML binding file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&yaml)
    }

    /// Render the bindings as YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_saphyr::to_string(self).map_err(|e| Error::InvalidConfig(format!("Failed to serialize config to YAML: {e}")))
    }

    /// Reject bindings that can never match anything.
    pub fn validate(&self) -> Result<()> {
        if self.content_part.is_empty() {
            return Err(Error::InvalidConfig("content_part must not be empty".to_string()));
        }
        for binding in &self.fields {
            if binding.field.is_empty() {
                return Err(Error::InvalidConfig("field binding with an empty field name".to_string()));
            }
            if binding.keys.is_empty() {
                return Err(Error::InvalidConfig(format!("field {} has no context keys", binding.field)));
            }
        }
        let markers = self
            .lists
            .iter()
            .map(|b| &b.marker)
            .chain(self.bullet_lists.iter().map(|b| &b.marker))
            .chain(self.activity_lists.iter().map(|b| &b.marker))
            .chain(self.table_of_contents.iter().map(|b| &b.marker));
        for marker in markers {
            if marker.is_empty() {
                return Err(Error::InvalidConfig("binding with an empty marker name".to_string()));
            }
        }
        Ok(())
    }

    /// Add a field binding.
    pub fn with_field<I, S>(mut self, field: impl Into<String>, keys: I, cleanup: FieldCleanup) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.push(FieldBinding {
            field: field.into(),
            keys: keys.into_iter().map(Into::into).collect(),
            cleanup,
        });
        self
    }

    /// Add a punctuated list binding.
    pub fn with_list(mut self, marker: impl Into<String>, key: impl Into<String>, layout: ListLayout) -> Self {
        self.lists.push(ListBinding {
            marker: marker.into(),
            key: key.into(),
            layout,
        });
        self
    }

    /// Add a bulleted list binding.
    pub fn with_bullet_list(
        mut self,
        marker: impl Into<String>,
        key: impl Into<String>,
        list_style: Option<String>,
    ) -> Self {
        self.bullet_lists.push(BulletListBinding {
            marker: marker.into(),
            key: key.into(),
            list_style,
        });
        self
    }

    /// Add a numbered activity list binding.
    pub fn with_activity_list(
        mut self,
        marker: impl Into<String>,
        key: impl Into<String>,
        description_style: impl Into<String>,
    ) -> Self {
        self.activity_lists.push(ActivityListBinding {
            marker: marker.into(),
            key: key.into(),
            description_style: description_style.into(),
        });
        self
    }

    #[inline]
    pub fn with_table_of_contents(mut self, toc: TocBinding) -> Self {
        self.table_of_contents = Some(toc);
        self
    }

    #[inline]
    pub fn without_table_of_contents(mut self) -> Self {
        self.table_of_contents = None;
        self
    }

    #[inline]
    pub fn with_content_part(mut self, part: impl Into<String>) -> Self {
        self.content_part = part.into();
        self
    }

    /// Set the optional second part, or None to process the content part only.
    #[inline]
    pub fn with_styles_part(mut self, part: Option<String>) -> Self {
        self.styles_part = part;
        self
    }
}
