//! Render context: the values a template is filled with.
//!
//! A context maps names to one of three shapes (scalar text, a list of
//! strings, or a list of title/description records). It is normally the JSON
//! document written by the upstream metadata stage, but can be built in code.
//!
//! # Examples
//!
//! ```rust
//! use odfill::render::{Context, ContextValue};
//!
//! let context = Context::from_json_str(r#"{
//!     "nome_processo": "Gestão de Compras",
//!     "versao": 2,
//!     "objetivos_estrategicos": ["Reduzir custos", "Ampliar acesso"],
//!     "descricao_processo_atividades": [
//!         {"elemento": "Receber pedido", "descricao": "Confere o pedido."}
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(context.text("versao").as_deref(), Some("2"));
//! assert_eq!(context.list("objetivos_estrategicos").len(), 2);
//! assert_eq!(context.records("descricao_processo_atividades")[0].label, "Receber pedido");
//! ```

use crate::common::{Error, Result};
use crate::odf::template::ActivityRecord;
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::collections::HashMap;
use std::path::Path;

/// One context value
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawValue")]
pub enum ContextValue {
    Text(String),
    List(Vec<String>),
    Records(Vec<ActivityRecord>),
}

impl ContextValue {
    /// The value as scalar text. Lists are joined with `", "`, records
    /// contribute their labels.
    pub fn as_text(&self) -> String {
        match self {
            ContextValue::Text(text) => text.clone(),
            ContextValue::List(items) => items.join(", "),
            ContextValue::Records(records) => records
                .iter()
                .map(|r| r.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// The value as a list of strings; a scalar is a one-item list.
    pub fn as_list(&self) -> Vec<String> {
        match self {
            ContextValue::Text(text) => vec![text.clone()],
            ContextValue::List(items) => items.clone(),
            ContextValue::Records(records) => records.iter().map(|r| r.label.clone()).collect(),
        }
    }

    /// The value as records; only a record list has any.
    pub fn as_records(&self) -> &[ActivityRecord] {
        match self {
            ContextValue::Records(records) => records,
            _ => &[],
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Text(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Text(value)
    }
}

impl From<Vec<String>> for ContextValue {
    fn from(value: Vec<String>) -> Self {
        ContextValue::List(value)
    }
}

impl From<Vec<&str>> for ContextValue {
    fn from(value: Vec<&str>) -> Self {
        ContextValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<ActivityRecord>> for ContextValue {
    fn from(value: Vec<ActivityRecord>) -> Self {
        ContextValue::Records(value)
    }
}

/// Named values for one render. Unknown names are ignored by the engine;
/// missing names read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: HashMap<String, ContextValue>,
}

impl Context {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_slice(json: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(json)?)
    }

    /// Read and parse a JSON context file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::InvalidContext(format!("{}: {e}", path.as_ref().display())))
    }

    /// Set `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder form of [`Context::insert`].
    #[inline]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Scalar text for `key`, None when absent
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(ContextValue::as_text)
    }

    /// Text of the first key in `keys` that is present, or empty.
    ///
    /// A present key wins even when its value is empty.
    pub fn first_text<S: AsRef<str>>(&self, keys: &[S]) -> String {
        keys.iter()
            .find_map(|k| self.text(k.as_ref()))
            .unwrap_or_default()
    }

    /// `key` read as a list; absent keys give an empty list
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key).map(ContextValue::as_list).unwrap_or_default()
    }

    /// `key` read as records; absent keys and non-record values give none
    pub fn records(&self, key: &str) -> &[ActivityRecord] {
        self.get(key).map(ContextValue::as_records).unwrap_or(&[])
    }
}

impl<K: Into<String>, V: Into<ContextValue>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Context::new();
        for (k, v) in iter {
            context.insert(k, v);
        }
        context
    }
}

// Wire shapes accepted from JSON. Variant order matters for untagged
// matching: an empty array is a list, not a record set. Any other shape
// (objects, mixed arrays) loads as empty text.

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Scalar(RawScalar),
    List(Vec<RawScalar>),
    Records(Vec<RawRecord>),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl From<RawScalar> for String {
    fn from(value: RawScalar) -> Self {
        match value {
            RawScalar::Null => String::new(),
            RawScalar::Bool(b) => b.to_string(),
            RawScalar::Number(n) => n.to_string(),
            RawScalar::Text(s) => s,
        }
    }
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(alias = "elemento", default)]
    label: Option<String>,
    #[serde(alias = "descricao", default)]
    description: Option<String>,
}

impl From<RawValue> for ContextValue {
    fn from(value: RawValue) -> Self {
        match value {
            RawValue::Scalar(scalar) => ContextValue::Text(scalar.into()),
            RawValue::List(items) => ContextValue::List(items.into_iter().map(String::from).collect()),
            RawValue::Records(records) => ContextValue::Records(
                records
                    .into_iter()
                    .map(|r| ActivityRecord::new(r.label.unwrap_or_default(), r.description.unwrap_or_default()))
                    .collect(),
            ),
            RawValue::Other(_) => ContextValue::Text(String::new()),
        }
    }
}
