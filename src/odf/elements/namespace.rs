//! Namespace handling for ODF XML trees.
//!
//! Elements and attributes are matched by `(namespace URI, local name)`, never
//! by the prefix a particular document happens to use. New elements borrow the
//! prefix the document already declares and fall back to the conventional one.
//!
//! # References
//!
//! - odfpy: `3rdparty/odfpy/odf/namespaces.py`

use phf::{Map, phf_map};

/// Office namespace
pub const OFFICENS: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";

/// Style namespace
pub const STYLENS: &str = "urn:oasis:names:tc:opendocument:xmlns:style:1.0";

/// Text namespace
pub const TEXTNS: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";

/// Table namespace
pub const TABLENS: &str = "urn:oasis:names:tc:opendocument:xmlns:table:1.0";

/// XSL-FO compatible namespace
pub const FONS: &str = "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0";

/// XML namespace (bound to the `xml` prefix without declaration)
pub const XMLNS: &str = "http://www.w3.org/XML/1998/namespace";

/// Conventional prefixes for the namespaces the engine creates elements in
static CONVENTIONAL_PREFIXES: Map<&'static str, &'static str> = phf_map! {
    "urn:oasis:names:tc:opendocument:xmlns:office:1.0" => "office",
    "urn:oasis:names:tc:opendocument:xmlns:style:1.0" => "style",
    "urn:oasis:names:tc:opendocument:xmlns:text:1.0" => "text",
    "urn:oasis:names:tc:opendocument:xmlns:table:1.0" => "table",
    "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" => "fo",
};

/// Conventional prefix for a namespace URI, if the engine knows one.
pub fn conventional_prefix(uri: &str) -> Option<&'static str> {
    CONVENTIONAL_PREFIXES.get(uri).copied()
}

/// A name resolved against the in-scope namespace declarations.
///
/// `prefix` is kept so serialization writes the name exactly as it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub prefix: Option<String>,
    pub local_name: String,
    pub namespace_uri: Option<String>,
}

impl QualifiedName {
    /// Create a qualified name from its parts
    pub fn new(prefix: Option<&str>, local_name: &str, namespace_uri: Option<&str>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            local_name: local_name.to_string(),
            namespace_uri: namespace_uri.map(str::to_string),
        }
    }

    /// Whether this name is `local_name` in namespace `uri`
    #[inline]
    pub fn is(&self, uri: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace_uri.as_deref() == Some(uri)
    }

    /// The name as written in the document (`prefix:local` or `local`)
    pub fn raw(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }
}

/// Split a raw `prefix:local` name.
#[inline]
pub fn split_name(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, raw),
    }
}

/// Stack of namespace scopes, one frame per open element.
#[derive(Debug, Default)]
pub struct NamespaceScope {
    frames: Vec<Vec<(Option<String>, String)>>,
}

impl NamespaceScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a scope carrying the given `(prefix, uri)` declarations
    pub fn push(&mut self, declarations: Vec<(Option<String>, String)>) {
        self.frames.push(declarations);
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Resolve a prefix (None for the default namespace) to its URI
    pub fn resolve(&self, prefix: Option<&str>) -> Option<&str> {
        if prefix == Some("xml") {
            return Some(XMLNS);
        }
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter().rev())
            .find(|(p, _)| p.as_deref() == prefix)
            .map(|(_, uri)| uri.as_str())
            .filter(|uri| !uri.is_empty())
    }

    /// Resolve an element name; unprefixed names take the default namespace
    pub fn element_name(&self, raw: &str) -> QualifiedName {
        let (prefix, local) = split_name(raw);
        QualifiedName::new(prefix, local, self.resolve(prefix))
    }

    /// Resolve an attribute name; unprefixed attributes have no namespace
    pub fn attribute_name(&self, raw: &str) -> QualifiedName {
        let (prefix, local) = split_name(raw);
        let uri = prefix.and_then(|p| self.resolve(Some(p)));
        QualifiedName::new(prefix, local, uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventional_prefixes() {
        assert_eq!(conventional_prefix(TEXTNS), Some("text"));
        assert_eq!(conventional_prefix(STYLENS), Some("style"));
        assert_eq!(conventional_prefix("urn:unknown"), None);
    }

    #[test]
    fn test_scope_resolution_shadows_outer_declarations() {
        let mut scope = NamespaceScope::new();
        scope.push(vec![(Some("t".to_string()), TEXTNS.to_string())]);
        scope.push(vec![(Some("t".to_string()), TABLENS.to_string())]);
        assert_eq!(scope.resolve(Some("t")), Some(TABLENS));
        scope.pop();
        assert_eq!(scope.resolve(Some("t")), Some(TEXTNS));
    }

    #[test]
    fn test_attributes_ignore_default_namespace() {
        let mut scope = NamespaceScope::new();
        scope.push(vec![(None, OFFICENS.to_string())]);
        let element = scope.element_name("document");
        let attr = scope.attribute_name("version");
        assert!(element.is(OFFICENS, "document"));
        assert_eq!(attr.namespace_uri, None);
    }

    #[test]
    fn test_raw_name_round_trip() {
        let name = QualifiedName::new(Some("text"), "p", Some(TEXTNS));
        assert_eq!(name.raw(), "text:p");
        assert!(name.is(TEXTNS, "p"));
        assert!(!name.is(TEXTNS, "h"));
    }
}
