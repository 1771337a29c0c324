//! Mutable arena-backed XML tree for one ODF part.
//!
//! Nodes live in a flat arena and are addressed by [`NodeId`]. Each node stores
//! its parent as an index, so ancestor walks are O(1) per step without any
//! reference cycles. Detaching a node only unlinks it; the slot stays in the
//! arena but is no longer reachable from the root and is never serialized.
//!
//! Text and attribute values are stored in their escaped form exactly as they
//! were read, so content the engine never touches serializes byte-for-byte.
//! Text created through [`XmlTree::create_text`] is escaped on the way in.

use super::namespace::{QualifiedName, conventional_prefix};
use crate::common::xml::{escape_attr, escape_text, unescape_xml};
use std::collections::HashMap;

/// Declaration header written in front of every serialized part
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Stable handle to a node inside one [`XmlTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// An attribute with its escaped value
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualifiedName,
    pub value: String,
}

/// Element payload: resolved tag plus attributes in document order
#[derive(Debug, Clone)]
pub struct ElementData {
    pub name: QualifiedName,
    pub attributes: Vec<Attribute>,
}

/// What a node holds
#[derive(Debug, Clone)]
pub enum NodeKind {
    Element(ElementData),
    /// Character data, escaped
    Text(String),
    /// Comment, CDATA section or processing instruction, written verbatim
    Raw(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory tree of one XML part
#[derive(Debug, Clone)]
pub struct XmlTree {
    nodes: Vec<Node>,
    root: NodeId,
    /// Namespace URI -> prefix bound to it (None for a default namespace)
    prefixes: HashMap<String, Option<String>>,
}

impl XmlTree {
    /// Create a tree holding only `root`.
    pub(crate) fn with_root(root: ElementData) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            prefixes: HashMap::new(),
        };
        tree.root = tree.alloc(NodeKind::Element(root));
        tree
    }

    /// Parse an XML part. See [`super::parser::parse`].
    pub fn parse(bytes: &[u8]) -> crate::common::Result<Self> {
        super::parser::parse(bytes)
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        if let NodeKind::Element(data) = &kind {
            self.remember_declarations(data);
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn remember_declarations(&mut self, data: &ElementData) {
        for attr in &data.attributes {
            let prefix = match (&attr.name.prefix, attr.name.local_name.as_str()) {
                (Some(p), local) if p == "xmlns" => Some(local.to_string()),
                (None, "xmlns") => None,
                _ => continue,
            };
            let uri = unescape_xml(&attr.value);
            self.prefixes.entry(uri).or_insert(prefix);
        }
    }

    /// The document element
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Element payload, or None for text and raw nodes
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Whether `id` is the element `local_name` in namespace `uri`
    pub fn is_element(&self, id: NodeId, uri: &str, local_name: &str) -> bool {
        self.element(id).is_some_and(|e| e.name.is(uri, local_name))
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Position of `id` among its parent's children
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Sibling immediately before `id`
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let index = self.index_in_parent(id)?;
        let parent = self.parent(id)?;
        index.checked_sub(1).map(|i| self.children(parent)[i])
    }

    /// All nodes below `id` in document order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Attached elements named `local_name` in `uri`, in document order
    pub fn find_elements(&self, uri: &str, local_name: &str) -> Vec<NodeId> {
        let root = self.root;
        std::iter::once(root)
            .chain(self.descendants(root))
            .filter(|&n| self.is_element(n, uri, local_name))
            .collect()
    }

    /// Escaped attribute value
    pub fn attribute_raw(&self, id: NodeId, uri: &str, local_name: &str) -> Option<&str> {
        self.element(id)?
            .attributes
            .iter()
            .find(|a| a.name.is(uri, local_name))
            .map(|a| a.value.as_str())
    }

    /// Unescaped attribute value
    pub fn attribute(&self, id: NodeId, uri: &str, local_name: &str) -> Option<String> {
        self.attribute_raw(id, uri, local_name).map(unescape_xml)
    }

    /// Set (or replace) an attribute. `value` is given unescaped.
    pub fn set_attribute(&mut self, id: NodeId, uri: &str, local_name: &str, value: &str) {
        let prefix = self.prefix_for(uri);
        let value = escape_attr(value);
        let Some(data) = self.element_mut(id) else {
            return;
        };
        if let Some(existing) = data.attributes.iter_mut().find(|a| a.name.is(uri, local_name)) {
            existing.value = value;
        } else {
            data.attributes.push(Attribute {
                name: QualifiedName::new(prefix.as_deref(), local_name, Some(uri)),
                value,
            });
        }
    }

    /// Copy the escaped value of one attribute from `from` onto `to`.
    pub fn copy_attribute(&mut self, from: NodeId, to: NodeId, uri: &str, local_name: &str) {
        if let Some(value) = self.attribute(from, uri, local_name) {
            self.set_attribute(to, uri, local_name, &value);
        }
    }

    /// Prefix bound to `uri`, declaring the conventional one on the root if needed.
    fn prefix_for(&mut self, uri: &str) -> Option<String> {
        if let Some(prefix) = self.prefixes.get(uri) {
            return prefix.clone();
        }
        let base = conventional_prefix(uri).unwrap_or("ns");
        let taken: Vec<&str> = self.prefixes.values().flatten().map(String::as_str).collect();
        let prefix = if taken.contains(&base) {
            (0..)
                .map(|i| format!("{base}{i}"))
                .find(|p| !taken.contains(&p.as_str()))
                .unwrap_or_else(|| base.to_string())
        } else {
            base.to_string()
        };

        let root = self.root;
        if let Some(data) = self.element_mut(root) {
            data.attributes.push(Attribute {
                name: QualifiedName::new(Some("xmlns"), &prefix, None),
                value: escape_attr(uri),
            });
        }
        self.prefixes.insert(uri.to_string(), Some(prefix.clone()));
        Some(prefix)
    }

    /// Create a detached element in namespace `uri`
    pub fn create_element(&mut self, uri: &str, local_name: &str) -> NodeId {
        let prefix = self.prefix_for(uri);
        self.alloc(NodeKind::Element(ElementData {
            name: QualifiedName::new(prefix.as_deref(), local_name, Some(uri)),
            attributes: Vec::new(),
        }))
    }

    /// Create a detached text node; `text` is escaped here
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(escape_text(text)))
    }

    /// Create a detached node from already-parsed parts.
    pub(crate) fn create_node(&mut self, kind: NodeKind) -> NodeId {
        self.alloc(kind)
    }

    /// Unlink `id` from its parent. No-op for detached nodes and the root.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Insert `child` at `index` under `parent` (clamped to the child count).
    ///
    /// A child that is already attached elsewhere is moved.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let len = self.children(parent).len();
        self.insert_child(parent, len, child);
    }

    /// Replace `old` with `new` at the same position. Returns false when
    /// `old` has no parent.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> bool {
        let (Some(parent), Some(index)) = (self.parent(old), self.index_in_parent(old)) else {
            return false;
        };
        self.detach(old);
        self.insert_child(parent, index, new);
        true
    }

    /// Append escaped text to the last child of `parent`, merging with a
    /// trailing text node when there is one.
    pub(crate) fn push_raw_text(&mut self, parent: NodeId, raw: &str) {
        let last = self.children(parent).last().copied();
        if let Some(last) = last
            && let NodeKind::Text(existing) = &mut self.nodes[last.0].kind
        {
            existing.push_str(raw);
            return;
        }
        let text = self.alloc(NodeKind::Text(raw.to_string()));
        self.append_child(parent, text);
    }

    /// Unescaped concatenation of all text below `id`
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let NodeKind::Text(t) = self.kind(id) {
            out.push_str(t);
        }
        for node in self.descendants(id) {
            if let NodeKind::Text(t) = self.kind(node) {
                out.push_str(t);
            }
        }
        unescape_xml(&out)
    }

    /// Serialize the attached tree with the fixed declaration header.
    ///
    /// Output depends only on the tree: attributes keep their order, text keeps
    /// its whitespace, and childless elements are written self-closing.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = String::with_capacity(XML_DECLARATION.len() + self.estimated_len(self.root));
        out.push_str(XML_DECLARATION);
        self.write_node(self.root, &mut out);
        out.into_bytes()
    }

    /// Serialize one subtree without the declaration header
    pub fn to_xml_string(&self, id: NodeId) -> String {
        let mut out = String::with_capacity(self.estimated_len(id));
        self.write_node(id, &mut out);
        out
    }

    fn estimated_len(&self, id: NodeId) -> usize {
        let own = match self.kind(id) {
            NodeKind::Element(data) => {
                let name = data.name.local_name.len() + 8;
                let attrs: usize = data
                    .attributes
                    .iter()
                    .map(|a| a.name.local_name.len() + a.value.len() + 12)
                    .sum();
                name * 2 + attrs + 5
            },
            NodeKind::Text(t) | NodeKind::Raw(t) => t.len(),
        };
        own + self
            .children(id)
            .iter()
            .map(|&c| self.estimated_len(c))
            .sum::<usize>()
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Text(t) | NodeKind::Raw(t) => out.push_str(t),
            NodeKind::Element(data) => {
                let tag = data.name.raw();
                out.push('<');
                out.push_str(&tag);
                for attr in &data.attributes {
                    out.push(' ');
                    out.push_str(&attr.name.raw());
                    out.push_str("=\"");
                    out.push_str(&attr.value);
                    out.push('"');
                }

                let children = self.children(id);
                if children.is_empty() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for &child in children {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&tag);
                out.push('>');
            },
        }
    }
}
