//! In-memory document tree.
//!
//! A [`Snapshot`] is an immutable arena of elements captured from a rendered page. It can be
//! built from saved HTML, from a JSON node dump produced by a page-side serializer, or by
//! hand with [`SnapshotElement`] for fixtures.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};

use super::DocumentTree;

/// Elements serialized without an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Deepest element nesting accepted from a JSON node dump
pub const MAX_NESTING_DEPTH: usize = 256;

/// Handle to an element inside a [`Snapshot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum Content {
    Element(NodeId),
    Text(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
    parent: Option<NodeId>,
    content: Vec<Content>,
}

/// Nested element description, the JSON dump format and the fixture builder
///
/// ```json
/// {"tag": "span", "attrs": {"role": "listitem"}, "children": ["Unread", {"tag": "b"}]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotElement {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<SnapshotChild>,
}

/// Child of a [`SnapshotElement`]: bare strings are text nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotChild {
    Text(String),
    Element(SnapshotElement),
}

impl SnapshotElement {
    pub fn new(tag: &str) -> Self {
        Self { tag: tag.to_string(), attrs: BTreeMap::new(), children: Vec::new() }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.children.push(SnapshotChild::Text(text.to_string()));
        self
    }

    pub fn child(mut self, child: SnapshotElement) -> Self {
        self.children.push(SnapshotChild::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = SnapshotElement>) -> Self {
        self.children.extend(children.into_iter().map(SnapshotChild::Element));
        self
    }
}

/// Immutable arena-backed element tree
#[derive(Debug, Clone)]
pub struct Snapshot {
    elements: Vec<ElementData>,
    root: NodeId,
}

impl Snapshot {
    /// Build a snapshot from a nested element description
    pub fn from_element(root: SnapshotElement) -> Self {
        let mut snapshot = Self { elements: Vec::new(), root: NodeId(0) };
        snapshot.root = snapshot.import_element(root);
        snapshot
    }

    /// Parse a JSON node dump (see [`SnapshotElement`])
    ///
    /// Real page dumps nest deeper than serde_json's default recursion limit, so that limit
    /// is replaced by [`MAX_NESTING_DEPTH`] elements, checked before deserializing.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON, for input that is not a node dump, and for dumps
    /// nesting elements deeper than [`MAX_NESTING_DEPTH`].
    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        // Every element level is an object plus its children array
        if json_nesting_depth(input) > 2 * MAX_NESTING_DEPTH + 1 {
            return Err(serde::de::Error::custom(format!(
                "snapshot nests elements deeper than {} levels",
                MAX_NESTING_DEPTH
            )));
        }

        let mut deserializer = serde_json::Deserializer::from_str(input);
        deserializer.disable_recursion_limit();
        let root = SnapshotElement::deserialize(&mut deserializer)?;
        deserializer.end()?;
        Ok(Self::from_element(root))
    }

    /// Parse an HTML document. The root is the `<html>` element; comments and
    /// processing instructions are dropped.
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut snapshot = Self { elements: Vec::new(), root: NodeId(0) };
        snapshot.root = snapshot.import_html(document.root_element());
        snapshot
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of elements in the tree
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn push(&mut self, tag: &str, attributes: Vec<(String, String)>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.elements.len());
        self.elements.push(ElementData {
            tag: tag.to_ascii_lowercase(),
            attributes,
            parent,
            content: Vec::new(),
        });
        if let Some(parent) = parent {
            self.elements[parent.0].content.push(Content::Element(id));
        }
        id
    }

    fn import_element(&mut self, root: SnapshotElement) -> NodeId {
        let SnapshotElement { tag, attrs, children } = root;
        let root = self.push(&tag, attrs.into_iter().collect(), None);

        let mut stack = vec![(children.into_iter(), root)];
        while let Some((children, parent)) = stack.last_mut() {
            let parent = *parent;
            match children.next() {
                Some(SnapshotChild::Text(text)) => {
                    self.elements[parent.0].content.push(Content::Text(text));
                }
                Some(SnapshotChild::Element(SnapshotElement { tag, attrs, children })) => {
                    let id = self.push(&tag, attrs.into_iter().collect(), Some(parent));
                    stack.push((children.into_iter(), id));
                }
                None => {
                    stack.pop();
                }
            }
        }

        root
    }

    fn import_html(&mut self, root: ElementRef<'_>) -> NodeId {
        let root_id = self.push(root.value().name(), html_attributes(root.value()), None);

        let mut stack = vec![(root.children(), root_id)];
        while let Some((children, parent)) = stack.last_mut() {
            let parent = *parent;
            let Some(child) = children.next() else {
                stack.pop();
                continue;
            };

            match child.value() {
                Node::Text(text) => {
                    self.elements[parent.0].content.push(Content::Text(text.to_string()));
                }
                Node::Element(element) => {
                    let id = self.push(element.name(), html_attributes(element), Some(parent));
                    stack.push((child.children(), id));
                }
                _ => {}
            }
        }

        root_id
    }

    fn data(&self, node: NodeId) -> &ElementData {
        &self.elements[node.0]
    }

    fn write_text(&self, node: NodeId, out: &mut String) {
        let mut stack = vec![self.data(node).content.iter()];
        while let Some(contents) = stack.last_mut() {
            match contents.next() {
                Some(Content::Text(text)) => out.push_str(text),
                Some(Content::Element(child)) => stack.push(self.data(*child).content.iter()),
                None => {
                    stack.pop();
                }
            }
        }
    }

    fn write_children_html(&self, node: NodeId, out: &mut String) {
        // Each frame carries the tag to close once its children are written
        let mut stack: Vec<(std::slice::Iter<'_, Content>, Option<&str>)> =
            vec![(self.data(node).content.iter(), None)];

        while let Some((contents, _)) = stack.last_mut() {
            match contents.next() {
                Some(Content::Text(text)) => out.push_str(&html_escape::encode_text(text)),
                Some(Content::Element(child)) => {
                    let data = self.data(*child);
                    write_start_tag(data, out);
                    if !VOID_ELEMENTS.contains(&data.tag.as_str()) {
                        stack.push((data.content.iter(), Some(data.tag.as_str())));
                    }
                }
                None => {
                    if let Some((_, Some(tag))) = stack.pop() {
                        out.push_str("</");
                        out.push_str(tag);
                        out.push('>');
                    }
                }
            }
        }
    }
}

fn html_attributes(element: &scraper::node::Element) -> Vec<(String, String)> {
    element.attrs().map(|(name, value)| (name.to_string(), value.to_string())).collect()
}

fn write_start_tag(data: &ElementData, out: &mut String) {
    out.push('<');
    out.push_str(&data.tag);
    for (name, value) in &data.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');
}

/// Deepest `{`/`[` nesting of a JSON document, ignoring brackets inside strings
fn json_nesting_depth(input: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    let mut in_string = false;
    let mut escaped = false;

    for byte in input.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}

impl DocumentTree for Snapshot {
    type Node = NodeId;

    fn tag_name(&self, node: NodeId) -> &str {
        &self.data(node).tag
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.data(node).attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    fn attributes(&self, node: NodeId) -> BTreeMap<String, String> {
        self.data(node).attributes.iter().cloned().collect()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.data(node)
            .content
            .iter()
            .filter_map(|content| match content {
                Content::Element(id) => Some(*id),
                Content::Text(_) => None,
            })
            .collect()
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_text(node, &mut out);
        out
    }

    fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_children_html(node, &mut out);
        out
    }
}
