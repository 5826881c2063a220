//! Read-only query interface over a rendered document tree.
//!
//! The extractors never touch a concrete DOM. They are written against [`DocumentTree`],
//! which a live rendering layer, a captured [`Snapshot`], or a hand-built test fixture can
//! all satisfy. Predicates are expressed as [`Selector`]s, a small CSS-like language covering
//! tag names, attribute presence/equality/substring tests and the descendant combinator.
//!
//! # Consistency
//!
//! Implementations only need to be consistent for the duration of one extraction call. If
//! the host application re-renders the tree while a call is traversing it, the result is
//! whatever mix of old and new nodes the traversal observed; the extractors do not guard
//! against that race. Callers of a live tree should run extraction within a single
//! rendering frame.

use std::collections::BTreeMap;

pub mod selector;
pub mod snapshot;

pub use selector::Selector;
pub use snapshot::{NodeId, Snapshot, SnapshotChild, SnapshotElement};

/// A queryable tree of element nodes.
///
/// Only elements are exposed as nodes. Text is reachable through [`text_content`] and
/// [`inner_html`].
///
/// [`text_content`]: DocumentTree::text_content
/// [`inner_html`]: DocumentTree::inner_html
pub trait DocumentTree {
    /// Cheap handle to an element in the tree
    type Node: Copy + Eq;

    /// Lowercase tag name of the element
    fn tag_name(&self, node: Self::Node) -> &str;

    /// Value of a single attribute, if present
    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    /// All attributes of the element
    fn attributes(&self, node: Self::Node) -> BTreeMap<String, String>;

    /// Parent element, `None` for the document root
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Element children in document order
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Concatenated text of every descendant text node, in document order
    fn text_content(&self, node: Self::Node) -> String;

    /// Serialized markup of the element's children
    fn inner_html(&self, node: Self::Node) -> String;

    /// Whether `node` itself matches `selector`
    fn matches(&self, node: Self::Node, selector: &Selector) -> bool {
        selector.matches(self, node)
    }

    /// Every strict descendant of `node` matching `selector`, in document order
    fn descendants(&self, node: Self::Node, selector: &Selector) -> Vec<Self::Node> {
        let mut found = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(node).into_iter().rev().collect();

        while let Some(current) = stack.pop() {
            if selector.matches(self, current) {
                found.push(current);
            }
            stack.extend(self.children(current).into_iter().rev());
        }

        found
    }

    /// First strict descendant of `node` matching `selector`, in document order
    fn first_descendant(&self, node: Self::Node, selector: &Selector) -> Option<Self::Node> {
        let mut stack: Vec<Self::Node> = self.children(node).into_iter().rev().collect();

        while let Some(current) = stack.pop() {
            if selector.matches(self, current) {
                return Some(current);
            }
            stack.extend(self.children(current).into_iter().rev());
        }

        None
    }
}
