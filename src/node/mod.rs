//! The `Node` handle.
//!
//! A [`Node`] points at one node of a shared, immutable [`Document`] and
//! carries two pieces of traversal state alongside it:
//!
//! - `depth`, the position relative to the root of the parse or traversal
//!   that produced the handle (the document node is 0, moving to a child adds
//!   one, moving to the parent subtracts one, sibling moves keep it)
//! - `matched`, a snapshot of the handle that last satisfied a predicate of
//!   the active filter chain, which itself carries its own `matched`
//!
//! A handle may also be empty. Every method is total on the empty handle:
//! navigation yields other empty handles, encoders yield `""` and attribute
//! lookups find nothing. This makes long navigation chains safe to write
//! without checking each step.
//!
//! Handles are immutable; every navigation method returns a new one.
//!
//! # Filtered navigation
//!
//! The navigation methods take a filter chain (see [`crate::filter`]). A
//! candidate node is accepted when a find-mode search of its sub-tree, the
//! candidate included, succeeds. An empty chain accepts every node.
//!
//! ```
//! use htmlsift::{Node, NIL};
//!
//! let ul = htmlsift::parse(
//!     "<ul><li>a</li><li class=x>b</li><li>c</li></ul>".as_bytes(),
//!     &[&|n: &Node| n.tag() == "ul"],
//! )
//! .unwrap();
//!
//! let x = ul.first_child(&[&|n: &Node| n.has_class("x")]);
//! assert_eq!(x.outer_text(), "b");
//! assert_eq!(x.sibling_index(&[&NIL]), 1);
//! assert_eq!(x.next_sibling(&[]).outer_html(), "<li>c</li>");
//! assert!(x.next_sibling(&[]).next_sibling(&[]).is_empty());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::filter::{self, Predicate};
use crate::serial::{encode_html, encode_text, encode_words};
use crate::tree::{Attribute, Document, NodeId, NodeType};
use crate::util::attr;

#[derive(Clone)]
struct NodeRef {
    doc: Arc<Document>,
    id: NodeId,
}

/// A handle to a node of a parsed document, with traversal metadata.
///
/// The default value is the empty handle.
#[derive(Clone, Default)]
pub struct Node {
    data: Option<NodeRef>,
    depth: i32,
    matched: Option<Arc<Node>>,
}

impl Node {
    /// Creates a handle to `id` with depth 0 and no match.
    ///
    /// Returns the empty handle if `id` does not belong to `doc`.
    #[must_use]
    pub fn new(doc: Arc<Document>, id: NodeId) -> Self {
        if !doc.contains(id) {
            return Self::default();
        }
        Self {
            data: Some(NodeRef { doc, id }),
            depth: 0,
            matched: None,
        }
    }

    /// Creates a handle to the document node.
    #[must_use]
    pub fn root(doc: Arc<Document>) -> Self {
        let id = doc.root();
        Self::new(doc, id)
    }

    /// Returns true if this handle points at no node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    #[must_use]
    pub fn id(&self) -> Option<NodeId> {
        self.data.as_ref().map(|r| r.id)
    }

    /// Returns the document this handle points into.
    #[must_use]
    pub fn document(&self) -> Option<&Arc<Document>> {
        self.data.as_ref().map(|r| &r.doc)
    }

    #[must_use]
    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Returns the handle that last satisfied a predicate on the way to this
    /// one, if any.
    #[must_use]
    pub fn matched(&self) -> Option<&Node> {
        self.matched.as_deref()
    }

    /// Returns how many levels this handle sits below its match, or 0 when
    /// there is no match.
    #[must_use]
    pub fn offset(&self) -> i32 {
        match &self.matched {
            Some(matched) => self.depth - matched.depth,
            None => 0,
        }
    }

    /// Alias for [`Node::offset`].
    #[must_use]
    pub fn match_depth(&self) -> i32 {
        self.offset()
    }

    /// Returns true if both handles point at the same node of the same
    /// document, regardless of depth and match. Two empty handles are not
    /// the same node.
    #[must_use]
    pub fn same_node(&self, other: &Node) -> bool {
        match (&self.data, &other.data) {
            (Some(a), Some(b)) => a.id == b.id && Arc::ptr_eq(&a.doc, &b.doc),
            _ => false,
        }
    }

    /// Returns a copy of this handle recorded as its own match.
    pub(crate) fn with_match(&self) -> Node {
        Node {
            matched: Some(Arc::new(self.clone())),
            ..self.clone()
        }
    }

    /// Returns a copy of this handle with its match cleared.
    pub(crate) fn without_match(&self) -> Node {
        Node {
            data: self.data.clone(),
            depth: self.depth,
            matched: None,
        }
    }

    fn step(&self, next: impl FnOnce(&Document, NodeId) -> Option<NodeId>, depth_delta: i32) -> Node {
        let data = self.data.as_ref().and_then(|r| {
            next(&r.doc, r.id).map(|id| NodeRef {
                doc: Arc::clone(&r.doc),
                id,
            })
        });
        Node {
            data,
            depth: self.depth + depth_delta,
            matched: self.matched.clone(),
        }
    }

    pub(crate) fn step_first_child(&self) -> Node {
        self.step(Document::first_child, 1)
    }

    pub(crate) fn step_next_sibling(&self) -> Node {
        self.step(Document::next_sibling, 0)
    }

    fn accepts(&self, filters: &[&dyn Predicate]) -> bool {
        filter::is_empty_chain(filters) || filter::find_node(self, filters).is_some()
    }

    // --- Traversal ---

    /// See [`filter::filter_nodes`].
    #[must_use]
    pub fn filter_nodes(&self, filters: &[&dyn Predicate]) -> Vec<Node> {
        filter::filter_nodes(self, filters)
    }

    /// See [`filter::find_node`].
    #[must_use]
    pub fn find_node(&self, filters: &[&dyn Predicate]) -> Option<Node> {
        filter::find_node(self, filters)
    }

    /// See [`filter::get_node`].
    #[must_use]
    pub fn get_node(&self, filters: &[&dyn Predicate]) -> Node {
        filter::get_node(self, filters)
    }

    // --- Navigation ---

    /// Returns the nearest ancestor accepted by `filters`. The depth drops by
    /// one per level climbed, even when no ancestor is accepted.
    #[must_use]
    pub fn parent(&self, filters: &[&dyn Predicate]) -> Node {
        let mut node = self.step(Document::parent, -1);
        while !node.is_empty() && !node.accepts(filters) {
            node = node.step(Document::parent, -1);
        }
        node
    }

    /// Returns the leftmost child accepted by `filters`.
    #[must_use]
    pub fn first_child(&self, filters: &[&dyn Predicate]) -> Node {
        let node = self.step_first_child();
        if node.is_empty() || node.accepts(filters) {
            node
        } else {
            node.next_sibling(filters)
        }
    }

    /// Returns the rightmost child accepted by `filters`.
    #[must_use]
    pub fn last_child(&self, filters: &[&dyn Predicate]) -> Node {
        let node = self.step(Document::last_child, 1);
        if node.is_empty() || node.accepts(filters) {
            node
        } else {
            node.prev_sibling(filters)
        }
    }

    /// Returns the nearest following sibling accepted by `filters`.
    #[must_use]
    pub fn next_sibling(&self, filters: &[&dyn Predicate]) -> Node {
        let mut node = self.step_next_sibling();
        while !node.is_empty() && !node.accepts(filters) {
            node = node.step_next_sibling();
        }
        node
    }

    /// Returns the nearest preceding sibling accepted by `filters`.
    #[must_use]
    pub fn prev_sibling(&self, filters: &[&dyn Predicate]) -> Node {
        let mut node = self.step(Document::prev_sibling, 0);
        while !node.is_empty() && !node.accepts(filters) {
            node = node.step(Document::prev_sibling, 0);
        }
        node
    }

    /// Calls `f` with the (filtered) index and handle of each child accepted
    /// by `filters`, in order, until it returns false.
    pub fn range<F>(&self, mut f: F, filters: &[&dyn Predicate])
    where
        F: FnMut(usize, &Node) -> bool,
    {
        let mut index = 0;
        let mut child = self.first_child(filters);
        while !child.is_empty() {
            if !f(index, &child) {
                break;
            }
            index += 1;
            child = child.next_sibling(filters);
        }
    }

    /// Returns every child accepted by `filters`, in order.
    #[must_use]
    pub fn children(&self, filters: &[&dyn Predicate]) -> Vec<Node> {
        let mut children = Vec::new();
        self.range(
            |_, child| {
                children.push(child.clone());
                true
            },
            filters,
        );
        children
    }

    /// Returns the number of preceding siblings accepted by `filters`.
    #[must_use]
    pub fn sibling_index(&self, filters: &[&dyn Predicate]) -> usize {
        let mut count = 0;
        let mut node = self.prev_sibling(filters);
        while !node.is_empty() {
            count += 1;
            node = node.prev_sibling(filters);
        }
        count
    }

    /// Returns the number of siblings accepted by `filters`, plus one for
    /// this node whether or not it is accepted itself. An empty handle has
    /// no siblings and a length of 0.
    #[must_use]
    pub fn sibling_length(&self, filters: &[&dyn Predicate]) -> usize {
        if self.is_empty() {
            return 0;
        }
        let mut count = self.sibling_index(filters) + 1;
        let mut node = self.next_sibling(filters);
        while !node.is_empty() {
            count += 1;
            node = node.next_sibling(filters);
        }
        count
    }

    // --- Content ---

    /// Returns the attributes of an element, or an empty slice.
    #[must_use]
    pub fn attr(&self) -> &[Attribute] {
        match &self.data {
            Some(r) => r.doc.attributes(r.id),
            None => &[],
        }
    }

    /// See [`attr::get_attr`].
    #[must_use]
    pub fn get_attr(&self, namespace: &str, key: &str) -> Option<&Attribute> {
        attr::get_attr(namespace, key, self.attr())
    }

    /// See [`attr::get_attr_val`].
    #[must_use]
    pub fn get_attr_val(&self, namespace: &str, key: &str) -> &str {
        attr::get_attr_val(namespace, key, self.attr())
    }

    /// Returns the tag name of an element, or `""`.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.data.as_ref().map_or("", |r| r.doc.tag(r.id))
    }

    /// Returns the node type, or [`NodeType::Error`] for the empty handle.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.data
            .as_ref()
            .map_or(NodeType::Error, |r| r.doc.node_type(r.id))
    }

    /// Returns true if `name` is one of the `class` attribute's tokens.
    /// Matching is case-sensitive and an empty name never matches.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        !name.is_empty() && self.classes().contains(&name)
    }

    /// Returns the tokens of the `class` attribute, in order.
    #[must_use]
    pub fn classes(&self) -> Vec<&str> {
        attr::class_tokens(self.get_attr_val("", "class")).collect()
    }

    fn encode(&self, encoder: fn(&Document, Option<NodeId>) -> String) -> String {
        self.data
            .as_ref()
            .map_or_else(String::new, |r| encoder(&r.doc, Some(r.id)))
    }

    /// Renders this node and its sub-tree as markup.
    ///
    /// # Panics
    ///
    /// Panics if the sub-tree cannot be rendered, see
    /// [`crate::serial::encode_html`].
    #[must_use]
    pub fn outer_html(&self) -> String {
        self.encode(encode_html)
    }

    /// Concatenates the text of this node and its sub-tree.
    #[must_use]
    pub fn outer_text(&self) -> String {
        self.encode(encode_text)
    }

    /// Like [`Node::outer_text`], with whitespace collapsed to single spaces.
    #[must_use]
    pub fn outer_words(&self) -> String {
        self.encode(encode_words)
    }

    /// Concatenates the markup of each child accepted by `filters`.
    #[must_use]
    pub fn inner_html(&self, filters: &[&dyn Predicate]) -> String {
        let mut out = String::new();
        self.range(
            |_, child| {
                out.push_str(&child.outer_html());
                true
            },
            filters,
        );
        out
    }

    /// Concatenates the text of each child accepted by `filters`.
    #[must_use]
    pub fn inner_text(&self, filters: &[&dyn Predicate]) -> String {
        let mut out = String::new();
        self.range(
            |_, child| {
                out.push_str(&child.outer_text());
                true
            },
            filters,
        );
        out
    }
}

/// Formats as [`Node::outer_html`].
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.outer_html())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Node");
        match &self.data {
            Some(r) => s.field("id", &r.id).field("type", &r.doc.node_type(r.id)),
            None => s.field("id", &None::<NodeId>),
        };
        if !self.tag().is_empty() {
            s.field("tag", &self.tag());
        }
        s.field("depth", &self.depth)
            .field("offset", &self.offset())
            .finish()
    }
}
