//! Node kind definitions.
//!
//! `NodeKind` carries the per-kind payload of a tree node, `NodeType` is its
//! fieldless mirror used when callers only care about the kind.

use std::fmt;

use super::Attribute;

/// The kind of an HTML node and its associated data.
///
/// Navigation links (parent, children, siblings) are stored in `NodeData`,
/// not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A node that was allocated but never given a valid kind. The HTML
    /// renderer refuses to serialize it.
    Error,

    /// The document node. There is exactly one per `Document`, at its root.
    Document,

    /// A document type declaration, e.g. `<!DOCTYPE html>`.
    Doctype {
        /// The declared root element name.
        name: String,
        /// The PUBLIC identifier (empty if absent).
        public_id: String,
        /// The SYSTEM identifier (empty if absent).
        system_id: String,
    },

    /// An element node, e.g. `<div class="x">`.
    Element {
        /// The local tag name, lowercased by the parser for HTML elements.
        name: String,
        /// `""` for HTML elements, `"svg"` or `"math"` for foreign content.
        namespace: String,
        /// Attributes in source order.
        attributes: Vec<Attribute>,
    },

    /// A text node containing character data (references already decoded).
    Text {
        /// The text content.
        content: String,
    },

    /// A comment node, without the `<!--` and `-->` delimiters.
    Comment {
        /// The comment text.
        content: String,
    },
}

impl NodeKind {
    /// Returns the fieldless type of this kind.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Error => NodeType::Error,
            Self::Document => NodeType::Document,
            Self::Doctype { .. } => NodeType::Doctype,
            Self::Element { .. } => NodeType::Element,
            Self::Text { .. } => NodeType::Text,
            Self::Comment { .. } => NodeType::Comment,
        }
    }
}

/// The type of a node.
///
/// `Error` is also what an empty `Node` handle reports, so it works as the
/// "no type" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeType {
    #[default]
    Error,
    Text,
    Document,
    Element,
    Comment,
    Doctype,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Text => "text",
            Self::Document => "document",
            Self::Element => "element",
            Self::Comment => "comment",
            Self::Doctype => "doctype",
        };
        f.write_str(name)
    }
}
