//! # htmlsift
//!
//! Filter and navigate parsed HTML with chains of plain Rust predicates.
//!
//! A filter chain is a list of predicates applied as nested conditions: the
//! first must match some node, the second is searched for within that node's
//! descendants, and so on. Every result is a [`Node`] handle that remembers
//! how deep it sits and which node satisfied the previous predicate, so
//! predicates can ask things like "two levels below the matched `div`".
//!
//! ## Quick Start
//!
//! ```
//! use htmlsift::Node;
//!
//! let input = r#"<div class="card"><h2>Title</h2><p>Body</p></div>"#;
//!
//! let card = htmlsift::parse(
//!     input.as_bytes(),
//!     &[&|n: &Node| n.has_class("card")],
//! )
//! .unwrap();
//!
//! assert_eq!(card.first_child(&[]).outer_text(), "Title");
//! assert_eq!(card.inner_html(&[&|n: &Node| n.tag() == "p"]), "<p>Body</p>");
//! ```
//!
//! See [`filter`] for the matching rules and [`node`] for navigation.

pub mod encoding;
pub mod error;
pub mod filter;
pub mod html;
pub mod node;
pub mod serial;
pub mod tree;
pub mod util;

use std::io::Read;
use std::sync::Arc;

use tracing::debug;

// Re-export primary types at the crate root for convenience.
pub use error::{Error, Result};
pub use filter::{Predicate, NIL};
pub use html::ParseOptions;
pub use node::Node;
pub use tree::{Attribute, Document, NodeId, NodeType};

/// Parses HTML from `reader` and returns the first node matching `filters`.
///
/// The returned handle's depth is relative to the document node. An empty
/// chain returns the document node itself.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, and [`Error::NoMatch`] if no node
/// satisfies the chain.
///
/// # Examples
///
/// ```
/// use htmlsift::{Error, Node};
///
/// let err = htmlsift::parse("<p>x</p>".as_bytes(), &[&|n: &Node| n.tag() == "table"]);
/// assert!(matches!(err, Err(Error::NoMatch)));
/// ```
pub fn parse<R: Read>(reader: R, filters: &[&dyn Predicate]) -> Result<Node> {
    parse_with_options(reader, &ParseOptions::default(), filters)
}

/// Like [`parse`], with explicit parser options.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with_options<R: Read>(
    reader: R,
    options: &ParseOptions,
    filters: &[&dyn Predicate],
) -> Result<Node> {
    let doc = Arc::new(html::parse_reader(reader, options)?);
    let nodes = doc.node_count();

    let found = Node::root(doc).find_node(filters);
    debug!(nodes, matched = found.is_some(), "parsed document");
    found.ok_or(Error::NoMatch)
}
