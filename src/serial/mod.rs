//! Leaf encoders.
//!
//! These render a node (and its sub-tree) as markup, or collect the text of
//! its descendant text nodes. They take an optional node so that "no node"
//! flows through as an empty string.

pub mod html;
pub mod text;

pub use html::encode_html;
pub use text::{encode_text, encode_words};
