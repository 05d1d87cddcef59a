//! HTML renderer.
//!
//! Serializes a node and its sub-tree following the HTML5 fragment
//! serialization rules, with a few output conventions that scrapers tend to
//! rely on:
//!
//! - Void elements are written as `<br/>` and must not have children
//! - Raw text elements (`script`, `style`, ...) are not escaped
//! - `&`, `'`, `<`, `>`, `"` and `\r` are escaped in text and attributes
//! - A leading newline is re-added inside `pre`, `listing` and `textarea`,
//!   since the parser drops one

use crate::tree::{Document, NodeId, NodeKind};

/// Renders a node and its sub-tree as markup.
///
/// Returns an empty string for `None`.
///
/// # Panics
///
/// Panics if the sub-tree is malformed: it contains a [`NodeKind::Error`]
/// node, or a void element with children. Parsed documents never are.
///
/// # Examples
///
/// ```
/// use htmlsift::html::{parse_str, ParseOptions};
/// use htmlsift::serial::encode_html;
///
/// let doc = parse_str("<p class=x>Hi</p>", &ParseOptions::default());
/// let html = doc.root_element();
/// assert_eq!(
///     encode_html(&doc, html),
///     r#"<html><head></head><body><p class="x">Hi</p></body></html>"#
/// );
/// assert_eq!(encode_html(&doc, None), "");
/// ```
#[must_use]
pub fn encode_html(doc: &Document, node: Option<NodeId>) -> String {
    let mut out = String::new();
    if let Some(id) = node {
        render(doc, id, &mut out);
    }
    out
}

/// Returns true if the given (lowercase) tag name is a void element.
pub(crate) fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Returns true if the children of this element are written verbatim.
fn is_raw_text_element(tag: &str) -> bool {
    matches!(
        tag,
        "iframe" | "noembed" | "noframes" | "noscript" | "plaintext" | "script" | "style" | "xmp"
    )
}

fn render(doc: &Document, id: NodeId, out: &mut String) {
    match &doc.node(id).kind {
        NodeKind::Error => panic!("html: cannot render an error node"),
        NodeKind::Document => {
            for child in doc.children(id) {
                render(doc, child, out);
            }
        }
        NodeKind::Text { content } => write_escaped(out, content),
        NodeKind::Comment { content } => {
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
        }
        NodeKind::Doctype {
            name,
            public_id,
            system_id,
        } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            if !public_id.is_empty() {
                out.push_str(" PUBLIC ");
                write_quoted(out, public_id);
                if !system_id.is_empty() {
                    out.push(' ');
                    write_quoted(out, system_id);
                }
            } else if !system_id.is_empty() {
                out.push_str(" SYSTEM ");
                write_quoted(out, system_id);
            }
            out.push('>');
        }
        NodeKind::Element {
            name,
            namespace,
            attributes,
        } => {
            out.push('<');
            out.push_str(name);
            for attr in attributes {
                out.push(' ');
                if !attr.namespace.is_empty() {
                    out.push_str(&attr.namespace);
                    out.push(':');
                }
                out.push_str(&attr.key);
                out.push_str("=\"");
                write_escaped(out, &attr.value);
                out.push('"');
            }

            if namespace.is_empty() && is_void_element(name) {
                assert!(
                    doc.first_child(id).is_none(),
                    "html: void element <{name}> has child nodes"
                );
                out.push_str("/>");
                return;
            }
            out.push('>');

            if matches!(name.as_str(), "pre" | "listing" | "textarea") {
                let leading_newline = doc.first_child(id).is_some_and(|first| {
                    matches!(&doc.node(first).kind, NodeKind::Text { content } if content.starts_with('\n'))
                });
                if leading_newline {
                    out.push('\n');
                }
            }

            if namespace.is_empty() && is_raw_text_element(name) {
                for child in doc.children(id) {
                    if let NodeKind::Text { content } = &doc.node(child).kind {
                        out.push_str(content);
                    } else {
                        render(doc, child, out);
                    }
                }
            } else {
                for child in doc.children(id) {
                    render(doc, child, out);
                }
            }

            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

/// Escapes text content and attribute values.
fn write_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(ch),
        }
    }
}

/// Writes a doctype identifier, picking whichever quote it doesn't contain.
fn write_quoted(out: &mut String, value: &str) {
    let quote = if value.contains('"') { '\'' } else { '"' };
    out.push(quote);
    out.push_str(value);
    out.push(quote);
}
