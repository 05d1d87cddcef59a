//! HTML parsing.
//!
//! Tokenizing and tree construction are delegated to `html5ever`, which
//! implements the WHATWG HTML5 parsing algorithm (implied `html`, `head` and
//! `body` elements, foreign content, error recovery). The reference-counted
//! DOM it produces is copied once into an arena [`Document`], which is what
//! the rest of this crate navigates.
//!
//! The copy recurses once per nesting level, so pathologically deep input
//! can exhaust the call stack during parsing.
//!
//! # Examples
//!
//! ```
//! use htmlsift::html::{parse_str, ParseOptions};
//!
//! let doc = parse_str("<p>Hello <b>world</b>", &ParseOptions::default());
//! let html = doc.root_element().unwrap();
//! assert_eq!(doc.tag(html), "html");
//! ```

use std::io::{self, Read};

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData as DomData, RcDom};
use tracing::{debug, trace};

use crate::encoding::decode_to_utf8;
use crate::tree::{Attribute, Document, NodeId, NodeKind};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Options controlling HTML parsing.
///
/// Use the builder pattern to configure options:
///
/// ```
/// use htmlsift::html::ParseOptions;
///
/// let opts = ParseOptions::default()
///     .scripting(false)
///     .no_blanks(true)
///     .encoding(Some("windows-1252"));
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// If true, `<noscript>` content is parsed as raw text, as a browser with
    /// scripting enabled would.
    pub scripting: bool,
    /// If true, the doctype is not added to the tree.
    pub drop_doctype: bool,
    /// If true, whitespace-only text nodes are dropped.
    pub no_blanks: bool,
    /// Encoding label used for byte input without a BOM, in preference to
    /// any `<meta>` declaration.
    pub encoding: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            scripting: true,
            drop_doctype: false,
            no_blanks: false,
            encoding: None,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn scripting(mut self, yes: bool) -> Self {
        self.scripting = yes;
        self
    }

    #[must_use]
    pub fn drop_doctype(mut self, yes: bool) -> Self {
        self.drop_doctype = yes;
        self
    }

    #[must_use]
    pub fn no_blanks(mut self, yes: bool) -> Self {
        self.no_blanks = yes;
        self
    }

    #[must_use]
    pub fn encoding(mut self, label: Option<&str>) -> Self {
        self.encoding = label.map(str::to_string);
        self
    }
}

/// Parses an HTML string into a `Document`.
///
/// HTML parsing recovers from every error, so this cannot fail; anything the
/// tree builder complained about is kept in [`Document::diagnostics`].
#[must_use]
pub fn parse_str(input: &str, options: &ParseOptions) -> Document {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: options.scripting,
            drop_doctype: options.drop_doctype,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };
    let dom = parse_document(RcDom::default(), opts).one(input);

    let mut doc = Document::new();
    doc.diagnostics = dom.errors.iter().map(ToString::to_string).collect();
    if !doc.diagnostics.is_empty() {
        trace!(count = doc.diagnostics.len(), "html5ever reported parse errors");
    }

    let root = doc.root();
    for child in dom.document.children.borrow().iter() {
        copy_node(&mut doc, root, child, options.no_blanks);
    }
    doc
}

/// Reads an entire byte stream, decodes it (see [`crate::encoding`]) and
/// parses it.
///
/// # Errors
///
/// Returns the reader's I/O error unchanged.
pub fn parse_reader<R: Read>(mut reader: R, options: &ParseOptions) -> io::Result<Document> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let (text, encoding) = decode_to_utf8(&bytes, options.encoding.as_deref());
    debug!(
        bytes = bytes.len(),
        encoding = encoding.name(),
        "decoded html input"
    );
    Ok(parse_str(&text, options))
}

/// Copies an rcdom node (and its sub-tree) under `parent` in the arena.
fn copy_node(doc: &mut Document, parent: NodeId, handle: &Handle, no_blanks: bool) {
    let kind = match &handle.data {
        DomData::Document => {
            for child in handle.children.borrow().iter() {
                copy_node(doc, parent, child, no_blanks);
            }
            return;
        }
        DomData::Doctype {
            name,
            public_id,
            system_id,
        } => NodeKind::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        },
        DomData::Text { contents } => {
            let content = contents.borrow().to_string();
            if no_blanks && content.trim().is_empty() {
                return;
            }
            NodeKind::Text { content }
        }
        DomData::Comment { contents } => NodeKind::Comment {
            content: contents.to_string(),
        },
        DomData::Element { name, attrs, .. } => NodeKind::Element {
            name: name.local.to_string(),
            namespace: element_namespace(&name.ns).to_string(),
            attributes: attrs.borrow().iter().map(copy_attribute).collect(),
        },
        // The HTML tree builder never emits processing instructions.
        DomData::ProcessingInstruction { .. } => return,
    };

    let id = doc.create_node(kind);
    doc.append_child(parent, id);

    if let DomData::Element {
        template_contents, ..
    } = &handle.data
    {
        if let Some(contents) = template_contents.borrow().as_ref() {
            for child in contents.children.borrow().iter() {
                copy_node(doc, id, child, no_blanks);
            }
        }
    }
    for child in handle.children.borrow().iter() {
        copy_node(doc, id, child, no_blanks);
    }
}

fn element_namespace(ns: &str) -> &'static str {
    match ns {
        SVG_NAMESPACE => "svg",
        MATHML_NAMESPACE => "math",
        _ => "",
    }
}

fn copy_attribute(attr: &html5ever::Attribute) -> Attribute {
    Attribute {
        namespace: attr
            .name
            .prefix
            .as_ref()
            .map_or_else(String::new, ToString::to_string),
        key: attr.name.local.to_string(),
        value: attr.value.to_string(),
    }
}
