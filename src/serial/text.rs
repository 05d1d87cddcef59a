//! Text extraction.

use crate::tree::{Document, NodeId, NodeKind};

/// Concatenates the content of every text node in the sub-tree rooted at
/// `node` (the node itself included), in document order, with no separators.
///
/// Returns an empty string for `None`.
#[must_use]
pub fn encode_text(doc: &Document, node: Option<NodeId>) -> String {
    let mut out = String::new();
    if let Some(id) = node {
        collect_text(doc, id, &mut out);
    }
    out
}

/// Like [`encode_text`], but splits each text node on whitespace and joins
/// all the words of the sub-tree with single spaces.
///
/// # Examples
///
/// ```
/// use htmlsift::html::{parse_str, ParseOptions};
/// use htmlsift::serial::encode_words;
///
/// let doc = parse_str("<p>  one\n two</p><p>three </p>", &ParseOptions::default());
/// assert_eq!(encode_words(&doc, Some(doc.root())), "one two three");
/// ```
#[must_use]
pub fn encode_words(doc: &Document, node: Option<NodeId>) -> String {
    let mut words = Vec::new();
    if let Some(id) = node {
        collect_words(doc, id, &mut words);
    }
    words.join(" ")
}

fn collect_text(doc: &Document, id: NodeId, out: &mut String) {
    if let NodeKind::Text { content } = &doc.node(id).kind {
        out.push_str(content);
        return;
    }
    for child in doc.children(id) {
        collect_text(doc, child, out);
    }
}

fn collect_words<'d>(doc: &'d Document, id: NodeId, words: &mut Vec<&'d str>) {
    if let NodeKind::Text { content } = &doc.node(id).kind {
        words.extend(content.split_whitespace());
        return;
    }
    for child in doc.children(id) {
        collect_words(doc, child, words);
    }
}
