//! The filter / traversal engine.
//!
//! A filter chain is an ordered list of [`Predicate`]s applied as nested
//! conditions, much like a chain of CSS selectors: the first predicate must
//! match some node, the second is then searched for strictly within that
//! node's descendants, and so on. A node that satisfies the last predicate is
//! a result.
//!
//! # Behavior
//!
//! - the search is recursive, depth-first and pre-order, and covers every
//!   node of the sub-tree, the root included
//! - each node can satisfy at most one predicate per path, consuming it for
//!   its sub-tree
//! - nil predicates are stripped up front, so they behave as if omitted
//! - an empty chain matches the root itself (and only the root)
//! - each node appears in the result at most once, in encounter order
//! - in find mode the search stops at the first result
//! - predicates are never called with an empty handle
//! - handles passed to predicates (and returned) carry a `depth` relative to
//!   the root's and a `matched` chain of the nodes that satisfied earlier
//!   predicates; the root itself has no match, and until a predicate
//!   matches, offsets below it are measured from the root
//! - the tree must be well formed; a cycle makes the search loop forever
//!
//! Recursion depth follows tree depth, so pathologically deep trees can
//! exhaust the call stack.

use tracing::trace;

use crate::node::Node;

/// A test applied to a candidate node during traversal.
///
/// Implemented for every `Fn(&Node) -> bool`, so closures and plain
/// functions can be used directly:
///
/// ```
/// use htmlsift::{Node, Predicate};
///
/// fn is_div(node: &Node) -> bool {
///     node.tag() == "div"
/// }
///
/// let chain: [&dyn Predicate; 2] = [&is_div, &|node: &Node| node.offset() == 1];
/// # let _ = chain;
/// ```
pub trait Predicate {
    /// Returns true if `node` satisfies this predicate.
    fn test(&self, node: &Node) -> bool;

    /// Returns true for an absent predicate, which is stripped from a chain
    /// before matching rather than treated as a step of it.
    fn is_nil(&self) -> bool {
        false
    }
}

impl<F> Predicate for F
where
    F: Fn(&Node) -> bool,
{
    fn test(&self, node: &Node) -> bool {
        self(node)
    }
}

/// `None` is an absent predicate.
impl<P: Predicate> Predicate for Option<P> {
    fn test(&self, node: &Node) -> bool {
        self.as_ref().map_or(true, |p| p.test(node))
    }

    fn is_nil(&self) -> bool {
        self.as_ref().map_or(true, Predicate::is_nil)
    }
}

/// An absent predicate, for chains assembled from optional parts.
pub const NIL: Option<fn(&Node) -> bool> = None;

/// Returns every node of the sub-tree rooted at `node` (the root included)
/// that satisfies the filter chain.
#[must_use]
pub fn filter_nodes(node: &Node, filters: &[&dyn Predicate]) -> Vec<Node> {
    run(node, filters, false)
}

/// Returns the first node, in depth-first pre-order, of the sub-tree rooted at
/// `node` that satisfies the filter chain.
#[must_use]
pub fn find_node(node: &Node, filters: &[&dyn Predicate]) -> Option<Node> {
    run(node, filters, true).into_iter().next()
}

/// Like [`find_node`], but returns an empty handle when nothing matches.
#[must_use]
pub fn get_node(node: &Node, filters: &[&dyn Predicate]) -> Node {
    find_node(node, filters).unwrap_or_default()
}

/// Returns true if the chain has no predicates left once nils are stripped.
pub(crate) fn is_empty_chain(filters: &[&dyn Predicate]) -> bool {
    filters.iter().all(|filter| filter.is_nil())
}

fn run(node: &Node, filters: &[&dyn Predicate], find: bool) -> Vec<Node> {
    let filters: Vec<&dyn Predicate> = filters
        .iter()
        .copied()
        .filter(|filter| !filter.is_nil())
        .collect();
    trace!(predicates = filters.len(), find, "filtering nodes");

    let mut traversal = Traversal {
        find,
        result: Vec::new(),
    };
    traversal.visit(&node.without_match(), &filters);

    trace!(results = traversal.result.len(), "filtered nodes");
    traversal.result
}

struct Traversal {
    find: bool,
    result: Vec<Node>,
}

impl Traversal {
    fn visit(&mut self, node: &Node, filters: &[&dyn Predicate]) {
        if node.is_empty() || (self.find && !self.result.is_empty()) {
            return;
        }

        let Some((filter, remaining)) = filters.split_first() else {
            self.result.push(node.clone());
            return;
        };

        let start = self.result.len();

        if filter.test(node) {
            if remaining.is_empty() {
                self.visit(node, remaining);
            } else {
                let matched = node.with_match();
                let mut child = matched.step_first_child();
                while !child.is_empty() {
                    self.visit(&child, remaining);
                    child = child.step_next_sibling();
                }
            }
        }

        let finish = self.result.len();

        // Only the traversal root lacks a match; it anchors its descendants.
        let anchored;
        let parent = if node.matched().is_none() {
            anchored = node.with_match();
            &anchored
        } else {
            node
        };

        // The chain may also start matching anywhere below this node.
        let mut child = parent.step_first_child();
        while !child.is_empty() {
            let before = self.result.len();
            self.visit(&child, filters);
            if finish > start {
                self.dedupe(start..finish, before);
            }
            child = child.step_next_sibling();
        }
    }

    /// Drops entries appended since `before` that repeat a node in `seen`.
    ///
    /// Only this frame's own matches need checking: sibling sub-trees are
    /// disjoint, and anything found earlier by an ancestor is removed when the
    /// recursion unwinds to that ancestor.
    fn dedupe(&mut self, seen: std::ops::Range<usize>, before: usize) {
        let mut index = before;
        while index < self.result.len() {
            let duplicate = self.result[seen.clone()]
                .iter()
                .any(|node| node.same_node(&self.result[index]));
            if duplicate {
                self.result.remove(index);
            } else {
                index += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::html::{parse_str, ParseOptions};
    use crate::tree::NodeType;

    const NESTED: &str = concat!(
        r#"<div class="one"><img class="iconClass1" src="/images/icon_1.png" alt="top level"/>"#,
        r#"<div class="one"><img class="iconClass1" src="/images/icon_1.png" alt="further nested"/></div></div>"#,
        r#"<div class="one"></div>"#,
        r#"<div class="two"><img class="iconClass1" src="/images/icon_1.png" alt="Some Alt Text"/></div>"#,
        r#"<div class="one"><img class="iconClass1" src="/images/icon_1.png" alt="final"/></div>"#,
    );

    fn root(input: &str) -> Node {
        Node::root(Arc::new(parse_str(input, &ParseOptions::default())))
    }

    fn is_element(node: &Node) -> bool {
        node.node_type() == NodeType::Element
    }

    fn is_div_one(node: &Node) -> bool {
        node.tag() == "div" && node.get_attr_val("", "class") == "one"
    }

    fn is_img(node: &Node) -> bool {
        node.tag() == "img"
    }

    fn tags(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(Node::tag).collect()
    }

    #[test]
    fn test_empty_chain_returns_root() {
        let node = root("<img src=x>");
        let result = filter_nodes(&node, &[]);
        assert_eq!(result.len(), 1);
        assert!(result[0].same_node(&node));
    }

    #[test]
    fn test_nil_chain_is_empty_chain() {
        let node = root("<img src=x>");
        let result = filter_nodes(&node, &[&NIL, &NIL]);
        assert_eq!(result.len(), 1);
        assert!(result[0].same_node(&node));
    }

    #[test]
    fn test_single_predicate_all_elements() {
        let node = root("<img src=x>");
        let result = filter_nodes(&node, &[&is_element]);
        assert_eq!(tags(&result), vec!["html", "head", "body", "img"]);
    }

    #[test]
    fn test_single_predicate_subset() {
        let node = root("<img src=x>");
        let head_or_body = |n: &Node| n.tag() == "head" || n.tag() == "body";
        let result = filter_nodes(&node, &[&head_or_body]);
        assert_eq!(tags(&result), vec!["head", "body"]);
    }

    #[test]
    fn test_chain_with_nils() {
        let node = root(NESTED);
        let result = filter_nodes(&node, &[&NIL, &is_div_one, &NIL, &NIL, &is_img, &NIL]);
        let alts: Vec<&str> = result.iter().map(|n| n.get_attr_val("", "alt")).collect();
        assert_eq!(alts, vec!["top level", "further nested", "final"]);
    }

    #[test]
    fn test_elements_without_class() {
        let node = root(NESTED);
        let no_class = |n: &Node| is_element(n) && n.get_attr("", "class").is_none();
        let result = filter_nodes(&node, &[&no_class]);
        assert_eq!(tags(&result), vec!["html", "head", "body"]);
    }

    #[test]
    fn test_find_returns_first() {
        let node = root(NESTED);
        let found = find_node(&node, &[&is_div_one, &is_img]).unwrap();
        assert_eq!(found.get_attr_val("", "alt"), "top level");

        let head_or_body = |n: &Node| n.tag() == "head" || n.tag() == "body";
        assert_eq!(find_node(&node, &[&head_or_body]).unwrap().tag(), "head");
    }

    #[test]
    fn test_find_is_prefix_of_filter() {
        let node = root(NESTED);
        let chains: [&[&dyn Predicate]; 4] = [
            &[],
            &[&is_element],
            &[&is_div_one, &is_img],
            &[&|_: &Node| false],
        ];
        for chain in chains {
            let all = filter_nodes(&node, chain);
            let first = find_node(&node, chain);
            match (all.first(), first) {
                (Some(a), Some(b)) => assert!(a.same_node(&b)),
                (None, None) => {}
                other => panic!("find and filter disagree: {other:?}"),
            }
        }
    }

    #[test]
    fn test_no_match() {
        let node = root(NESTED);
        assert!(filter_nodes(&node, &[&|_: &Node| false]).is_empty());
        assert!(find_node(&node, &[&|_: &Node| false]).is_none());
        assert!(get_node(&node, &[&|_: &Node| false]).is_empty());
    }

    #[test]
    fn test_empty_root() {
        assert!(filter_nodes(&Node::default(), &[]).is_empty());
        assert!(find_node(&Node::default(), &[&is_element]).is_none());
    }

    #[test]
    fn test_no_duplicates() {
        // every img sits below several matching divs
        let node = root("<div><div><div><img alt=a></div><img alt=b></div></div>");
        let is_div = |n: &Node| n.tag() == "div";
        let result = filter_nodes(&node, &[&is_div, &is_img]);
        let alts: Vec<&str> = result.iter().map(|n| n.get_attr_val("", "alt")).collect();
        assert_eq!(alts, vec!["a", "b"]);

        let divs = filter_nodes(&node, &[&is_div, &is_div]);
        assert_eq!(divs.len(), 2);
    }

    #[test]
    fn test_deterministic() {
        let node = root(NESTED);
        let a = filter_nodes(&node, &[&is_div_one, &is_img]);
        let b = filter_nodes(&node, &[&is_div_one, &is_img]);
        assert_eq!(a.len(), b.len());
        assert!(a.iter().zip(&b).all(|(x, y)| x.same_node(y)));
    }

    #[test]
    fn test_relative_depth_below_match() {
        let node = root(concat!(
            r#"<div id="outer"><section><p id="x">one</p></section>"#,
            r#"<section><p id="y">two</p></section></div>"#,
        ));
        let is_div = |n: &Node| n.tag() == "div";
        let two_below = |n: &Node| n.offset() == 2;
        let result = filter_nodes(&node, &[&is_div, &two_below]);

        let ids: Vec<&str> = result.iter().map(|n| n.get_attr_val("", "id")).collect();
        assert_eq!(ids, vec!["x", "y"]);
        for n in &result {
            assert_eq!(n.match_depth(), 2);
            assert_eq!(n.depth(), 5);
            assert_eq!(n.matched().unwrap().get_attr_val("", "id"), "outer");
        }
    }

    #[test]
    fn test_match_chain() {
        let node = root("<div><section><p>x</p></section></div>");
        let is_div = |n: &Node| n.tag() == "div";
        let is_section = |n: &Node| n.tag() == "section";
        let is_p = |n: &Node| n.tag() == "p";
        let p = find_node(&node, &[&is_div, &is_section, &is_p]).unwrap();

        let section = p.matched().unwrap();
        assert_eq!(section.tag(), "section");
        let div = section.matched().unwrap();
        assert_eq!(div.tag(), "div");
        let doc = div.matched().unwrap();
        assert!(doc.same_node(&node));
        assert!(doc.matched().is_none());
        assert_eq!(p.offset(), 1);
        assert_eq!(div.offset(), div.depth());
    }

    #[test]
    fn test_root_offset_is_zero() {
        let node = root("<p>x</p>");
        let result = filter_nodes(&node, &[]);
        assert_eq!(result[0].offset(), 0);
        assert!(result[0].matched().is_none());
    }

    #[test]
    fn test_offsets_are_relative_to_nested_root() {
        let ul = get_node(&root("<ul><li>a</li><li>b</li></ul>"), &[&|n: &Node| n.tag() == "ul"]);
        assert_eq!(ul.depth(), 3);

        let result = filter_nodes(&ul, &[]);
        assert!(result[0].same_node(&ul));
        assert_eq!(result[0].offset(), 0);
        assert!(result[0].matched().is_none());

        let direct_li = |n: &Node| n.tag() == "li" && n.offset() == 1;
        let items = filter_nodes(&ul, &[&direct_li]);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|n| n.depth() == 4));
        assert!(items[0].matched().unwrap().same_node(&ul));
    }

    #[test]
    fn test_predicates_never_see_empty_handles() {
        let node = root(NESTED);
        let checked = |n: &Node| {
            assert!(!n.is_empty());
            true
        };
        let _ = filter_nodes(&node, &[&checked, &checked]);
    }

    #[test]
    fn test_option_predicate() {
        let node = root("<p>x</p>");
        let some: Option<fn(&Node) -> bool> = Some(is_element);
        assert!(!some.is_nil());
        assert!(NIL.is_nil());
        assert_eq!(tags(&filter_nodes(&node, &[&some])), vec!["html", "head", "body", "p"]);
    }
}
