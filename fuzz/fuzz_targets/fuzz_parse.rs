#![no_main]
use libfuzzer_sys::fuzz_target;
use htmlsift::{Node, NodeType};

fuzz_target!(|data: &[u8]| {
    // Parsing, filtering and rendering should never panic on any input
    let Ok(root) = htmlsift::parse(data, &[]) else {
        return;
    };
    let is_element = |n: &Node| n.node_type() == NodeType::Element;
    let two_below = |n: &Node| n.offset() == 2;

    for node in root.filter_nodes(&[&is_element, &two_below]) {
        let _ = node.outer_html();
        let _ = node.inner_text(&[]);
        let _ = node.sibling_length(&[&is_element]);
        let _ = node.parent(&[&is_element]).classes();
    }
});
