#![no_main]
use libfuzzer_sys::fuzz_target;
use htmlsift::Node;

fuzz_target!(|data: &[u8]| {
    let is_body = |n: &Node| n.tag() == "body";
    let Ok(first) = htmlsift::parse(data, &[&is_body]) else {
        return;
    };
    let rendered = first.outer_html();

    // Re-parsing rendered output should succeed and find a body again
    let second = htmlsift::parse(rendered.as_bytes(), &[&is_body]);
    assert!(second.is_ok(), "re-parse lost the body element");
});
