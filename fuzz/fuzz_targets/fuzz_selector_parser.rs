#![no_main]

use libfuzzer_sys::fuzz_target;
use stickit_harness::{Document, SelectorList, el};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Err(err) = SelectorList::parse(input) {
        assert!(err.offset <= input.len());
        return;
    }
    // Anything that parses must be usable against a live tree.
    let root = Document::new().mount(
        el("form")
            .child(el("input").id("a").attr("type", "text").attr("class", "x y"))
            .child(el("select").child(el("option").flag("selected"))),
    );
    let _ = root.select(input);
});
