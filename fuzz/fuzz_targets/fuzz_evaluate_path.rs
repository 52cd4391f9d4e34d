#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stickit_core::{Value, evaluate_path};

#[derive(Debug, Arbitrary)]
struct Input {
    document: String,
    path: Option<String>,
}

fuzz_target!(|input: Input| {
    let Ok(root) = serde_json::from_str::<Value>(&input.document) else {
        return;
    };
    let found = evaluate_path(&root, input.path.as_deref());
    if input.path.is_none() {
        assert_eq!(found, &root);
    }
});
