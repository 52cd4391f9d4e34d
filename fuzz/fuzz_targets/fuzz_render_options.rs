#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stickit_core::Value;
use stickit_runtime::{SelectOptions, render_options};

#[derive(Debug, Arbitrary)]
struct Input {
    collection: String,
    value: String,
    label_path: Option<String>,
    value_path: Option<String>,
    multiple: bool,
}

fuzz_target!(|input: Input| {
    let (Ok(collection), Ok(value)) = (
        serde_json::from_str::<Value>(&input.collection),
        serde_json::from_str::<Value>(&input.value),
    ) else {
        return;
    };
    let mut select = SelectOptions::values(Value::Null);
    if let Some(path) = input.label_path {
        select = select.label_path(path);
    }
    if let Some(path) = input.value_path {
        select = select.value_path(path);
    }
    let (entries, values) = render_options(&collection, &select, &value, input.multiple);
    assert_eq!(entries.len(), values.len());
    if value.is_null() {
        assert!(entries.first().is_some_and(|entry| entry.label.is_empty()));
    }
});
