#![no_main]

use libfuzzer_sys::fuzz_target;
use stickit_runtime::Bindings;

fuzz_target!(|data: &[u8]| {
    let Ok(document) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(bindings) = Bindings::from_json(document) {
        assert!(bindings.len() <= document.len());
    }
});
