#![forbid(unsafe_code)]

//! Proptest strategies for binding scenarios.

use proptest::prelude::*;
use stickit_core::Value;

/// Attribute names as they appear in model declarations.
pub fn attr_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

/// Printable text, including characters that need HTML escaping.
pub fn field_text() -> impl Strategy<Value = String> {
    r#"[a-zA-Z0-9 <>&"'`]{0,24}"#
}

/// JSON scalars a form field can hold.
pub fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1_000_i64..1_000).prop_map(Value::from),
        field_text().prop_map(Value::String),
    ]
}

/// A sequence of edits, each either from the element (`true`) or from the
/// model (`false`), with the text written.
pub fn edit_script() -> impl Strategy<Value = Vec<(bool, String)>> {
    prop::collection::vec((any::<bool>(), field_text()), 1..16)
}
