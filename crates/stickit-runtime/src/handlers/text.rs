#![forbid(unsafe_code)]

//! Free-text handlers: contenteditable regions, inputs and textareas.

use stickit_core::value::{number_value, to_number};
use stickit_core::{ElementHandle, Value};

use super::TEXT_EVENTS;
use crate::config::{BindingOptions, ElementTypeHandler};

pub(super) fn contenteditable() -> ElementTypeHandler {
    ElementTypeHandler::new(
        r#"[contenteditable="true"]"#,
        BindingOptions::new().update_method("html").events(TEXT_EVENTS),
    )
}

pub(super) fn input() -> ElementTypeHandler {
    ElementTypeHandler::new(
        "input",
        BindingOptions::new()
            .events(TEXT_EVENTS)
            .update(|_, element, value, _, _| element.write("val", value))
            .get_val(|_, element, _| read_input(element)),
    )
}

pub(super) fn textarea() -> ElementTypeHandler {
    ElementTypeHandler::new(
        "textarea",
        BindingOptions::new()
            .events(TEXT_EVENTS)
            .update(|_, element, value, _, _| element.write("val", value))
            .get_val(|_, element, _| element.read("val")),
    )
}

/// Number inputs read as numbers; text that is not numeric reads as `null`.
fn read_input(element: &dyn ElementHandle) -> stickit_core::Result<Value> {
    let value = element.read("val")?;
    if element.matches(r#"[type="number"]"#) && !value.is_null() {
        return Ok(number_value(to_number(&value)));
    }
    Ok(value)
}
