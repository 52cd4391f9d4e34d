#![forbid(unsafe_code)]

//! Radio and checkbox handlers.
//!
//! A single checkbox reads as a boolean, except when it carries a value
//! attribute other than the browser default `"on"`: it then reads as that
//! value when checked and `null` otherwise. Several checkboxes bound by one
//! selector form a group that reads and writes an array of checked values.

use stickit_core::value::{display_string, is_truthy, loose_eq};
use stickit_core::{ElementHandle, Result, Value};

use crate::config::{BindingOptions, ElementTypeHandler};

/// Value browsers report for a checkbox without a value attribute.
const DEFAULT_CHECKBOX_VALUE: &str = "on";

fn is_checked(element: &dyn ElementHandle) -> bool {
    is_truthy(&element.prop("checked"))
}

pub(super) fn radio() -> ElementTypeHandler {
    ElementTypeHandler::new(
        r#"input[type="radio"]"#,
        BindingOptions::new()
            .events(["change"])
            .update(|_, element, value, _, _| {
                update_radio(element, value);
                Ok(())
            })
            .get_val(|_, element, _| read_radio(element)),
    )
}

fn update_radio(element: &dyn ElementHandle, value: &Value) {
    // `null` names no member, not the one with an empty value.
    if value.is_null() {
        return;
    }
    let wanted = display_string(value);
    for node in element.nodes() {
        if node.attr("value").as_deref() == Some(wanted.as_str()) {
            node.set_prop("checked", &Value::Bool(true));
        }
    }
}

fn read_radio(element: &dyn ElementHandle) -> Result<Value> {
    match element.nodes().into_iter().find(|node| is_checked(&**node)) {
        Some(node) => node.read("val"),
        None => Ok(Value::Null),
    }
}

pub(super) fn checkbox() -> ElementTypeHandler {
    ElementTypeHandler::new(
        r#"input[type="checkbox"]"#,
        BindingOptions::new()
            .events(["change"])
            .update(|_, element, value, _, _| update_checkbox(element, value))
            .get_val(|_, element, _| read_checkbox(element)),
    )
}

fn update_checkbox(element: &dyn ElementHandle, value: &Value) -> Result<()> {
    if element.len() > 1 {
        let wanted: &[Value] = match value.as_array() {
            Some(items) => items,
            None => &[],
        };
        for node in element.nodes() {
            let own = node.read("val")?;
            let checked = wanted.contains(&own);
            node.set_prop("checked", &Value::Bool(checked));
        }
        return Ok(());
    }
    let checked = match value {
        Value::Bool(checked) => *checked,
        other => loose_eq(other, &element.read("val")?),
    };
    element.set_prop("checked", &Value::Bool(checked));
    Ok(())
}

fn read_checkbox(element: &dyn ElementHandle) -> Result<Value> {
    if element.len() > 1 {
        let mut checked = Vec::new();
        for node in element.nodes() {
            if is_checked(&*node) {
                checked.push(node.read("val")?);
            }
        }
        return Ok(Value::Array(checked));
    }
    let checked = is_checked(element);
    let own = element.read("val")?;
    match own {
        Value::String(ref s) if s == DEFAULT_CHECKBOX_VALUE => Ok(Value::Bool(checked)),
        Value::Null => Ok(Value::Bool(checked)),
        own if checked => Ok(own),
        _ => Ok(Value::Null),
    }
}
