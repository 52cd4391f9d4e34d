#![forbid(unsafe_code)]

//! Model read/write pipelines shared by the binder and its sub-binders.
//!
//! Reads go through [`get_attr`]: fetch each observed attribute (escaped on
//! request), substitute `""` for an attribute that was never set, then apply
//! the `on_get` transform. Writes go through [`set_attr`]: apply `on_set`,
//! then hand the value to the model together with the binding's
//! [`SetOptions`].
//!
//! # Failure Modes
//!
//! - Transform errors (including unknown view methods) propagate unchanged.
//! - A multi-attribute write whose value is neither an array nor an object
//!   is skipped; there is no attribute it could be assigned to.

use stickit_core::{ObservableModel, Result, SetOptions, Value};

use crate::callback::Transform;
use crate::config::{EffectiveConfig, Observe};
use crate::view::View;

fn retrieve(model: &dyn ObservableModel, attr: &str, escape: bool) -> Value {
    let retrieved = if escape {
        model.escape(attr)
    } else {
        model.get(attr)
    };
    retrieved.unwrap_or_else(|| Value::String(String::new()))
}

/// Read the observed attribute(s) from `model` and apply `on_get`.
///
/// With no `observe` the raw value is `""`; a multi-attribute `observe`
/// yields an array in declaration order.
pub fn get_attr(
    view: &dyn View,
    model: &dyn ObservableModel,
    observe: Option<&Observe>,
    escape: bool,
    on_get: Option<&Transform>,
    config: &EffectiveConfig,
) -> Result<Value> {
    let raw = match observe {
        None => Value::String(String::new()),
        Some(Observe::One(attr)) => retrieve(model, attr, escape),
        Some(Observe::Many(attrs)) => Value::Array(
            attrs
                .iter()
                .map(|attr| retrieve(model, attr, escape))
                .collect(),
        ),
    };
    match on_get {
        Some(transform) => transform.transform(view, &raw, config),
        None => Ok(raw),
    }
}

/// Apply `on_set` and write `value` into the observed attribute(s).
pub fn set_attr(
    view: &dyn View,
    model: &dyn ObservableModel,
    observe: &Observe,
    value: Value,
    options: &SetOptions,
    config: &EffectiveConfig,
) -> Result<()> {
    let value = match &config.on_set {
        Some(transform) => transform.transform(view, &value, config)?,
        None => value,
    };
    match observe {
        Observe::One(attr) => model.set(attr, value, options),
        Observe::Many(attrs) => match value {
            Value::Array(values) => {
                for (attr, value) in attrs.iter().zip(values) {
                    model.set(attr, value, options)?;
                }
                Ok(())
            }
            Value::Object(mut values) => {
                for attr in attrs {
                    if let Some(value) = values.remove(attr) {
                        model.set(attr, value, options)?;
                    }
                }
                Ok(())
            }
            other => {
                tracing::trace!(value = %other, "scalar write to a multi-attribute binding skipped");
                Ok(())
            }
        },
    }
}
