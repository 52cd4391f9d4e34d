#![forbid(unsafe_code)]

//! Configuration resolution.
//!
//! The effective configuration of a binding is a left-to-right fold over
//!
//! 1. the generic handler (read/write through the strategy named by
//!    `update_method`, model updates off),
//! 2. every registered handler matching the element, in registration order,
//! 3. the user's declaration.
//!
//! Each layer overwrites the fields it sets. Handler selectors take no part
//! in the result.

use std::rc::Rc;

use stickit_core::{ElementHandle, ObservableModel, Result, Value};

use crate::callback::{Gate, GetValFn, UpdateFn};
use crate::config::{BindingOptions, EffectiveConfig, OptionTable};
use crate::registry::HandlerRegistry;
use crate::view::View;

const DEFAULT_UPDATE_METHOD: &str = "text";

/// Write by invoking the strategy named by `update_method`.
fn generic_update(
    _view: &dyn View,
    element: &dyn ElementHandle,
    value: &Value,
    _model: &dyn ObservableModel,
    config: &EffectiveConfig,
) -> Result<()> {
    element.write(&config.update_method, value)
}

/// Read by invoking the strategy named by `update_method`.
fn generic_get_val(
    _view: &dyn View,
    element: &dyn ElementHandle,
    config: &EffectiveConfig,
) -> Result<Value> {
    element.read(&config.update_method)
}

/// The bottom layer of every configuration.
#[must_use]
pub fn generic_handler() -> BindingOptions {
    let mut options = BindingOptions::new()
        .update_model(false)
        .update_view(true)
        .update_method(DEFAULT_UPDATE_METHOD);
    options.update = Some(Rc::new(generic_update));
    options.get_val = Some(Rc::new(generic_get_val));
    options
}

/// Merge the generic handler, matching registered handlers and
/// `declaration` into the effective configuration for `element`.
#[must_use]
pub fn get_configuration(
    registry: &HandlerRegistry,
    element: &dyn ElementHandle,
    declaration: &BindingOptions,
) -> EffectiveConfig {
    let mut merged = generic_handler();
    for handler in registry.matching(element) {
        merged.overlay(&handler.options);
    }
    merged.overlay(declaration);
    finalize(merged)
}

/// Normalize aliases and fill the mandatory fields.
fn finalize(options: BindingOptions) -> EffectiveConfig {
    let BindingOptions {
        observe,
        model_attr,
        events,
        update_model,
        update_view,
        update_method,
        on_get,
        format,
        on_set,
        get_val,
        update,
        after_update,
        set_options,
        attributes,
        visible,
        visible_fn,
        select_options,
        escape,
    } = options;

    EffectiveConfig {
        observe: observe.or(model_attr),
        events: events.unwrap_or_default(),
        update_model: update_model.unwrap_or(Gate::Literal(false)),
        update_view: update_view.unwrap_or(Gate::Literal(true)),
        update_method: update_method.unwrap_or_else(|| DEFAULT_UPDATE_METHOD.to_string()),
        on_get: on_get.or(format),
        on_set,
        get_val: get_val.unwrap_or_else(|| Rc::new(generic_get_val) as Rc<GetValFn>),
        update: update.unwrap_or_else(|| Rc::new(generic_update) as Rc<UpdateFn>),
        after_update,
        set_options: set_options.unwrap_or_default(),
        attributes: attributes.unwrap_or_default(),
        visible,
        visible_fn,
        select_options,
        escape: escape.unwrap_or(false),
        option_table: OptionTable::default(),
    }
}
