#![forbid(unsafe_code)]

//! Visibility sub-binder.
//!
//! Active only when a binding sets `visible`. The observed value is read
//! through the get-pipeline and turned into a show/hide decision:
//!
//! | `visible` | Decision |
//! |-----------|----------|
//! | `true` | truthiness of the value |
//! | `false` | always hidden |
//! | method / callback | truthiness of its result for the value |
//!
//! A `visible_fn` hook, when present, performs the show/hide instead of the
//! element primitives.

use std::rc::Rc;

use stickit_core::value::is_truthy;
use stickit_core::{
    ChangeEvent, ElementHandle, ElementRef, ModelRef, ObservableModel, Result, change_event,
};

use crate::callback::Gate;
use crate::config::EffectiveConfig;
use crate::pipeline::get_attr;
use crate::scope::ModelBindings;
use crate::view::View;

/// Wire the visibility rule of `config`, if any, and apply it once.
pub(crate) fn bind_visibility(
    view: &Rc<dyn View>,
    model: &ModelRef,
    element: &ElementRef,
    config: &Rc<EffectiveConfig>,
    scope: &mut ModelBindings,
) -> Result<()> {
    if config.visible.is_none() {
        return Ok(());
    }
    let weak_view = Rc::downgrade(view);
    let weak_model = Rc::downgrade(model);
    let element = ElementRef::clone(element);
    let shared = Rc::clone(config);
    let refresh: Rc<dyn Fn() -> Result<()>> = Rc::new(move || {
        let (Some(view), Some(model)) = (weak_view.upgrade(), weak_model.upgrade()) else {
            return Ok(());
        };
        apply_visibility(&*view, &*model, &*element, &shared)
    });

    if let Some(observe) = &config.observe {
        for attr in observe.attrs() {
            let refresh = Rc::clone(&refresh);
            scope.observe(
                model,
                change_event(attr),
                Rc::new(move |_: &ChangeEvent<'_>| refresh()),
            );
        }
    }
    refresh()
}

fn apply_visibility(
    view: &dyn View,
    model: &dyn ObservableModel,
    element: &dyn ElementHandle,
    config: &EffectiveConfig,
) -> Result<()> {
    let Some(gate) = &config.visible else {
        return Ok(());
    };
    let value = get_attr(
        view,
        model,
        config.observe.as_ref(),
        config.escape,
        config.on_get.as_ref(),
        config,
    )?;
    let visible = match gate {
        Gate::Literal(true) => is_truthy(&value),
        gate => gate.evaluate(view, &value, config)?,
    };
    tracing::trace!(visible, "visibility evaluated");
    match &config.visible_fn {
        Some(hook) => hook.apply(view, element, visible, config),
        None => {
            if visible {
                element.show();
            } else {
                element.hide();
            }
            Ok(())
        }
    }
}
