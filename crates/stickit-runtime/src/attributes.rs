#![forbid(unsafe_code)]

//! Attribute sub-binder.
//!
//! Each [`AttributeBinding`] of a binding keeps one element attribute or
//! property in sync with its observed model attribute(s). Names on the
//! boolean property allow-list are written as properties; every other name
//! is written as an attribute. `class` swaps the class applied last for the
//! new one instead of overwriting the whole attribute.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use stickit_core::value::display_string;
use stickit_core::{ChangeEvent, ElementRef, ModelRef, ObservableModel, Result, Value, change_event};

use crate::config::{AttributeBinding, EffectiveConfig, Observe};
use crate::pipeline::get_attr;
use crate::scope::ModelBindings;
use crate::view::View;

/// Names written through [`set_prop`](stickit_core::ElementHandle::set_prop).
pub const BOOLEAN_PROPERTIES: [&str; 15] = [
    "autofocus",
    "autoplay",
    "async",
    "checked",
    "controls",
    "defer",
    "disabled",
    "hidden",
    "loop",
    "multiple",
    "open",
    "readonly",
    "required",
    "scoped",
    "selected",
];

/// Whether `name` is written as a DOM property.
#[must_use]
pub fn is_boolean_property(name: &str) -> bool {
    BOOLEAN_PROPERTIES.contains(&name)
}

/// Space-separated class list; array entries each become one class.
fn class_names(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(display_string)
            .filter(|class| !class.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        other => display_string(other),
    }
}

struct AttributeUpdater {
    view: Weak<dyn View>,
    model: Weak<dyn ObservableModel>,
    element: ElementRef,
    config: Rc<EffectiveConfig>,
    binding: AttributeBinding,
    observed: Option<Observe>,
    last_class: RefCell<String>,
}

impl AttributeUpdater {
    fn apply(&self) -> Result<()> {
        let (Some(view), Some(model)) = (self.view.upgrade(), self.model.upgrade()) else {
            return Ok(());
        };
        let value = get_attr(
            &*view,
            &*model,
            self.observed.as_ref(),
            self.binding.escape,
            self.binding.read_transform(),
            &self.config,
        )?;
        let name = self.binding.name.as_str();
        if name == "class" {
            let next = class_names(&value);
            let mut last = self.last_class.borrow_mut();
            self.element.remove_class(&last);
            self.element.add_class(&next);
            *last = next;
        } else if is_boolean_property(name) {
            self.element.set_prop(name, &value);
        } else {
            self.element.set_attr(name, &value);
        }
        Ok(())
    }
}

/// Wire every attribute binding of `config` and apply each once.
pub(crate) fn bind_attributes(
    view: &Rc<dyn View>,
    model: &ModelRef,
    element: &ElementRef,
    config: &Rc<EffectiveConfig>,
    scope: &mut ModelBindings,
) -> Result<()> {
    for binding in &config.attributes {
        let observed = binding.observe.clone().or_else(|| config.observe.clone());
        let updater = Rc::new(AttributeUpdater {
            view: Rc::downgrade(view),
            model: Rc::downgrade(model),
            element: ElementRef::clone(element),
            config: Rc::clone(config),
            binding: binding.clone(),
            observed,
            last_class: RefCell::new(String::new()),
        });
        if let Some(observe) = &updater.observed {
            for attr in observe.attrs() {
                let updater = Rc::clone(&updater);
                scope.observe(
                    model,
                    change_event(attr),
                    Rc::new(move |_: &ChangeEvent<'_>| updater.apply()),
                );
            }
        }
        updater.apply()?;
    }
    Ok(())
}
