#![forbid(unsafe_code)]

//! View capability consumed by the [`Binder`](crate::Binder).

use stickit_core::{ElementHandle, ElementRef, ModelRef, Result, StickitError, Value};

use crate::config::{Bindings, EffectiveConfig};

/// Arguments passed to a view method referenced by name from a binding.
///
/// Which variant a method receives depends on the configuration key that
/// named it.
#[derive(Clone, Copy)]
pub enum MethodArgs<'a> {
    /// `update_model`, `update_view`, `visible`, `on_get`, `on_set`.
    Value {
        value: &'a Value,
        config: &'a EffectiveConfig,
    },
    /// `visible_fn`.
    Visibility {
        element: &'a dyn ElementHandle,
        visible: bool,
        config: &'a EffectiveConfig,
    },
    /// `after_update`.
    AfterUpdate {
        element: &'a dyn ElementHandle,
        value: &'a Value,
        original: &'a Value,
        config: &'a EffectiveConfig,
    },
    /// `select_options.collection`.
    Collection { config: &'a EffectiveConfig },
}

impl MethodArgs<'_> {
    /// The value argument, for variants that carry one.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value { value, .. } | Self::AfterUpdate { value, .. } => Some(value),
            Self::Visibility { .. } | Self::Collection { .. } => None,
        }
    }

    /// The effective configuration of the binding making the call.
    #[must_use]
    pub fn config(&self) -> &EffectiveConfig {
        match self {
            Self::Value { config, .. }
            | Self::Visibility { config, .. }
            | Self::AfterUpdate { config, .. }
            | Self::Collection { config } => config,
        }
    }
}

impl std::fmt::Debug for MethodArgs<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value { value, .. } => f.debug_struct("Value").field("value", value).finish(),
            Self::Visibility { visible, .. } => f
                .debug_struct("Visibility")
                .field("visible", visible)
                .finish(),
            Self::AfterUpdate {
                value, original, ..
            } => f
                .debug_struct("AfterUpdate")
                .field("value", value)
                .field("original", original)
                .finish(),
            Self::Collection { .. } => f.write_str("Collection"),
        }
    }
}

/// A bindable view.
///
/// Implementors own a root element, usually a model, and optionally a set of
/// declared bindings. Methods named from binding configuration are routed
/// through [`call_method`](Self::call_method).
pub trait View {
    /// Unique instance id, used to namespace element listeners.
    fn cid(&self) -> &str;

    /// The view's root element.
    fn el(&self) -> ElementRef;

    /// Model bound when `stickit` is called without one.
    fn model(&self) -> Option<ModelRef> {
        None
    }

    /// Bindings used when `stickit` is called without explicit ones.
    fn bindings(&self) -> Bindings {
        Bindings::new()
    }

    /// Invoke the view method `name`.
    fn call_method(&self, name: &str, args: MethodArgs<'_>) -> Result<Value> {
        let _ = args;
        Err(StickitError::method_not_found(name))
    }

    /// The view's own removal logic, run after bindings are released.
    fn remove(&self) {}
}
