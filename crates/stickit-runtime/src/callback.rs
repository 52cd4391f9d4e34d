#![forbid(unsafe_code)]

//! Late-bound behavior selected by binding configuration.
//!
//! Several configuration keys accept either a literal, the name of a view
//! method, or a closure. [`Gate`] covers the boolean-producing keys
//! (`update_model`, `update_view`, `visible`); [`Hook`] covers the keys that
//! only accept a method name or a closure (`on_get`, `on_set`,
//! `after_update`, `visible_fn`).
//!
//! # Invariants
//!
//! 1. A gate result is reduced by truthiness; `null`, `false`, `0` and `""`
//!    block the update.
//! 2. Unknown method names surface as `StickitError::MethodNotFound` from
//!    [`View::call_method`]; nothing here swallows them.

use std::fmt;
use std::rc::Rc;

use stickit_core::value::is_truthy;
use stickit_core::{ElementHandle, ObservableModel, Result, Value};

use crate::config::EffectiveConfig;
use crate::view::{MethodArgs, View};

/// `(value, config) -> value` transform or predicate.
pub type ValueFn = dyn Fn(&Value, &EffectiveConfig) -> Result<Value>;

/// `(element, visible, config)` show/hide override.
pub type VisibilityFn = dyn Fn(&dyn ElementHandle, bool, &EffectiveConfig) -> Result<()>;

/// `(element, value, original, config)` post-write hook.
pub type AfterUpdateFn = dyn Fn(&dyn ElementHandle, &Value, &Value, &EffectiveConfig) -> Result<()>;

/// Read strategy: current value of an element.
pub type GetValFn = dyn Fn(&dyn View, &dyn ElementHandle, &EffectiveConfig) -> Result<Value>;

/// Write strategy: push a model value into an element.
pub type UpdateFn =
    dyn Fn(&dyn View, &dyn ElementHandle, &Value, &dyn ObservableModel, &EffectiveConfig) -> Result<()>;

/// Producer of a select element's option collection.
pub type CollectionFn = dyn Fn(&dyn View) -> Result<Value>;

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// A boolean-producing configuration value.
#[derive(Clone)]
pub enum Gate {
    /// Fixed answer.
    Literal(bool),
    /// Name of a view method called with [`MethodArgs::Value`].
    Method(String),
    /// Closure called with `(value, config)`.
    Callback(Rc<ValueFn>),
}

impl Gate {
    /// Gate backed by a view method.
    #[must_use]
    pub fn method(name: impl Into<String>) -> Self {
        Self::Method(name.into())
    }

    /// Gate backed by a closure.
    pub fn callback(f: impl Fn(&Value, &EffectiveConfig) -> Result<Value> + 'static) -> Self {
        Self::Callback(Rc::new(f))
    }

    /// Gate backed by a plain predicate.
    pub fn predicate(f: impl Fn(&Value) -> bool + 'static) -> Self {
        Self::Callback(Rc::new(move |value: &Value, _: &EffectiveConfig| {
            Ok(Value::Bool(f(value)))
        }))
    }

    /// Decide whether the update guarded by this gate proceeds.
    pub fn evaluate(&self, view: &dyn View, value: &Value, config: &EffectiveConfig) -> Result<bool> {
        match self {
            Self::Literal(answer) => Ok(*answer),
            Self::Method(name) => {
                let result = view.call_method(name, MethodArgs::Value { value, config })?;
                Ok(is_truthy(&result))
            }
            Self::Callback(f) => Ok(is_truthy(&f(value, config)?)),
        }
    }
}

impl From<bool> for Gate {
    fn from(answer: bool) -> Self {
        Self::Literal(answer)
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(answer) => f.debug_tuple("Literal").field(answer).finish(),
            Self::Method(name) => f.debug_tuple("Method").field(name).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Hook
// ---------------------------------------------------------------------------

/// A configuration value naming a view method or holding a closure.
pub enum Hook<F: ?Sized> {
    /// Name of a view method.
    Method(String),
    /// Closure.
    Callback(Rc<F>),
}

/// `on_get` / `on_set` / `format` transform.
pub type Transform = Hook<ValueFn>;

/// `visible_fn` override.
pub type VisibilityHook = Hook<VisibilityFn>;

/// `after_update` callback.
pub type AfterUpdateHook = Hook<AfterUpdateFn>;

impl<F: ?Sized> Hook<F> {
    /// Hook backed by a view method.
    #[must_use]
    pub fn method(name: impl Into<String>) -> Self {
        Self::Method(name.into())
    }
}

impl<F: ?Sized> Clone for Hook<F> {
    fn clone(&self) -> Self {
        match self {
            Self::Method(name) => Self::Method(name.clone()),
            Self::Callback(f) => Self::Callback(Rc::clone(f)),
        }
    }
}

impl<F: ?Sized> fmt::Debug for Hook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(name) => f.debug_tuple("Method").field(name).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl Hook<ValueFn> {
    /// Transform backed by a closure.
    pub fn callback(f: impl Fn(&Value, &EffectiveConfig) -> Result<Value> + 'static) -> Self {
        Self::Callback(Rc::new(f))
    }

    /// Transform backed by an infallible mapping.
    pub fn map(f: impl Fn(&Value) -> Value + 'static) -> Self {
        Self::Callback(Rc::new(move |value: &Value, _: &EffectiveConfig| Ok(f(value))))
    }

    /// Run the transform on `value`.
    pub fn transform(&self, view: &dyn View, value: &Value, config: &EffectiveConfig) -> Result<Value> {
        match self {
            Self::Method(name) => view.call_method(name, MethodArgs::Value { value, config }),
            Self::Callback(f) => f(value, config),
        }
    }
}

impl Hook<VisibilityFn> {
    /// Visibility override backed by a closure.
    pub fn callback(
        f: impl Fn(&dyn ElementHandle, bool, &EffectiveConfig) -> Result<()> + 'static,
    ) -> Self {
        Self::Callback(Rc::new(f))
    }

    /// Show or hide `element` through the override.
    pub fn apply(
        &self,
        view: &dyn View,
        element: &dyn ElementHandle,
        visible: bool,
        config: &EffectiveConfig,
    ) -> Result<()> {
        match self {
            Self::Method(name) => view
                .call_method(
                    name,
                    MethodArgs::Visibility {
                        element,
                        visible,
                        config,
                    },
                )
                .map(drop),
            Self::Callback(f) => f(element, visible, config),
        }
    }
}

impl Hook<AfterUpdateFn> {
    /// Post-write hook backed by a closure.
    pub fn callback(
        f: impl Fn(&dyn ElementHandle, &Value, &Value, &EffectiveConfig) -> Result<()> + 'static,
    ) -> Self {
        Self::Callback(Rc::new(f))
    }

    /// Notify the hook that `element` now shows `value` instead of `original`.
    pub fn apply(
        &self,
        view: &dyn View,
        element: &dyn ElementHandle,
        value: &Value,
        original: &Value,
        config: &EffectiveConfig,
    ) -> Result<()> {
        match self {
            Self::Method(name) => view
                .call_method(
                    name,
                    MethodArgs::AfterUpdate {
                        element,
                        value,
                        original,
                        config,
                    },
                )
                .map(drop),
            Self::Callback(f) => f(element, value, original, config),
        }
    }
}
