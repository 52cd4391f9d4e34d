#![forbid(unsafe_code)]

//! Observable model capability.
//!
//! The binding engine observes models through `change:<attr>` events and
//! writes into them with [`SetOptions`] that carry the originating binding's
//! [`WriteToken`]. Models are shared between views; the engine only
//! subscribes and unsubscribes, it never owns one.

use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::token::WriteToken;
use crate::value::{display_string, escape_html};

/// Shared, dynamically typed model.
pub type ModelRef = Rc<dyn ObservableModel>;

/// Handler invoked for a model event.
pub type ChangeHandler = Rc<dyn Fn(&ChangeEvent<'_>) -> Result<()>>;

/// Handle returned by [`ObservableModel::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wrap a raw id allocated by a model implementation.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Options accompanying a model write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetOptions {
    /// Token of the binding that produced the write, if any.
    pub bind_key: Option<WriteToken>,
    /// Pass-through options (`set_options` in a binding configuration).
    pub extra: Map<String, Value>,
}

impl SetOptions {
    /// Options for a write originating from the binding owning `token`.
    #[must_use]
    pub fn with_bind_key(token: WriteToken) -> Self {
        Self {
            bind_key: Some(token),
            extra: Map::new(),
        }
    }

    /// Merge pass-through options.
    #[must_use]
    pub fn with_extra(mut self, extra: &Map<String, Value>) -> Self {
        self.extra
            .extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Look up a pass-through option.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Payload of a model event.
#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent<'a> {
    /// Attribute that changed.
    pub attr: &'a str,
    /// Its new value.
    pub value: &'a Value,
    /// Options passed to the write.
    pub options: &'a SetOptions,
}

/// Name of the event fired when `attr` changes.
#[must_use]
pub fn change_event(attr: &str) -> String {
    format!("change:{attr}")
}

/// Identity comparison of two model handles.
#[must_use]
pub fn same_model(a: &ModelRef, b: &ModelRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Capability over an attribute store with change notification.
pub trait ObservableModel {
    /// Current value of `attr`; `None` when the attribute was never set.
    fn get(&self, attr: &str) -> Option<Value>;

    /// HTML-escaped string form of `attr`.
    fn escape(&self, attr: &str) -> Option<Value> {
        let raw = self.get(attr).unwrap_or(Value::Null);
        Some(Value::String(escape_html(&display_string(&raw))))
    }

    /// Write `value` into `attr`, emitting change events.
    ///
    /// Errors raised by event handlers propagate to the caller.
    fn set(&self, attr: &str, value: Value, options: &SetOptions) -> Result<()>;

    /// Subscribe `handler` to `event`.
    fn on(&self, event: &str, handler: ChangeHandler) -> SubscriptionId;

    /// Remove a subscription made with [`on`](Self::on).
    fn off(&self, event: &str, id: SubscriptionId);
}
