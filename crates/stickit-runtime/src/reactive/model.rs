#![forbid(unsafe_code)]

//! Attribute-map model with change notification.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ahash::AHashMap;
use stickit_core::{
    ChangeEvent, ChangeHandler, Map, ObservableModel, Result, SetOptions, SubscriptionId, Value,
    change_event,
};

/// Generic event fired after every attribute change.
const CHANGE: &str = "change";

/// An observable attribute store.
///
/// Interior mutability lets a shared `Rc<Model>` be written from inside its
/// own change handlers.
#[derive(Default)]
pub struct Model {
    attributes: RefCell<Map<String, Value>>,
    subscribers: RefCell<AHashMap<String, Vec<(SubscriptionId, ChangeHandler)>>>,
    next_id: Cell<u64>,
}

impl Model {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model seeded from a JSON object. Non-object values seed
    /// nothing.
    #[must_use]
    pub fn with_attributes(initial: Value) -> Self {
        let model = Self::new();
        if let Value::Object(map) = initial {
            *model.attributes.borrow_mut() = map;
        }
        model
    }

    /// Snapshot of every attribute.
    #[must_use]
    pub fn attributes(&self) -> Map<String, Value> {
        self.attributes.borrow().clone()
    }

    /// Whether `attr` has been set.
    #[must_use]
    pub fn has(&self, attr: &str) -> bool {
        self.attributes.borrow().contains_key(attr)
    }

    /// Remove `attr`, notifying subscribers with a `null` value.
    pub fn unset(&self, attr: &str, options: &SetOptions) -> Result<()> {
        if self.attributes.borrow_mut().shift_remove(attr).is_none() {
            return Ok(());
        }
        self.emit_change(attr, &Value::Null, options)
    }

    /// Number of live subscriptions for `event`.
    #[must_use]
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscribers.borrow().get(event).map_or(0, Vec::len)
    }

    /// Number of live subscriptions across all events.
    #[must_use]
    pub fn total_subscribers(&self) -> usize {
        self.subscribers.borrow().values().map(Vec::len).sum()
    }

    fn emit_change(&self, attr: &str, value: &Value, options: &SetOptions) -> Result<()> {
        let payload = ChangeEvent {
            attr,
            value,
            options,
        };
        self.notify(&change_event(attr), &payload)?;
        self.notify(CHANGE, &payload)
    }

    fn notify(&self, event: &str, payload: &ChangeEvent<'_>) -> Result<()> {
        // Snapshot so handlers may subscribe, unsubscribe or write re-entrantly.
        let handlers: Vec<ChangeHandler> = self
            .subscribers
            .borrow()
            .get(event)
            .map(|list| list.iter().map(|(_, h)| Rc::clone(h)).collect())
            .unwrap_or_default();
        for handler in handlers {
            handler(payload)?;
        }
        Ok(())
    }
}

impl ObservableModel for Model {
    fn get(&self, attr: &str) -> Option<Value> {
        self.attributes.borrow().get(attr).cloned()
    }

    fn set(&self, attr: &str, value: Value, options: &SetOptions) -> Result<()> {
        {
            let mut attributes = self.attributes.borrow_mut();
            if attributes.get(attr) == Some(&value) {
                return Ok(());
            }
            attributes.insert(attr.to_string(), value.clone());
        }
        tracing::trace!(attr, bind_key = ?options.bind_key, "model attribute changed");
        self.emit_change(attr, &value, options)
    }

    fn on(&self, event: &str, handler: ChangeHandler) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.subscribers
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push((id, handler));
        id
    }

    fn off(&self, event: &str, id: SubscriptionId) {
        let mut subscribers = self.subscribers.borrow_mut();
        if let Some(list) = subscribers.get_mut(event) {
            list.retain(|(existing, _)| *existing != id);
            if list.is_empty() {
                subscribers.remove(event);
            }
        }
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("attributes", &self.attributes.borrow())
            .field("subscribers", &self.total_subscribers())
            .finish()
    }
}
