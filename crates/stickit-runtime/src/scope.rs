#![forbid(unsafe_code)]

//! Revocable model subscriptions held on behalf of a view.
//!
//! Every model event the binder subscribes to is recorded as a
//! [`ModelBinding`]. [`ModelBindings::release`] unsubscribes either the
//! records of one model or all of them.
//!
//! # Invariants
//!
//! 1. A record exists exactly as long as its subscription is live.
//! 2. Releasing a subset preserves the order of the remaining records.

use stickit_core::{ChangeHandler, ModelRef, SubscriptionId, same_model};

/// One live model subscription.
pub struct ModelBinding {
    model: ModelRef,
    event: String,
    id: SubscriptionId,
}

impl ModelBinding {
    /// Event name the subscription listens to.
    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Model the subscription is attached to.
    #[must_use]
    pub fn model(&self) -> &ModelRef {
        &self.model
    }

    fn release(self) {
        self.model.off(&self.event, self.id);
    }
}

impl std::fmt::Debug for ModelBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBinding")
            .field("event", &self.event)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of a view's model subscriptions.
#[derive(Debug, Default)]
pub struct ModelBindings {
    records: Vec<ModelBinding>,
}

impl ModelBindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `event` on `model` and record it.
    pub fn observe(&mut self, model: &ModelRef, event: String, handler: ChangeHandler) {
        let id = model.on(&event, handler);
        self.records.push(ModelBinding {
            model: ModelRef::clone(model),
            event,
            id,
        });
    }

    /// Unsubscribe the records of `model`, or every record when `None`.
    ///
    /// Returns the number of subscriptions released.
    pub fn release(&mut self, model: Option<&ModelRef>) -> usize {
        let (released, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|record| model.is_none_or(|m| same_model(&record.model, m)));
        self.records = kept;
        let count = released.len();
        released.into_iter().for_each(ModelBinding::release);
        count
    }

    /// Recorded subscriptions in subscription order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelBinding> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
