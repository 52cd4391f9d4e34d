#![forbid(unsafe_code)]

//! Element-type handler registry.
//!
//! The registry is an ordered, append-only list of [`ElementTypeHandler`]s.
//! Order matters: when several handlers match one element, later ones
//! override earlier ones key by key during configuration resolution.
//!
//! A [`HandlerRegistry`] is a cheap `Rc` handle, so a registry can be shared
//! between binders and extended after they were created. A thread-local
//! [`global`](HandlerRegistry::global) instance, pre-seeded with the default
//! handlers, backs [`Binder::new`](crate::Binder::new).
//!
//! # Invariants
//!
//! 1. Handlers are never removed.
//! 2. Every stored handler has `update_model`, `update_view` and
//!    `update_method` set.

use std::cell::RefCell;
use std::rc::Rc;

use stickit_core::ElementHandle;

use crate::callback::Gate;
use crate::config::ElementTypeHandler;
use crate::handlers;

thread_local! {
    static GLOBAL_REGISTRY: HandlerRegistry = HandlerRegistry::with_defaults();
}

/// One handler or a sequence of handlers, as accepted by
/// [`HandlerRegistry::add_handler`].
pub trait IntoHandlers {
    fn into_handlers(self) -> Vec<ElementTypeHandler>;
}

impl IntoHandlers for ElementTypeHandler {
    fn into_handlers(self) -> Vec<ElementTypeHandler> {
        vec![self]
    }
}

impl IntoHandlers for Vec<ElementTypeHandler> {
    fn into_handlers(self) -> Vec<ElementTypeHandler> {
        self
    }
}

impl<const N: usize> IntoHandlers for [ElementTypeHandler; N] {
    fn into_handlers(self) -> Vec<ElementTypeHandler> {
        self.into()
    }
}

impl IntoHandlers for Vec<Vec<ElementTypeHandler>> {
    fn into_handlers(self) -> Vec<ElementTypeHandler> {
        self.into_iter().flatten().collect()
    }
}

/// Shared, ordered registry of element-type handlers.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Rc<RefCell<Vec<Rc<ElementTypeHandler>>>>,
}

impl HandlerRegistry {
    /// A registry with no handlers at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry seeded with the built-in element handlers.
    #[must_use]
    pub fn with_defaults() -> Self {
        let registry = Self::empty();
        registry.add_handler(handlers::default_handlers());
        registry
    }

    /// Access the thread-wide registry.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_REGISTRY.with(Clone::clone)
    }

    /// Append one or more handlers, filling unset defaults.
    pub fn add_handler(&self, handlers: impl IntoHandlers) {
        let added: Vec<_> = handlers
            .into_handlers()
            .into_iter()
            .map(|mut handler| {
                let options = &mut handler.options;
                options.update_model.get_or_insert(Gate::Literal(true));
                options.update_view.get_or_insert(Gate::Literal(true));
                options
                    .update_method
                    .get_or_insert_with(|| "text".to_string());
                Rc::new(handler)
            })
            .collect();
        tracing::debug!(added = added.len(), "registered element handlers");
        self.handlers.borrow_mut().extend(added);
    }

    /// Handlers whose selector matches `element`, in registration order.
    #[must_use]
    pub fn matching(&self, element: &dyn ElementHandle) -> Vec<Rc<ElementTypeHandler>> {
        self.handlers
            .borrow()
            .iter()
            .filter(|handler| handler.selector.matches(element))
            .cloned()
            .collect()
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.len())
            .finish()
    }
}
