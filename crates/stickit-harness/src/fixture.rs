#![forbid(unsafe_code)]

//! Reference [`View`] for tests and benches.
//!
//! [`FixtureView`] owns a mounted [`Selection`] as its root, an optional
//! default model and default bindings, and a table of named methods that
//! binding options can refer to. Every method invocation is recorded so
//! tests can assert on call order.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use stickit_core::{ElementRef, ModelRef, Result, StickitError, Value};
use stickit_runtime::{Bindings, MethodArgs, View};

use crate::selection::Selection;

/// A named view method.
pub type MethodFn = Rc<dyn Fn(MethodArgs<'_>) -> Result<Value>>;

static NEXT_CID: AtomicU64 = AtomicU64::new(1);

/// View backed by an in-memory document.
pub struct FixtureView {
    cid: String,
    root: Selection,
    model: RefCell<Option<ModelRef>>,
    bindings: RefCell<Bindings>,
    methods: RefCell<AHashMap<String, MethodFn>>,
    calls: RefCell<Vec<String>>,
    removed: Cell<bool>,
}

impl FixtureView {
    /// View rooted at `root` with a fresh `view<N>` cid.
    #[must_use]
    pub fn new(root: Selection) -> Self {
        let cid = format!("view{}", NEXT_CID.fetch_add(1, Ordering::Relaxed));
        Self {
            cid,
            root,
            model: RefCell::new(None),
            bindings: RefCell::new(Bindings::new()),
            methods: RefCell::new(AHashMap::new()),
            calls: RefCell::new(Vec::new()),
            removed: Cell::new(false),
        }
    }

    #[must_use]
    pub fn with_model(self, model: ModelRef) -> Self {
        self.set_model(Some(model));
        self
    }

    #[must_use]
    pub fn with_bindings(self, bindings: Bindings) -> Self {
        *self.bindings.borrow_mut() = bindings;
        self
    }

    #[must_use]
    pub fn with_method(
        self,
        name: &str,
        method: impl Fn(MethodArgs<'_>) -> Result<Value> + 'static,
    ) -> Self {
        self.define_method(name, method);
        self
    }

    /// Add or replace the method `name`.
    pub fn define_method(&self, name: &str, method: impl Fn(MethodArgs<'_>) -> Result<Value> + 'static) {
        self.methods
            .borrow_mut()
            .insert(name.to_string(), Rc::new(method));
    }

    pub fn set_model(&self, model: Option<ModelRef>) {
        *self.model.borrow_mut() = model;
    }

    /// The concrete root selection.
    #[must_use]
    pub fn root(&self) -> &Selection {
        &self.root
    }

    /// Shorthand for `root().select(selector)`.
    #[must_use]
    pub fn select(&self, selector: &str) -> Selection {
        self.root.select(selector)
    }

    /// Names of the methods invoked so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of times `name` was invoked.
    #[must_use]
    pub fn call_count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|call| *call == name).count()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Whether [`View::remove`] ran.
    #[must_use]
    pub fn was_removed(&self) -> bool {
        self.removed.get()
    }
}

impl View for FixtureView {
    fn cid(&self) -> &str {
        &self.cid
    }

    fn el(&self) -> ElementRef {
        Rc::new(self.root.clone())
    }

    fn model(&self) -> Option<ModelRef> {
        self.model.borrow().clone()
    }

    fn bindings(&self) -> Bindings {
        self.bindings.borrow().clone()
    }

    fn call_method(&self, name: &str, args: MethodArgs<'_>) -> Result<Value> {
        self.calls.borrow_mut().push(name.to_string());
        let method = self.methods.borrow().get(name).cloned();
        match method {
            Some(method) => method(args),
            None => Err(StickitError::method_not_found(name)),
        }
    }

    fn remove(&self) {
        self.removed.set(true);
    }
}

impl std::fmt::Debug for FixtureView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureView")
            .field("cid", &self.cid)
            .field("root", &self.root)
            .field("methods", &self.methods.borrow().len())
            .field("removed", &self.removed.get())
            .finish_non_exhaustive()
    }
}
