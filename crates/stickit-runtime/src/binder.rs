#![forbid(unsafe_code)]

//! Binding orchestration for one view.
//!
//! A [`Binder`] wires a view's declared bindings to a model:
//!
//! - **element → model**: a listener per configured event, attached to the
//!   view's root under the view namespace (`.stickit<cid>`), delegated to the
//!   binding's selector. It reads the element, consults `update_model`, and
//!   writes into the model tagged with the binding's [`WriteToken`].
//! - **model → element**: a `change:<attr>` subscription per observed
//!   attribute. Events carrying the binding's own token are ignored, so a
//!   write never echoes back into the element that produced it.
//!
//! # Invariants
//!
//! 1. `stickit` always tears down earlier bindings first; calling it twice
//!    leaves exactly the subscriptions and listeners of one call.
//! 2. After `unstickit`, no model event reaches this view's handlers and no
//!    element event writes into a model.
//! 3. Dropping the binder releases everything it holds.
//! 4. Closures hold the view and model weakly; events arriving after either
//!    is gone are ignored.
//!
//! # Failure Modes
//!
//! - Setup errors (unknown view methods, unsupported strategies) abort
//!   `stickit` with the bindings made so far left in place; the next
//!   `stickit` or `unstickit` clears them.
//! - Event-time errors propagate to whoever triggered the event.

use std::rc::{Rc, Weak};

use stickit_core::{
    ChangeEvent, DomEvent, ElementHandle, ElementRef, Listener, ModelRef, ObservableModel,
    Result, SetOptions, StickitError, Value, WriteToken, change_event,
};

use crate::attributes::bind_attributes;
use crate::config::{BindingOptions, Bindings, EffectiveConfig, Observe, ROOT_SELECTOR};
use crate::pipeline::{get_attr, set_attr};
use crate::registry::HandlerRegistry;
use crate::resolver::get_configuration;
use crate::scope::ModelBindings;
use crate::view::View;
use crate::visible::bind_visibility;

const NAMESPACE_PREFIX: &str = ".stickit";

/// Element-event namespace owned by the view with `cid`.
#[must_use]
pub fn namespace_for(cid: &str) -> String {
    format!("{NAMESPACE_PREFIX}{cid}")
}

/// Two-way binding engine attached to one view.
pub struct Binder {
    view: Weak<dyn View>,
    cid: String,
    namespace: String,
    registry: HandlerRegistry,
    model_bindings: ModelBindings,
    root: Option<ElementRef>,
}

impl Binder {
    /// Binder for `view` using the thread-wide handler registry.
    pub fn new<V: View + 'static>(view: &Rc<V>) -> Self {
        Self::with_registry(view, HandlerRegistry::global())
    }

    /// Binder for `view` resolving element handlers from `registry`.
    pub fn with_registry<V: View + 'static>(view: &Rc<V>, registry: HandlerRegistry) -> Self {
        let weak = Rc::downgrade(view);
        let weak: Weak<dyn View> = weak;
        let cid = view.cid().to_string();
        Self {
            view: weak,
            namespace: namespace_for(&cid),
            cid,
            registry,
            model_bindings: ModelBindings::new(),
            root: None,
        }
    }

    /// Element-event namespace of the bound view.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registry consulted during configuration resolution.
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Number of live model subscriptions.
    #[must_use]
    pub fn model_binding_count(&self) -> usize {
        self.model_bindings.len()
    }

    /// Bind `model` (default: the view's model) using `bindings` (default:
    /// the view's declared bindings).
    pub fn stickit(&mut self, model: Option<ModelRef>, bindings: Option<&Bindings>) -> Result<()> {
        let Some(view) = self.view.upgrade() else {
            tracing::debug!(view = %self.cid, "view dropped before stickit; nothing bound");
            return Ok(());
        };

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("stickit", view = %self.cid).entered();

        let model = model
            .or_else(|| view.model())
            .ok_or_else(|| StickitError::MissingModel {
                view: self.cid.clone(),
            })?;
        let declared = match bindings {
            Some(bindings) => bindings.clone(),
            None => view.bindings(),
        };

        self.unstickit();
        let root = view.el();
        self.root = Some(ElementRef::clone(&root));

        for (selector, declaration) in declared.iter() {
            self.bind_selector(&view, &model, &root, selector, declaration)?;
        }

        tracing::debug!(
            view = %self.cid,
            selectors = declared.len(),
            model_bindings = self.model_bindings.len(),
            "view bound"
        );
        Ok(())
    }

    fn bind_selector(
        &mut self,
        view: &Rc<dyn View>,
        model: &ModelRef,
        root: &ElementRef,
        selector: &str,
        declaration: &BindingOptions,
    ) -> Result<()> {
        let (element, delegate) = if selector == ROOT_SELECTOR {
            (ElementRef::clone(root), None)
        } else {
            (root.find(selector), Some(selector))
        };
        if element.is_empty() {
            tracing::debug!(view = %self.cid, selector, "selector matched no element; skipped");
            return Ok(());
        }

        let config = Rc::new(get_configuration(&self.registry, &*element, declaration));
        let token = WriteToken::next();

        bind_attributes(view, model, &element, &config, &mut self.model_bindings)?;
        bind_visibility(view, model, &element, &config, &mut self.model_bindings)?;

        let Some(observe) = config.observe.clone() else {
            return Ok(());
        };
        let options = Rc::new(SetOptions::with_bind_key(token).with_extra(&config.set_options));

        for event in &config.events {
            let listener = element_listener(view, model, &element, &config, &observe, &options);
            root.on(event, &self.namespace, delegate, listener);
        }

        for attr in observe.attrs() {
            let handler = model_listener(view, model, &element, &config, &observe, token);
            self.model_bindings.observe(model, change_event(attr), handler);
        }

        let value = get_attr(
            &**view,
            &**model,
            Some(&observe),
            config.escape,
            config.on_get.as_ref(),
            &config,
        )?;
        update_view(&**view, &*element, &config, value, &**model, true)
    }

    /// Release model subscriptions for `model`, or for every model.
    pub fn unstick_model(&mut self, model: Option<&ModelRef>) {
        let released = self.model_bindings.release(model);
        tracing::debug!(view = %self.cid, released, "model bindings released");
    }

    /// Detach every element listener in the view namespace.
    pub fn unstick_view(&mut self) {
        let root = self
            .root
            .clone()
            .or_else(|| self.view.upgrade().map(|view| view.el()));
        if let Some(root) = root {
            root.off(&self.namespace);
        }
    }

    /// Release every model subscription and element listener.
    pub fn unstickit(&mut self) {
        self.unstick_model(None);
        self.unstick_view();
    }

    /// Unbind, then run the view's own removal logic.
    pub fn remove(&mut self) {
        self.unstickit();
        if let Some(view) = self.view.upgrade() {
            view.remove();
        }
    }
}

impl Drop for Binder {
    fn drop(&mut self) {
        self.unstickit();
    }
}

impl std::fmt::Debug for Binder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("view", &self.cid)
            .field("namespace", &self.namespace)
            .field("model_bindings", &self.model_bindings.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Sync directions
// ---------------------------------------------------------------------------

fn element_listener(
    view: &Rc<dyn View>,
    model: &ModelRef,
    element: &ElementRef,
    config: &Rc<EffectiveConfig>,
    observe: &Observe,
    options: &Rc<SetOptions>,
) -> Listener {
    let weak_view = Rc::downgrade(view);
    let weak_model = Rc::downgrade(model);
    let element = ElementRef::clone(element);
    let config = Rc::clone(config);
    let observe = observe.clone();
    let options = Rc::clone(options);
    Rc::new(move |event: &DomEvent| {
        let (Some(view), Some(model)) = (weak_view.upgrade(), weak_model.upgrade()) else {
            return Ok(());
        };
        let value = (config.get_val)(&*view, &*element, &config)?;
        if !config.update_model.evaluate(&*view, &value, &config)? {
            tracing::trace!(event = %event.kind, "model update gated");
            return Ok(());
        }
        set_attr(&*view, &*model, &observe, value, &options, &config)
    })
}

fn model_listener(
    view: &Rc<dyn View>,
    model: &ModelRef,
    element: &ElementRef,
    config: &Rc<EffectiveConfig>,
    observe: &Observe,
    token: WriteToken,
) -> stickit_core::ChangeHandler {
    let weak_view = Rc::downgrade(view);
    let weak_model = Rc::downgrade(model);
    let element = ElementRef::clone(element);
    let config = Rc::clone(config);
    let observe = observe.clone();
    Rc::new(move |event: &ChangeEvent<'_>| {
        if event.options.bind_key == Some(token) {
            tracing::trace!(%token, attr = event.attr, "echo suppressed");
            return Ok(());
        }
        let (Some(view), Some(model)) = (weak_view.upgrade(), weak_model.upgrade()) else {
            return Ok(());
        };
        let value = get_attr(
            &*view,
            &*model,
            Some(&observe),
            config.escape,
            config.on_get.as_ref(),
            &config,
        )?;
        update_view(&*view, &*element, &config, value, &*model, false)
    })
}

/// Write `value` into `element` unless `update_view` blocks it, then notify
/// `after_update` (skipped while initializing).
fn update_view(
    view: &dyn View,
    element: &dyn ElementHandle,
    config: &EffectiveConfig,
    value: Value,
    model: &dyn ObservableModel,
    initializing: bool,
) -> Result<()> {
    let original = (config.get_val)(view, element, config)?;
    if !config.update_view.evaluate(view, &value, config)? {
        tracing::trace!("view update gated");
        return Ok(());
    }
    (config.update)(view, element, &value, model, config)?;
    if initializing {
        return Ok(());
    }
    match &config.after_update {
        Some(hook) => hook.apply(view, element, &value, &original, config),
        None => Ok(()),
    }
}
