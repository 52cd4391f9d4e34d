#![forbid(unsafe_code)]

//! Binding configuration types.
//!
//! A [`BindingOptions`] is the option surface shared by user declarations and
//! registered [`ElementTypeHandler`]s. Every field is optional so sources can
//! be layered: [`BindingOptions::overlay`] copies each field that is set in
//! the upper layer over the lower one, with no deep merging. The resolver
//! folds the layers and finalizes the result into an [`EffectiveConfig`].
//!
//! # Legacy aliases
//!
//! `model_attr` is accepted for `observe` and `format` for `on_get`. Both are
//! normalized when the effective configuration is built: an explicit
//! `observe` / `on_get` wins over its alias.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use stickit_core::{ElementHandle, Map, Value};

use crate::callback::{
    AfterUpdateHook, CollectionFn, Gate, GetValFn, Transform, UpdateFn, VisibilityHook,
};

// ---------------------------------------------------------------------------
// Observe
// ---------------------------------------------------------------------------

/// Model attribute(s) a binding observes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observe {
    /// A single attribute; reads yield a scalar.
    One(String),
    /// Several attributes; reads yield an array in this order.
    Many(Vec<String>),
}

impl Observe {
    /// Observed attribute names in order.
    pub fn attrs(&self) -> impl Iterator<Item = &str> {
        let names: &[String] = match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        };
        names.iter().map(String::as_str)
    }
}

impl From<&str> for Observe {
    fn from(name: &str) -> Self {
        Self::One(name.to_string())
    }
}

impl From<String> for Observe {
    fn from(name: String) -> Self {
        Self::One(name)
    }
}

impl From<Vec<String>> for Observe {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names)
    }
}

impl From<Vec<&str>> for Observe {
    fn from(names: Vec<&str>) -> Self {
        Self::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Observe {
    fn from(names: [&str; N]) -> Self {
        Self::Many(names.iter().map(|s| (*s).to_string()).collect())
    }
}

// ---------------------------------------------------------------------------
// Attribute and select sub-configurations
// ---------------------------------------------------------------------------

/// Maps an element attribute or property to observed model attribute(s).
#[derive(Debug, Clone, Default)]
pub struct AttributeBinding {
    /// Attribute or property name; `"class"` is handled specially.
    pub name: String,
    /// Observed attribute(s); defaults to the owning binding's.
    pub observe: Option<Observe>,
    /// Read transform.
    pub on_get: Option<Transform>,
    /// Legacy alias of `on_get`.
    pub format: Option<Transform>,
    /// Read through the model's escaping accessor.
    pub escape: bool,
}

impl AttributeBinding {
    /// Bind the attribute or property `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn observe(mut self, observe: impl Into<Observe>) -> Self {
        self.observe = Some(observe.into());
        self
    }

    #[must_use]
    pub fn on_get(mut self, on_get: Transform) -> Self {
        self.on_get = Some(on_get);
        self
    }

    #[must_use]
    pub fn format(mut self, format: Transform) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn escape(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    /// The read transform after alias normalization.
    #[must_use]
    pub fn read_transform(&self) -> Option<&Transform> {
        self.on_get.as_ref().or(self.format.as_ref())
    }
}

/// Source of a select element's options.
#[derive(Clone)]
pub enum Collection {
    /// A literal list, or an object with `opt_labels` describing groups.
    Values(Value),
    /// Name of a view method returning the list.
    Method(String),
    /// Closure returning the list.
    Callback(Rc<CollectionFn>),
}

impl Default for Collection {
    fn default() -> Self {
        Self::Values(Value::Null)
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Values(v) => f.debug_tuple("Values").field(v).finish(),
            Self::Method(name) => f.debug_tuple("Method").field(name).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Option-list configuration for select elements.
#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    pub collection: Collection,
    /// Path to each item's label, `"label"` when unset.
    pub label_path: Option<String>,
    /// Path to each item's value, `"value"` when unset.
    pub value_path: Option<String>,
}

impl SelectOptions {
    /// Options drawn from a literal collection.
    #[must_use]
    pub fn values(collection: Value) -> Self {
        Self {
            collection: Collection::Values(collection),
            ..Self::default()
        }
    }

    /// Options drawn from a view method.
    #[must_use]
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            collection: Collection::Method(name.into()),
            ..Self::default()
        }
    }

    /// Options drawn from a closure.
    pub fn callback(f: impl Fn(&dyn crate::View) -> stickit_core::Result<Value> + 'static) -> Self {
        Self {
            collection: Collection::Callback(Rc::new(f)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn label_path(mut self, path: impl Into<String>) -> Self {
        self.label_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn value_path(mut self, path: impl Into<String>) -> Self {
        self.value_path = Some(path.into());
        self
    }
}

// ---------------------------------------------------------------------------
// BindingOptions
// ---------------------------------------------------------------------------

/// The layered option surface of a binding or element-type handler.
#[derive(Clone, Default)]
pub struct BindingOptions {
    pub observe: Option<Observe>,
    pub model_attr: Option<Observe>,
    pub events: Option<Vec<String>>,
    pub update_model: Option<Gate>,
    pub update_view: Option<Gate>,
    pub update_method: Option<String>,
    pub on_get: Option<Transform>,
    pub format: Option<Transform>,
    pub on_set: Option<Transform>,
    pub get_val: Option<Rc<GetValFn>>,
    pub update: Option<Rc<UpdateFn>>,
    pub after_update: Option<AfterUpdateHook>,
    pub set_options: Option<Map<String, Value>>,
    pub attributes: Option<Vec<AttributeBinding>>,
    pub visible: Option<Gate>,
    pub visible_fn: Option<VisibilityHook>,
    pub select_options: Option<SelectOptions>,
    pub escape: Option<bool>,
}

/// Copy every field that is set in `$src` over `$dst`.
macro_rules! overlay_fields {
    ($dst:ident, $src:ident; $($field:ident),* $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field.clone();
            }
        )*
    };
}

impl BindingOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `BindingOptions::new().observe(..)`.
    #[must_use]
    pub fn observing(observe: impl Into<Observe>) -> Self {
        Self::new().observe(observe)
    }

    /// Layer `upper` on top of `self`: each field set in `upper` wins.
    pub fn overlay(&mut self, upper: &BindingOptions) {
        overlay_fields!(self, upper;
            observe, model_attr, events, update_model, update_view, update_method,
            on_get, format, on_set, get_val, update, after_update, set_options,
            attributes, visible, visible_fn, select_options, escape,
        );
    }

    #[must_use]
    pub fn observe(mut self, observe: impl Into<Observe>) -> Self {
        self.observe = Some(observe.into());
        self
    }

    #[must_use]
    pub fn model_attr(mut self, observe: impl Into<Observe>) -> Self {
        self.model_attr = Some(observe.into());
        self
    }

    #[must_use]
    pub fn events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = Some(events.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn update_model(mut self, gate: impl Into<Gate>) -> Self {
        self.update_model = Some(gate.into());
        self
    }

    #[must_use]
    pub fn update_view(mut self, gate: impl Into<Gate>) -> Self {
        self.update_view = Some(gate.into());
        self
    }

    #[must_use]
    pub fn update_method(mut self, method: impl Into<String>) -> Self {
        self.update_method = Some(method.into());
        self
    }

    #[must_use]
    pub fn on_get(mut self, transform: Transform) -> Self {
        self.on_get = Some(transform);
        self
    }

    #[must_use]
    pub fn format(mut self, transform: Transform) -> Self {
        self.format = Some(transform);
        self
    }

    #[must_use]
    pub fn on_set(mut self, transform: Transform) -> Self {
        self.on_set = Some(transform);
        self
    }

    /// Override the read strategy.
    #[must_use]
    pub fn get_val(
        mut self,
        f: impl Fn(&dyn crate::View, &dyn ElementHandle, &EffectiveConfig) -> stickit_core::Result<Value>
        + 'static,
    ) -> Self {
        self.get_val = Some(Rc::new(f));
        self
    }

    /// Override the write strategy.
    #[must_use]
    pub fn update(
        mut self,
        f: impl Fn(
            &dyn crate::View,
            &dyn ElementHandle,
            &Value,
            &dyn stickit_core::ObservableModel,
            &EffectiveConfig,
        ) -> stickit_core::Result<()>
        + 'static,
    ) -> Self {
        self.update = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn after_update(mut self, hook: AfterUpdateHook) -> Self {
        self.after_update = Some(hook);
        self
    }

    #[must_use]
    pub fn set_options(mut self, options: Map<String, Value>) -> Self {
        self.set_options = Some(options);
        self
    }

    /// Add one pass-through model write option.
    #[must_use]
    pub fn set_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set_options
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn attributes(mut self, attributes: Vec<AttributeBinding>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Append one attribute binding.
    #[must_use]
    pub fn attribute(mut self, attribute: AttributeBinding) -> Self {
        self.attributes.get_or_insert_with(Vec::new).push(attribute);
        self
    }

    #[must_use]
    pub fn visible(mut self, gate: impl Into<Gate>) -> Self {
        self.visible = Some(gate.into());
        self
    }

    #[must_use]
    pub fn visible_fn(mut self, hook: VisibilityHook) -> Self {
        self.visible_fn = Some(hook);
        self
    }

    #[must_use]
    pub fn select_options(mut self, options: SelectOptions) -> Self {
        self.select_options = Some(options);
        self
    }

    #[must_use]
    pub fn escape(mut self, escape: bool) -> Self {
        self.escape = Some(escape);
        self
    }
}

impl From<&str> for BindingOptions {
    fn from(observe: &str) -> Self {
        Self::observing(observe)
    }
}

impl From<String> for BindingOptions {
    fn from(observe: String) -> Self {
        Self::observing(observe)
    }
}

impl fmt::Debug for BindingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingOptions")
            .field("observe", &self.observe)
            .field("model_attr", &self.model_attr)
            .field("events", &self.events)
            .field("update_model", &self.update_model)
            .field("update_view", &self.update_view)
            .field("update_method", &self.update_method)
            .field("get_val", &self.get_val.is_some())
            .field("update", &self.update.is_some())
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Element-type handlers
// ---------------------------------------------------------------------------

/// Predicate deciding whether a handler applies to an element.
#[derive(Clone)]
pub enum HandlerSelector {
    /// CSS selector tested with [`ElementHandle::matches`].
    Css(String),
    /// Arbitrary predicate.
    Predicate(Rc<dyn Fn(&dyn ElementHandle) -> bool>),
}

impl HandlerSelector {
    /// Whether `element` is covered by this selector.
    #[must_use]
    pub fn matches(&self, element: &dyn ElementHandle) -> bool {
        match self {
            Self::Css(selector) => element.matches(selector),
            Self::Predicate(f) => f(element),
        }
    }
}

impl From<&str> for HandlerSelector {
    fn from(selector: &str) -> Self {
        Self::Css(selector.to_string())
    }
}

impl From<String> for HandlerSelector {
    fn from(selector: String) -> Self {
        Self::Css(selector)
    }
}

impl fmt::Debug for HandlerSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(selector) => f.debug_tuple("Css").field(selector).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Default binding behavior for elements matching `selector`.
#[derive(Debug, Clone)]
pub struct ElementTypeHandler {
    pub selector: HandlerSelector,
    pub options: BindingOptions,
}

impl ElementTypeHandler {
    #[must_use]
    pub fn new(selector: impl Into<HandlerSelector>, options: BindingOptions) -> Self {
        Self {
            selector: selector.into(),
            options,
        }
    }

    /// Handler matched by an arbitrary predicate.
    pub fn with_predicate(
        predicate: impl Fn(&dyn ElementHandle) -> bool + 'static,
        options: BindingOptions,
    ) -> Self {
        Self {
            selector: HandlerSelector::Predicate(Rc::new(predicate)),
            options,
        }
    }
}

// ---------------------------------------------------------------------------
// EffectiveConfig
// ---------------------------------------------------------------------------

/// Stored values of a select binding's rendered options, by position.
#[derive(Debug, Clone, Default)]
pub struct OptionTable(Rc<RefCell<Vec<Value>>>);

impl OptionTable {
    /// Replace the table after a re-render.
    pub fn replace(&self, values: Vec<Value>) {
        *self.0.borrow_mut() = values;
    }

    /// Stored value of the option at `index` (`null` when out of range).
    #[must_use]
    pub fn get(&self, index: usize) -> Value {
        self.0.borrow().get(index).cloned().unwrap_or(Value::Null)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// Fully resolved configuration of one selector binding.
#[derive(Clone)]
pub struct EffectiveConfig {
    pub observe: Option<Observe>,
    pub events: Vec<String>,
    pub update_model: Gate,
    pub update_view: Gate,
    pub update_method: String,
    pub on_get: Option<Transform>,
    pub on_set: Option<Transform>,
    pub get_val: Rc<GetValFn>,
    pub update: Rc<UpdateFn>,
    pub after_update: Option<AfterUpdateHook>,
    pub set_options: Map<String, Value>,
    pub attributes: Vec<AttributeBinding>,
    pub visible: Option<Gate>,
    pub visible_fn: Option<VisibilityHook>,
    pub select_options: Option<SelectOptions>,
    pub escape: bool,
    /// Per-binding side table of select option values.
    pub option_table: OptionTable,
}

impl fmt::Debug for EffectiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveConfig")
            .field("observe", &self.observe)
            .field("events", &self.events)
            .field("update_model", &self.update_model)
            .field("update_view", &self.update_view)
            .field("update_method", &self.update_method)
            .field("escape", &self.escape)
            .field("attributes", &self.attributes.len())
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// Selector used to bind the view's own root element.
pub const ROOT_SELECTOR: &str = ":el";

/// Ordered selector → declaration map of a view.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    entries: Vec<(String, BindingOptions)>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the binding for `selector`, replacing any earlier one in place.
    #[must_use]
    pub fn bind(mut self, selector: impl Into<String>, options: impl Into<BindingOptions>) -> Self {
        self.insert(selector, options);
        self
    }

    /// In-place form of [`bind`](Self::bind).
    pub fn insert(&mut self, selector: impl Into<String>, options: impl Into<BindingOptions>) {
        let selector = selector.into();
        let options = options.into();
        match self.entries.iter_mut().find(|(s, _)| *s == selector) {
            Some(entry) => entry.1 = options,
            None => self.entries.push((selector, options)),
        }
    }

    /// Declaration for `selector`.
    #[must_use]
    pub fn get(&self, selector: &str) -> Option<&BindingOptions> {
        self.entries
            .iter()
            .find(|(s, _)| s == selector)
            .map(|(_, options)| options)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BindingOptions)> {
        self.entries.iter().map(|(s, o)| (s.as_str(), o))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
