#![forbid(unsafe_code)]

//! Element handle capability.
//!
//! An [`ElementHandle`] is a selection of zero or more rendered nodes, in the
//! spirit of a jQuery collection. Reads generally consult the first node;
//! writes apply to every node. The binding engine never touches a concrete
//! UI toolkit; it only drives this trait.
//!
//! # Read/write strategies
//!
//! [`ElementHandle::read`] and [`ElementHandle::write`] take a strategy name:
//!
//! | Strategy | Meaning |
//! |----------|---------|
//! | `"text"` | Text content (escaped on write) |
//! | `"html"` | Raw HTML content |
//! | `"val"`  | Form value |
//!
//! Implementations return [`StickitError::UnsupportedStrategy`] for names
//! they do not know.
//!
//! [`StickitError::UnsupportedStrategy`]: crate::StickitError::UnsupportedStrategy

use std::rc::Rc;

use serde_json::Value;

use crate::error::Result;

/// Shared, dynamically typed element selection.
pub type ElementRef = Rc<dyn ElementHandle>;

/// Callback attached to an element event.
pub type Listener = Rc<dyn Fn(&DomEvent) -> Result<()>>;

/// A UI event delivered to a [`Listener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    /// Event type, e.g. `"change"` or `"keyup"`.
    pub kind: String,
}

impl DomEvent {
    /// Create an event of the given type.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

/// One rendered `<option>` of a list-backed element.
///
/// Consecutive entries sharing the same `group` label are rendered inside
/// one option group; `group: None` renders at the top level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    /// Label of the enclosing option group, if any.
    pub group: Option<String>,
    /// Visible option text.
    pub label: String,
    /// Whether the option starts out selected.
    pub selected: bool,
}

/// Capability over a selection of UI nodes.
pub trait ElementHandle {
    /// Number of nodes in the selection.
    fn len(&self) -> usize;

    /// Whether the selection matched nothing.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Descendants of the selection matching `selector`.
    fn find(&self, selector: &str) -> ElementRef;

    /// Whether any node in the selection matches `selector`.
    fn matches(&self, selector: &str) -> bool;

    /// Each node of the selection as its own single-node handle.
    fn nodes(&self) -> Vec<ElementRef>;

    /// Read the first node's content using `strategy`.
    fn read(&self, strategy: &str) -> Result<Value>;

    /// Write `value` into every node using `strategy`.
    fn write(&self, strategy: &str, value: &Value) -> Result<()>;

    /// Read a DOM property of the first node (`null` when unset).
    fn prop(&self, name: &str) -> Value;

    /// Set a DOM property on every node.
    fn set_prop(&self, name: &str, value: &Value);

    /// Read an attribute of the first node.
    fn attr(&self, name: &str) -> Option<String>;

    /// Set an attribute on every node; `null` removes it.
    fn set_attr(&self, name: &str, value: &Value);

    /// Add whitespace-separated class names.
    fn add_class(&self, classes: &str);

    /// Remove whitespace-separated class names.
    fn remove_class(&self, classes: &str);

    /// Make the selection visible.
    fn show(&self);

    /// Hide the selection.
    fn hide(&self);

    /// Attach `listener` for `event` under `namespace`.
    ///
    /// With `delegate`, the listener fires only for events whose target (or
    /// an ancestor below the selection) matches that selector.
    fn on(&self, event: &str, namespace: &str, delegate: Option<&str>, listener: Listener);

    /// Detach every listener registered under `namespace`.
    fn off(&self, namespace: &str);

    /// Replace the option list of a list-backed element.
    fn set_options(&self, options: &[OptionEntry]);

    /// Positions (in [`set_options`](Self::set_options) order) of the
    /// currently selected options.
    fn selected_options(&self) -> Vec<usize>;
}
