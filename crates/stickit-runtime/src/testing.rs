#![forbid(unsafe_code)]

//! Minimal flat element used by unit tests.
//!
//! A `StubElement` is one node with a tag, attributes, properties, content
//! per strategy and direct children. Selector support is limited to what the
//! unit tests need: `tag`, `[attr="v"]`, `tag[attr="v"]` and comma lists.
//! Full DOM behavior lives in the harness crate.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ahash::AHashMap;
use stickit_core::{
    DomEvent, ElementHandle, ElementRef, Listener, OptionEntry, Result, StickitError, Value,
};

struct Registered {
    event: String,
    namespace: String,
    listener: Listener,
}

#[derive(Default)]
pub(crate) struct StubElement {
    tag: String,
    attrs: RefCell<AHashMap<String, String>>,
    props: RefCell<AHashMap<String, Value>>,
    content: RefCell<AHashMap<String, Value>>,
    classes: RefCell<Vec<String>>,
    visible: Cell<bool>,
    children: RefCell<Vec<Rc<StubElement>>>,
    listeners: RefCell<Vec<Registered>>,
    options: RefCell<Vec<OptionEntry>>,
}

impl StubElement {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            visible: Cell::new(true),
            ..Self::default()
        }
    }

    pub(crate) fn with_attr(self, name: &str, value: &str) -> Self {
        self.attrs
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        self
    }

    pub(crate) fn with_child(self, child: StubElement) -> Self {
        self.children.borrow_mut().push(Rc::new(child));
        self
    }

    pub(crate) fn child(&self, index: usize) -> Rc<StubElement> {
        Rc::clone(&self.children.borrow()[index])
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub(crate) fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().iter().any(|c| c == class)
    }

    pub(crate) fn rendered_options(&self) -> Vec<OptionEntry> {
        self.options.borrow().clone()
    }

    /// Run every listener registered for `event`.
    pub(crate) fn fire(&self, event: &str) -> Result<()> {
        let matching: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|r| r.event == event)
            .map(|r| Rc::clone(&r.listener))
            .collect();
        let dom_event = DomEvent::new(event);
        for listener in matching {
            listener(&dom_event)?;
        }
        Ok(())
    }

    fn matches_simple(&self, selector: &str) -> bool {
        let selector = selector.trim();
        let (tag, rest) = match selector.find('[') {
            Some(at) => selector.split_at(at),
            None => (selector, ""),
        };
        if !tag.is_empty() && tag != self.tag {
            return false;
        }
        if rest.is_empty() {
            return !tag.is_empty();
        }
        let inner = rest.trim_start_matches('[').trim_end_matches(']');
        match inner.split_once('=') {
            Some((name, value)) => {
                let value = value.trim_matches('"');
                self.attrs.borrow().get(name).map(String::as_str) == Some(value)
            }
            None => self.attrs.borrow().contains_key(inner),
        }
    }
}

impl ElementHandle for StubElement {
    fn len(&self) -> usize {
        1
    }

    fn find(&self, selector: &str) -> ElementRef {
        let found = self
            .children
            .borrow()
            .iter()
            .find(|child| child.matches(selector))
            .cloned();
        match found {
            Some(child) => child as ElementRef,
            None => Rc::new(EmptySelection),
        }
    }

    fn matches(&self, selector: &str) -> bool {
        selector.split(',').any(|part| self.matches_simple(part))
    }

    fn nodes(&self) -> Vec<ElementRef> {
        Vec::new()
    }

    fn read(&self, strategy: &str) -> Result<Value> {
        match strategy {
            "text" | "html" | "val" => Ok(self
                .content
                .borrow()
                .get(strategy)
                .cloned()
                .unwrap_or_else(|| Value::String(String::new()))),
            other => Err(StickitError::unsupported_strategy(other)),
        }
    }

    fn write(&self, strategy: &str, value: &Value) -> Result<()> {
        match strategy {
            "text" | "html" | "val" => {
                self.content
                    .borrow_mut()
                    .insert(strategy.to_string(), value.clone());
                Ok(())
            }
            other => Err(StickitError::unsupported_strategy(other)),
        }
    }

    fn prop(&self, name: &str) -> Value {
        self.props.borrow().get(name).cloned().unwrap_or(Value::Null)
    }

    fn set_prop(&self, name: &str, value: &Value) {
        self.props
            .borrow_mut()
            .insert(name.to_string(), value.clone());
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.attrs.borrow().get(name).cloned()
    }

    fn set_attr(&self, name: &str, value: &Value) {
        let mut attrs = self.attrs.borrow_mut();
        match value {
            Value::Null => {
                attrs.remove(name);
            }
            Value::String(s) => {
                attrs.insert(name.to_string(), s.clone());
            }
            other => {
                attrs.insert(name.to_string(), other.to_string());
            }
        }
    }

    fn add_class(&self, classes: &str) {
        let mut current = self.classes.borrow_mut();
        for class in classes.split_whitespace() {
            if !current.iter().any(|c| c == class) {
                current.push(class.to_string());
            }
        }
    }

    fn remove_class(&self, classes: &str) {
        let remove: Vec<&str> = classes.split_whitespace().collect();
        self.classes
            .borrow_mut()
            .retain(|c| !remove.contains(&c.as_str()));
    }

    fn show(&self) {
        self.visible.set(true);
    }

    fn hide(&self) {
        self.visible.set(false);
    }

    fn on(&self, event: &str, namespace: &str, _delegate: Option<&str>, listener: Listener) {
        self.listeners.borrow_mut().push(Registered {
            event: event.to_string(),
            namespace: namespace.to_string(),
            listener,
        });
    }

    fn off(&self, namespace: &str) {
        self.listeners
            .borrow_mut()
            .retain(|r| r.namespace != namespace);
    }

    fn set_options(&self, options: &[OptionEntry]) {
        *self.options.borrow_mut() = options.to_vec();
    }

    fn selected_options(&self) -> Vec<usize> {
        self.options
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, option)| option.selected)
            .map(|(index, _)| index)
            .collect()
    }
}

/// Selection that matched nothing.
struct EmptySelection;

impl ElementHandle for EmptySelection {
    fn len(&self) -> usize {
        0
    }

    fn find(&self, _selector: &str) -> ElementRef {
        Rc::new(EmptySelection)
    }

    fn matches(&self, _selector: &str) -> bool {
        false
    }

    fn nodes(&self) -> Vec<ElementRef> {
        Vec::new()
    }

    fn read(&self, _strategy: &str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn write(&self, _strategy: &str, _value: &Value) -> Result<()> {
        Ok(())
    }

    fn prop(&self, _name: &str) -> Value {
        Value::Null
    }

    fn set_prop(&self, _name: &str, _value: &Value) {}

    fn attr(&self, _name: &str) -> Option<String> {
        None
    }

    fn set_attr(&self, _name: &str, _value: &Value) {}

    fn add_class(&self, _classes: &str) {}

    fn remove_class(&self, _classes: &str) {}

    fn show(&self) {}

    fn hide(&self) {}

    fn on(&self, _event: &str, _namespace: &str, _delegate: Option<&str>, _listener: Listener) {}

    fn off(&self, _namespace: &str) {}

    fn set_options(&self, _options: &[OptionEntry]) {}

    fn selected_options(&self) -> Vec<usize> {
        Vec::new()
    }
}
