#![forbid(unsafe_code)]

//! [`ElementHandle`] over document nodes.
//!
//! A [`Selection`] is an ordered set of nodes of one [`Document`]. Besides
//! the handle capability it offers the test-side operations a browser user
//! would perform: typing into inputs, ticking boxes, picking options and
//! firing events.
//!
//! # Event dispatch
//!
//! [`Selection::trigger`] bubbles from each selected node up to the root.
//! A listener registered with a delegate selector fires when the target, or
//! an ancestor strictly below the listening node, matches that selector.
//! Listeners are collected before any of them runs, and the first error
//! aborts the dispatch.
//!
//! # Form state
//!
//! | Element | `val` read | `val` write |
//! |---------|------------|-------------|
//! | `input` (checkbox/radio) | `value` attribute, default `"on"` | `value` attribute |
//! | `input`, other | `value` property, else attribute, else `""` | `value` property |
//! | `textarea` | `value` property, else text content | `value` property |
//! | `select` | selected option value(s) | select matching options |

use std::rc::Rc;

use ahash::AHashSet;
use stickit_core::value::{display_string, escape_html, is_truthy};
use stickit_core::{
    DomEvent, ElementHandle, ElementRef, Listener, OptionEntry, Result, StickitError, Value,
};
use stickit_runtime::is_boolean_property;

use crate::dom::{Arena, Delegate, Document, ListenerRecord, NodeId};
use crate::selector::SelectorList;

const DEFAULT_CHOICE_VALUE: &str = "on";

/// Ordered node set of one document.
#[derive(Clone)]
pub struct Selection {
    doc: Document,
    nodes: Vec<NodeId>,
}

fn parse_selector(selector: &str) -> Option<SelectorList> {
    match SelectorList::parse(selector) {
        Ok(list) => Some(list),
        Err(err) => {
            tracing::warn!(selector, %err, "invalid selector; matching nothing");
            None
        }
    }
}

fn is_choice_input(arena: &Arena, id: NodeId) -> bool {
    let node = arena.node(id);
    node.tag == "input" && matches!(node.attr("type"), Some("checkbox" | "radio"))
}

fn is_multiple(arena: &Arena, id: NodeId) -> bool {
    arena.node(id).flag("multiple")
}

fn options_of(arena: &Arena, id: NodeId) -> Vec<NodeId> {
    arena
        .descendants(id)
        .into_iter()
        .filter(|option| arena.node(*option).tag == "option")
        .collect()
}

fn option_value(arena: &Arena, id: NodeId) -> String {
    match arena.node(id).attr("value") {
        Some(value) => value.to_string(),
        None => arena.text(id),
    }
}

/// Indexes of the selected options of select `id`, resolved the way a
/// browser reports them.
fn selected_indexes(arena: &Arena, id: NodeId) -> Vec<usize> {
    let options = options_of(arena, id);
    let selected: Vec<usize> = options
        .iter()
        .enumerate()
        .filter(|(_, option)| arena.node(**option).flag("selected"))
        .map(|(index, _)| index)
        .collect();
    if is_multiple(arena, id) {
        return selected;
    }
    match selected.last() {
        Some(last) => vec![*last],
        None if options.is_empty() => Vec::new(),
        None => vec![0],
    }
}

fn read_val(arena: &Arena, id: NodeId) -> Value {
    let node = arena.node(id);
    match node.tag.as_str() {
        "select" => {
            let options = options_of(arena, id);
            let mut values = selected_indexes(arena, id)
                .into_iter()
                .map(|index| Value::String(option_value(arena, options[index])));
            if is_multiple(arena, id) {
                Value::Array(values.collect())
            } else {
                values.next().unwrap_or(Value::Null)
            }
        }
        "option" => Value::String(option_value(arena, id)),
        "textarea" => match node.props.get("value") {
            Some(value) => value.clone(),
            None => Value::String(arena.text(id)),
        },
        _ if is_choice_input(arena, id) => {
            Value::String(node.attr("value").unwrap_or(DEFAULT_CHOICE_VALUE).to_string())
        }
        _ => match (node.props.get("value"), node.attr("value")) {
            (Some(value), _) => value.clone(),
            (None, Some(attr)) => Value::String(attr.to_string()),
            (None, None) => Value::String(String::new()),
        },
    }
}

fn write_val(arena: &mut Arena, id: NodeId, value: &Value) {
    if arena.node(id).tag == "select" {
        let wanted: Vec<String> = match value {
            Value::Array(items) => items.iter().map(display_string).collect(),
            other => vec![display_string(other)],
        };
        for option in options_of(arena, id) {
            let selected = wanted.contains(&option_value(arena, option));
            arena
                .node_mut(option)
                .props
                .insert("selected".into(), Value::Bool(selected));
        }
        return;
    }
    let text = display_string(value);
    if is_choice_input(arena, id) {
        arena.node_mut(id).set_attr("value", Some(text));
    } else {
        arena
            .node_mut(id)
            .props
            .insert("value".into(), Value::String(text));
    }
}

fn radio_group(arena: &Arena, id: NodeId) -> Vec<NodeId> {
    let node = arena.node(id);
    let Some(name) = node.attr("name") else {
        return Vec::new();
    };
    if node.tag != "input" || node.attr("type") != Some("radio") {
        return Vec::new();
    }
    (0..arena.nodes.len())
        .map(NodeId)
        .filter(|other| {
            *other != id && {
                let data = arena.node(*other);
                data.tag == "input"
                    && data.attr("type") == Some("radio")
                    && data.attr("name") == Some(name)
            }
        })
        .collect()
}

/// The select an option belongs to, looking through an optgroup.
fn owning_select(arena: &Arena, id: NodeId) -> Option<NodeId> {
    arena
        .ancestors(id)
        .take(2)
        .find(|ancestor| arena.node(*ancestor).tag == "select")
}

fn set_flag(arena: &mut Arena, id: NodeId, name: &str, on: bool) {
    arena
        .node_mut(id)
        .props
        .insert(name.to_string(), Value::Bool(on));
}

impl Selection {
    pub(crate) fn new(doc: Document, nodes: Vec<NodeId>) -> Self {
        Self { doc, nodes }
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    #[must_use]
    pub fn node_ids(&self) -> &[NodeId] {
        &self.nodes
    }

    fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Descendants matching `selector`, as a concrete selection.
    #[must_use]
    pub fn select(&self, selector: &str) -> Selection {
        let Some(list) = parse_selector(selector) else {
            return Self::new(self.doc.clone(), Vec::new());
        };
        let arena = self.doc.arena.borrow();
        let mut seen = AHashSet::new();
        let found = self
            .nodes
            .iter()
            .flat_map(|id| arena.descendants(*id))
            .filter(|id| list.matches(&arena.target(*id)))
            .filter(|id| seen.insert(*id))
            .collect();
        Self::new(self.doc.clone(), found)
    }

    /// The `index`-th node as its own selection.
    #[must_use]
    pub fn at(&self, index: usize) -> Selection {
        Self::new(self.doc.clone(), self.nodes.get(index).copied().into_iter().collect())
    }

    /// Dispatch `event` at every selected node.
    pub fn trigger(&self, event: &str) -> Result<()> {
        let dom_event = DomEvent::new(event);
        for target in &self.nodes {
            let listeners = self.collect_listeners(*target, event);
            tracing::trace!(event, fired = listeners.len(), "event dispatched");
            for listener in listeners {
                listener(&dom_event)?;
            }
        }
        Ok(())
    }

    fn collect_listeners(&self, target: NodeId, event: &str) -> Vec<Listener> {
        let arena = self.doc.arena.borrow();
        let path: Vec<NodeId> = std::iter::once(target)
            .chain(arena.ancestors(target))
            .collect();
        let mut fired = Vec::new();
        for (depth, current) in path.iter().enumerate() {
            for record in &arena.node(*current).listeners {
                if record.event != event {
                    continue;
                }
                let fires = match &record.delegate {
                    Delegate::Any => true,
                    Delegate::Never => false,
                    Delegate::Matching(list) => path[..depth]
                        .iter()
                        .any(|below| list.matches(&arena.target(*below))),
                };
                if fires {
                    fired.push(Rc::clone(&record.listener));
                }
            }
        }
        fired
    }

    /// Set the form value of every node without firing events.
    pub fn set_value(&self, value: &str) {
        let mut arena = self.doc.arena.borrow_mut();
        for id in &self.nodes {
            write_val(&mut arena, *id, &Value::String(value.to_string()));
        }
    }

    /// Set the form value, then fire `event`.
    pub fn input(&self, value: &str, event: &str) -> Result<()> {
        self.set_value(value);
        self.trigger(event)
    }

    /// Tick or untick every node.
    pub fn set_checked(&self, checked: bool) {
        self.set_prop("checked", &Value::Bool(checked));
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        is_truthy(&self.prop("checked"))
    }

    /// Select exactly the options at `indexes` of the first select node.
    pub fn select_indexes(&self, indexes: &[usize]) {
        let Some(id) = self.first() else {
            return;
        };
        let mut arena = self.doc.arena.borrow_mut();
        for (index, option) in options_of(&arena, id).into_iter().enumerate() {
            set_flag(&mut arena, option, "selected", indexes.contains(&index));
        }
    }

    /// Select the option at `index` of the first select node.
    pub fn select_index(&self, index: usize) {
        self.select_indexes(&[index]);
    }

    /// Labels of the options of the first select node.
    #[must_use]
    pub fn option_labels(&self) -> Vec<String> {
        let Some(id) = self.first() else {
            return Vec::new();
        };
        let arena = self.doc.arena.borrow();
        options_of(&arena, id)
            .into_iter()
            .map(|option| arena.text(option))
            .collect()
    }

    /// Enclosing group label of each option of the first select node.
    #[must_use]
    pub fn option_groups(&self) -> Vec<Option<String>> {
        let Some(id) = self.first() else {
            return Vec::new();
        };
        let arena = self.doc.arena.borrow();
        options_of(&arena, id)
            .into_iter()
            .map(|option| {
                arena.node(option).parent.and_then(|parent| {
                    let data = arena.node(parent);
                    (data.tag == "optgroup").then(|| data.attr("label").unwrap_or_default().to_string())
                })
            })
            .collect()
    }

    /// Listeners attached to the selected nodes, across all namespaces.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        let arena = self.doc.arena.borrow();
        self.nodes
            .iter()
            .map(|id| arena.node(*id).listeners.len())
            .sum()
    }

    /// Whether the first node is shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.first()
            .is_some_and(|id| !self.doc.arena.borrow().node(id).hidden)
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.first().is_some_and(|id| {
            self.doc
                .arena
                .borrow()
                .node(id)
                .classes()
                .any(|c| c == class)
        })
    }

    /// Text content of the first node.
    #[must_use]
    pub fn text(&self) -> String {
        self.first()
            .map(|id| self.doc.arena.borrow().text(id))
            .unwrap_or_default()
    }

    /// Inner HTML of the first node.
    #[must_use]
    pub fn html(&self) -> String {
        self.first()
            .map(|id| self.doc.arena.borrow().html(id))
            .unwrap_or_default()
    }

    /// JSON description of the first node's subtree, for structural
    /// assertions.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        self.first()
            .map_or(Value::Null, |id| self.doc.arena.borrow().snapshot(id))
    }

    /// Form value of the first node.
    #[must_use]
    pub fn value(&self) -> Value {
        self.first()
            .map_or(Value::Null, |id| read_val(&self.doc.arena.borrow(), id))
    }

    fn each(&self, mut f: impl FnMut(&mut Arena, NodeId)) {
        let mut arena = self.doc.arena.borrow_mut();
        for id in &self.nodes {
            f(&mut arena, *id);
        }
    }

    fn edit_classes(&self, classes: &str, add: bool) {
        let names: Vec<&str> = classes.split_whitespace().collect();
        if names.is_empty() {
            return;
        }
        self.each(|arena, id| {
            let node = arena.node_mut(id);
            let mut current: Vec<String> = node.classes().map(str::to_string).collect();
            if add {
                for name in &names {
                    if !current.iter().any(|c| c == name) {
                        current.push((*name).to_string());
                    }
                }
            } else {
                current.retain(|c| !names.contains(&c.as_str()));
            }
            node.set_attr("class", Some(current.join(" ")));
        });
    }
}

impl ElementHandle for Selection {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn find(&self, selector: &str) -> ElementRef {
        Rc::new(self.select(selector))
    }

    fn matches(&self, selector: &str) -> bool {
        let Some(list) = parse_selector(selector) else {
            return false;
        };
        let arena = self.doc.arena.borrow();
        self.nodes.iter().any(|id| list.matches(&arena.target(*id)))
    }

    fn nodes(&self) -> Vec<ElementRef> {
        self.nodes
            .iter()
            .map(|id| Rc::new(Self::new(self.doc.clone(), vec![*id])) as ElementRef)
            .collect()
    }

    fn read(&self, strategy: &str) -> Result<Value> {
        let Some(id) = self.first() else {
            return match strategy {
                "text" | "html" | "val" => Ok(Value::Null),
                other => Err(StickitError::unsupported_strategy(other)),
            };
        };
        let arena = self.doc.arena.borrow();
        match strategy {
            "text" => Ok(Value::String(arena.text(id))),
            "html" => Ok(Value::String(arena.html(id))),
            "val" => Ok(read_val(&arena, id)),
            other => Err(StickitError::unsupported_strategy(other)),
        }
    }

    fn write(&self, strategy: &str, value: &Value) -> Result<()> {
        let content = match strategy {
            "text" => escape_html(&display_string(value)),
            "html" => display_string(value),
            "val" => {
                self.each(|arena, id| write_val(arena, id, value));
                return Ok(());
            }
            other => return Err(StickitError::unsupported_strategy(other)),
        };
        self.each(|arena, id| {
            arena.detach_children(id);
            arena.node_mut(id).content.clone_from(&content);
        });
        Ok(())
    }

    fn prop(&self, name: &str) -> Value {
        let Some(id) = self.first() else {
            return Value::Null;
        };
        let arena = self.doc.arena.borrow();
        if name == "value" {
            return read_val(&arena, id);
        }
        let node = arena.node(id);
        if is_boolean_property(name) {
            return Value::Bool(node.flag(name));
        }
        node.props.get(name).cloned().unwrap_or(Value::Null)
    }

    fn set_prop(&self, name: &str, value: &Value) {
        if name == "value" {
            self.each(|arena, id| write_val(arena, id, value));
            return;
        }
        let on = is_truthy(value);
        self.each(|arena, id| {
            if on && name == "checked" {
                for other in radio_group(arena, id) {
                    set_flag(arena, other, "checked", false);
                }
            }
            if on
                && name == "selected"
                && let Some(select) = owning_select(arena, id)
                && !is_multiple(arena, select)
            {
                for option in options_of(arena, select) {
                    set_flag(arena, option, "selected", false);
                }
            }
            let stored = if is_boolean_property(name) {
                Value::Bool(on)
            } else {
                value.clone()
            };
            arena.node_mut(id).props.insert(name.to_string(), stored);
        });
    }

    fn attr(&self, name: &str) -> Option<String> {
        let id = self.first()?;
        self.doc
            .arena
            .borrow()
            .node(id)
            .attr(name)
            .map(str::to_string)
    }

    fn set_attr(&self, name: &str, value: &Value) {
        let text = match value {
            Value::Null => None,
            other => Some(display_string(other)),
        };
        self.each(|arena, id| arena.node_mut(id).set_attr(name, text.clone()));
    }

    fn add_class(&self, classes: &str) {
        self.edit_classes(classes, true);
    }

    fn remove_class(&self, classes: &str) {
        self.edit_classes(classes, false);
    }

    fn show(&self) {
        self.each(|arena, id| arena.node_mut(id).hidden = false);
    }

    fn hide(&self) {
        self.each(|arena, id| arena.node_mut(id).hidden = true);
    }

    fn on(&self, event: &str, namespace: &str, delegate: Option<&str>, listener: Listener) {
        let filter = match delegate {
            None => Delegate::Any,
            Some(selector) => parse_selector(selector).map_or(Delegate::Never, Delegate::Matching),
        };
        self.each(|arena, id| {
            arena.node_mut(id).listeners.push(ListenerRecord {
                event: event.to_string(),
                namespace: namespace.to_string(),
                delegate: filter.clone(),
                listener: Rc::clone(&listener),
            });
        });
    }

    fn off(&self, namespace: &str) {
        self.each(|arena, id| {
            arena
                .node_mut(id)
                .listeners
                .retain(|record| record.namespace != namespace);
        });
    }

    fn set_options(&self, options: &[OptionEntry]) {
        self.each(|arena, id| {
            arena.detach_children(id);
            let mut group: Option<(String, NodeId)> = None;
            for entry in options {
                let parent = match &entry.group {
                    None => {
                        group = None;
                        id
                    }
                    Some(label) => {
                        let open = group
                            .as_ref()
                            .filter(|(current, _)| current == label)
                            .map(|(_, node)| *node);
                        match open {
                            Some(node) => node,
                            None => {
                                let node = arena.create(id, "optgroup");
                                arena.node_mut(node).set_attr("label", Some(label.clone()));
                                group = Some((label.clone(), node));
                                node
                            }
                        }
                    }
                };
                let option = arena.create(parent, "option");
                arena.node_mut(option).content = escape_html(&entry.label);
                set_flag(arena, option, "selected", entry.selected);
            }
        });
    }

    fn selected_options(&self) -> Vec<usize> {
        self.first()
            .map(|id| selected_indexes(&self.doc.arena.borrow(), id))
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arena = self.doc.arena.borrow();
        let tags: Vec<&str> = self
            .nodes
            .iter()
            .map(|id| arena.node(*id).tag.as_str())
            .collect();
        f.debug_struct("Selection").field("nodes", &tags).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::dom::el;
    use stickit_core::json;

    fn form() -> Selection {
        Document::new().mount(
            el("form")
                .child(el("input").id("name").attr("type", "text"))
                .child(el("input").attr("type", "radio").attr("name", "c").attr("value", "r"))
                .child(el("input").attr("type", "radio").attr("name", "c").attr("value", "g"))
                .child(el("textarea").text("notes"))
                .child(el("select").id("pick")),
        )
    }

    #[test]
    fn find_and_match() {
        let root = form();
        assert_eq!(root.find("input").len(), 3);
        assert_eq!(root.find(r#"input[type="radio"]"#).len(), 2);
        assert!(root.find("#name").matches("input"));
        assert!(root.find("#missing").is_empty());
        assert!(root.find("input[").is_empty());
    }

    #[test]
    fn text_writes_escape_and_html_writes_do_not() {
        let root = form();
        root.write("text", &json!("<b>")).unwrap();
        assert_eq!(root.html(), "&lt;b&gt;");
        assert_eq!(root.read("text").unwrap(), json!("<b>"));
        root.write("html", &json!("<i>x</i>")).unwrap();
        assert_eq!(root.text(), "x");
        assert!(root.write("outer", &json!(1)).is_err());
    }

    #[test]
    fn form_values() {
        let root = form();
        let name = root.select("#name");
        assert_eq!(name.value(), json!(""));
        name.set_value("Ann");
        assert_eq!(name.read("val").unwrap(), json!("Ann"));
        assert_eq!(root.select("textarea").read("val").unwrap(), json!("notes"));
        assert_eq!(root.select("[value=g]").read("val").unwrap(), json!("g"));
    }

    #[test]
    fn checking_a_radio_unchecks_its_group() {
        let root = form();
        let radios = root.select(r#"[type="radio"]"#);
        radios.at(0).set_checked(true);
        radios.at(1).set_checked(true);
        assert!(!radios.at(0).is_checked());
        assert!(radios.at(1).is_checked());
        assert_eq!(root.find(":checked").len(), 1);
    }

    #[test]
    fn options_render_with_groups() {
        let root = form();
        let select = root.select("#pick");
        select.set_options(&[
            OptionEntry { group: None, label: String::new(), selected: false },
            OptionEntry { group: Some("A".into()), label: "a1".into(), selected: false },
            OptionEntry { group: Some("A".into()), label: "a2".into(), selected: true },
            OptionEntry { group: Some("B".into()), label: "b1".into(), selected: false },
        ]);
        assert_eq!(select.option_labels(), vec!["", "a1", "a2", "b1"]);
        assert_eq!(
            select.option_groups(),
            vec![None, Some("A".into()), Some("A".into()), Some("B".into())]
        );
        assert_eq!(select.find("optgroup").len(), 2);
        assert_eq!(select.selected_options(), vec![2]);
        select.select_index(3);
        assert_eq!(select.selected_options(), vec![3]);
    }

    #[test]
    fn single_select_defaults_to_first_option() {
        let select = Document::new().mount(el("select"));
        assert!(select.selected_options().is_empty());
        select.set_options(&[
            OptionEntry { group: None, label: "x".into(), selected: false },
            OptionEntry { group: None, label: "y".into(), selected: false },
        ]);
        assert_eq!(select.selected_options(), vec![0]);
        assert_eq!(select.value(), json!("x"));
    }

    #[test]
    fn delegated_listeners_fire_for_matching_targets() {
        let root = form();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        root.on(
            "change",
            ".ns",
            Some("#name"),
            Rc::new(move |_: &DomEvent| {
                counter.set(counter.get() + 1);
                Ok(())
            }),
        );
        root.select("#name").trigger("change").unwrap();
        root.select("textarea").trigger("change").unwrap();
        root.trigger("change").unwrap();
        assert_eq!(hits.get(), 1);
        assert_eq!(root.listener_count(), 1);
        root.off(".other");
        assert_eq!(root.listener_count(), 1);
        root.off(".ns");
        assert_eq!(root.listener_count(), 0);
    }

    #[test]
    fn listener_errors_propagate() {
        let root = form();
        root.on(
            "keyup",
            ".ns",
            None,
            Rc::new(|_: &DomEvent| Err(StickitError::callback("boom"))),
        );
        assert!(root.select("#name").trigger("keyup").is_err());
        assert!(root.select("#name").trigger("change").is_ok());
    }

    #[test]
    fn classes_and_visibility() {
        let root = form();
        root.add_class("a b");
        root.add_class("b c");
        root.remove_class("a");
        assert_eq!(root.attr("class").as_deref(), Some("b c"));
        assert!(root.is_visible());
        root.hide();
        assert!(!root.is_visible());
        root.show();
        assert!(root.is_visible());
    }
}
