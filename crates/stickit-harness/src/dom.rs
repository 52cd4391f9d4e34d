#![forbid(unsafe_code)]

//! In-memory document tree.
//!
//! A [`Document`] is an arena of nodes behind a shared `RefCell`. Nodes are
//! addressed by [`NodeId`] and never freed; detached nodes simply lose their
//! parent link. Trees are built with [`el`] and mounted with
//! [`Document::mount`], which returns a [`Selection`] of the new root.
//!
//! Content is modeled loosely: an element either has child elements or a
//! content string holding raw HTML. Writing text or HTML into an element
//! detaches its children.
//!
//! # Invariants
//!
//! 1. `children` and `parent` links agree for every attached node.
//! 2. No borrow of the arena is held while a listener runs, so listeners
//!    may freely read and mutate the document.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;
use stickit_core::{Listener, Value};

use crate::selection::Selection;
use crate::selector::{Pseudo, SelectorList, SelectorTarget};

/// Index of a node in its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Filter applied to a listener before it fires.
#[derive(Clone)]
pub(crate) enum Delegate {
    /// Fire for every event reaching the node.
    Any,
    /// Fire when the target, or an ancestor below the listening node,
    /// matches.
    Matching(SelectorList),
    /// The delegate selector failed to parse; never fire.
    Never,
}

pub(crate) struct ListenerRecord {
    pub(crate) event: String,
    pub(crate) namespace: String,
    pub(crate) delegate: Delegate,
    pub(crate) listener: Listener,
}

pub(crate) struct NodeData {
    pub(crate) tag: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) props: AHashMap<String, Value>,
    pub(crate) content: String,
    pub(crate) hidden: bool,
    pub(crate) listeners: Vec<ListenerRecord>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent: None,
            children: Vec::new(),
            attrs: Vec::new(),
            props: AHashMap::new(),
            content: String::new(),
            hidden: false,
            listeners: Vec::new(),
        }
    }

    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: Option<String>) {
        let position = self.attrs.iter().position(|(n, _)| n == name);
        match (position, value) {
            (Some(i), Some(value)) => self.attrs[i].1 = value,
            (None, Some(value)) => self.attrs.push((name.to_string(), value)),
            (Some(i), None) => {
                self.attrs.remove(i);
            }
            (None, None) => {}
        }
    }

    pub(crate) fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    /// Boolean state: an explicit property wins over attribute presence.
    pub(crate) fn flag(&self, name: &str) -> bool {
        match self.props.get(name) {
            Some(Value::Bool(set)) => *set,
            Some(other) => stickit_core::value::is_truthy(other),
            None => self.attr(name).is_some(),
        }
    }
}

#[derive(Default)]
pub(crate) struct Arena {
    pub(crate) nodes: Vec<NodeData>,
}

impl Arena {
    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, tag: &str) -> NodeId {
        self.nodes.push(NodeData::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn append(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    pub(crate) fn create(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.alloc(tag);
        self.append(parent, id);
        id
    }

    pub(crate) fn detach_children(&mut self, id: NodeId) {
        for child in std::mem::take(&mut self.node_mut(id).children) {
            self.node_mut(child).parent = None;
        }
    }

    /// Ancestors of `id`, nearest first.
    pub(crate) fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, |p| self.node(*p).parent)
    }

    /// Descendants of `id` in document order, excluding `id`.
    pub(crate) fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.node(next).children.iter().rev().copied());
        }
        out
    }

    pub(crate) fn target(&self, id: NodeId) -> NodeView<'_> {
        NodeView { arena: self, id }
    }

    /// Text content with markup stripped and entities decoded.
    pub(crate) fn text(&self, id: NodeId) -> String {
        let node = self.node(id);
        if node.children.is_empty() {
            return stickit_core::value::unescape_html(&strip_tags(&node.content));
        }
        node.children.iter().map(|child| self.text(*child)).collect()
    }

    /// Inner HTML, serializing child elements when present.
    pub(crate) fn html(&self, id: NodeId) -> String {
        let node = self.node(id);
        if node.children.is_empty() {
            return node.content.clone();
        }
        let mut out = String::new();
        for child in &node.children {
            let data = self.node(*child);
            out.push('<');
            out.push_str(&data.tag);
            for (name, value) in &data.attrs {
                out.push_str(&format!(" {name}=\"{value}\""));
            }
            out.push('>');
            out.push_str(&self.html(*child));
            out.push_str(&format!("</{}>", data.tag));
        }
        out
    }

    /// Structural JSON form of the subtree at `id`.
    pub(crate) fn snapshot(&self, id: NodeId) -> serde_json::Value {
        let node = self.node(id);
        let mut out = serde_json::Map::new();
        out.insert("tag".into(), node.tag.clone().into());
        if !node.attrs.is_empty() {
            let attrs: serde_json::Map<String, serde_json::Value> = node
                .attrs
                .iter()
                .map(|(name, value)| (name.clone(), value.clone().into()))
                .collect();
            out.insert("attrs".into(), attrs.into());
        }
        if node.hidden {
            out.insert("hidden".into(), true.into());
        }
        if node.children.is_empty() {
            if !node.content.is_empty() {
                out.insert("text".into(), self.text(id).into());
            }
        } else {
            let children: Vec<serde_json::Value> =
                node.children.iter().map(|child| self.snapshot(*child)).collect();
            out.insert("children".into(), children.into());
        }
        out.into()
    }

    fn build(&mut self, builder: ElementBuilder) -> NodeId {
        let id = self.alloc(&builder.tag);
        let node = self.node_mut(id);
        node.attrs = builder.attrs;
        node.content = builder.content;
        for child in builder.children {
            let child = self.build(child);
            self.append(id, child);
        }
        id
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Borrowed node used for selector matching.
pub(crate) struct NodeView<'a> {
    arena: &'a Arena,
    pub(crate) id: NodeId,
}

impl SelectorTarget for NodeView<'_> {
    fn tag(&self) -> &str {
        &self.arena.node(self.id).tag
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.arena.node(self.id).attr(name).map(str::to_string)
    }

    fn has_class(&self, class: &str) -> bool {
        self.arena.node(self.id).classes().any(|c| c == class)
    }

    fn state(&self, pseudo: Pseudo) -> bool {
        let node = self.arena.node(self.id);
        match pseudo {
            Pseudo::Checked => node.flag("checked"),
            Pseudo::Selected => node.flag("selected"),
            Pseudo::Disabled => node.flag("disabled"),
        }
    }

    fn parent(&self) -> Option<Self> {
        self.arena.node(self.id).parent.map(|id| NodeView {
            arena: self.arena,
            id,
        })
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Shared handle to an in-memory document.
#[derive(Clone, Default)]
pub struct Document {
    pub(crate) arena: Rc<RefCell<Arena>>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build `tree` into the document and select its root.
    #[must_use]
    pub fn mount(&self, tree: ElementBuilder) -> Selection {
        let id = self.arena.borrow_mut().build(tree);
        Selection::new(self.clone(), vec![id])
    }

    /// Number of nodes ever allocated, attached or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.arena.borrow().nodes.len()
    }

    /// Whether both handles refer to the same document.
    #[must_use]
    pub fn same_document(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.node_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Element tree under construction.
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    tag: String,
    attrs: Vec<(String, String)>,
    content: String,
    children: Vec<ElementBuilder>,
}

/// Start building an element with `tag`.
#[must_use]
pub fn el(tag: &str) -> ElementBuilder {
    ElementBuilder {
        tag: tag.to_string(),
        attrs: Vec::new(),
        content: String::new(),
        children: Vec::new(),
    }
}

impl ElementBuilder {
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.retain(|(n, _)| n != name);
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// Shorthand for `attr("id", id)`.
    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Set a boolean attribute such as `checked` or `multiple`.
    #[must_use]
    pub fn flag(self, name: &str) -> Self {
        self.attr(name, "")
    }

    /// Raw HTML content for a leaf element.
    #[must_use]
    pub fn html(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    /// Text content for a leaf element.
    #[must_use]
    pub fn text(self, text: &str) -> Self {
        let escaped = stickit_core::value::escape_html(text);
        self.html(&escaped)
    }

    #[must_use]
    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = ElementBuilder>) -> Self {
        self.children.extend(children);
        self
    }
}
