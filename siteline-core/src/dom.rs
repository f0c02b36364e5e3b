//! In-memory document the overlay engine renders into.
//!
//! The engine never talks to a browser directly. Everything it needs from a
//! DOM (node tree, ids and classes, focus, body style, document-level key
//! listeners, form values) lives here, so the lifecycle logic can be driven
//! and inspected from plain Rust.
//!
//! Nodes are stored in a slot map. A [`NodeId`] is a lookup key only: holding
//! one keeps nothing alive, and [`Document::contains`] tells whether the node
//! is still attached under `<body>`.

use std::collections::BTreeMap;

use slotmap::{new_key_type, SlotMap};

use crate::error::DomError;

new_key_type! {
    /// Key of a node in a [`Document`].
    pub struct NodeId;

    /// Handle of a document-level key listener registration.
    pub struct ListenerId;
}

/// Tags that take keyboard focus without an explicit `tabindex`.
const INTERACTIVE_TAGS: &[&str] = &["button", "input", "select", "textarea"];

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    value: String,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            value: String::new(),
        }
    }
}

/// Declarative element tree, built into a [`Document`] with [`Document::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<Markup>,
    },
    Text(String),
}

impl Markup {
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Add an attribute. No-op on text nodes.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Element { attrs, .. } = &mut self {
            attrs.push((name.into(), value.into()));
        }
        self
    }

    #[must_use]
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Append a child. No-op on text nodes.
    #[must_use]
    pub fn child(mut self, child: Markup) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    #[must_use]
    pub fn children(mut self, more: impl IntoIterator<Item = Markup>) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.extend(more);
        }
        self
    }
}

/// A document with a `<html><body>` skeleton.
#[derive(Debug)]
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    html: NodeId,
    body: NodeId,
    active: Option<NodeId>,
    body_style: BTreeMap<String, String>,
    scroll_locks: usize,
    key_listeners: SlotMap<ListenerId, ()>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let html = nodes.insert(Node::new(NodeKind::Element {
            tag: "html".to_string(),
            attrs: BTreeMap::new(),
        }));
        let body = nodes.insert(Node::new(NodeKind::Element {
            tag: "body".to_string(),
            attrs: BTreeMap::new(),
        }));
        nodes[body].parent = Some(html);
        nodes[html].children.push(body);

        Self {
            nodes,
            html,
            body,
            active: None,
            body_style: BTreeMap::new(),
            scroll_locks: 0,
            key_listeners: SlotMap::with_key(),
        }
    }

    #[inline]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Element {
            tag: tag.into(),
            attrs: BTreeMap::new(),
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Text(text.into())))
    }

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check(parent)?;
        self.check(child)?;
        if self.is_ancestor(child, parent) {
            return Err(DomError::Cycle { parent, child });
        }

        if let Some(old_parent) = self.nodes[child].parent {
            self.nodes[old_parent].children.retain(|&id| id != child);
        }
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Detach `child` from `parent`. The subtree stays addressable until
    /// [`Document::discard`] is called on it.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check(parent)?;
        self.check(child)?;
        if self.nodes[child].parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }

        self.nodes[parent].children.retain(|&id| id != child);
        self.nodes[child].parent = None;

        // Focus inside a detached subtree falls back to the body.
        if self.active.is_some_and(|active| self.is_ancestor(child, active)) {
            self.active = None;
        }
        Ok(())
    }

    /// Free `node` and all of its descendants, detaching first if needed.
    pub fn discard(&mut self, node: NodeId) {
        if node == self.html || node == self.body || !self.nodes.contains_key(node) {
            return;
        }
        if let Some(parent) = self.nodes[node].parent {
            // Parent and child are both live, so this cannot fail.
            let _ = self.remove_child(parent, node);
        }

        let mut pending = vec![node];
        while let Some(id) = pending.pop() {
            if let Some(removed) = self.nodes.remove(id) {
                pending.extend(removed.children);
            }
        }
    }

    /// Build `markup` and append it under `parent`, returning the new root.
    pub fn build(&mut self, parent: NodeId, markup: &Markup) -> Result<NodeId, DomError> {
        let node = match markup {
            Markup::Text(text) => self.create_text(text.clone()),
            Markup::Element {
                tag,
                attrs,
                children,
            } => {
                let node = self.create_element(tag.clone());
                for (name, value) in attrs {
                    self.set_attr(node, name, value);
                    if name == "value" {
                        self.set_value(node, value);
                    }
                }
                for child in children {
                    if let Err(err) = self.build(node, child) {
                        self.discard(node);
                        return Err(err);
                    }
                }
                node
            }
        };
        if let Err(err) = self.append_child(parent, node) {
            self.discard(node);
            return Err(err);
        }
        Ok(node)
    }

    /// Whether `node` is attached under the document body.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node) && self.is_ancestor(self.body, node)
    }

    /// Inclusive ancestry test: `is_ancestor(a, a)` is true.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map_or(&[], |n| n.children.as_slice())
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(node)?.kind {
            NodeKind::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            NodeKind::Text(_) => None,
        }
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(Node {
            kind: NodeKind::Element { attrs, .. },
            ..
        }) = self.nodes.get_mut(node)
        {
            attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(Node {
            kind: NodeKind::Element { attrs, .. },
            ..
        }) = self.nodes.get_mut(node)
        {
            attrs.remove(name);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// First attached element with the given `id` attribute, in document order.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.html)
            .into_iter()
            .find(|&node| self.attr(node, "id") == Some(id))
    }

    /// First element under `root` whose attribute `name` equals `value`.
    pub fn find_by_attr(&self, root: NodeId, name: &str, value: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&node| self.attr(node, name) == Some(value))
    }

    /// Innermost attached element whose own text children contain `needle`.
    pub fn find_text(&self, needle: &str) -> Option<NodeId> {
        self.descendants(self.body).into_iter().find_map(|node| {
            match &self.nodes[node].kind {
                NodeKind::Text(text) if text.contains(needle) => self.parent(node),
                _ => None,
            }
        })
    }

    /// Concatenated text of `node` and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(Node {
            kind: NodeKind::Text(text),
            ..
        }) = self.nodes.get(node)
        {
            out.push_str(text);
        }
        for id in self.descendants(node) {
            if let NodeKind::Text(text) = &self.nodes[id].kind {
                out.push_str(text);
            }
        }
        out
    }

    /// Descendants of `root` in document order, excluding `root` itself.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    /// Whether `node` accepts focus, either from the keyboard or by script.
    pub fn is_focusable(&self, node: NodeId) -> bool {
        let Some(tag) = self.tag(node) else {
            return false;
        };
        if self.attr(node, "disabled").is_some() {
            return false;
        }
        self.attr(node, "tabindex").is_some()
            || INTERACTIVE_TAGS.contains(&tag)
            || (tag == "a" && self.attr(node, "href").is_some())
    }

    /// The focused element, or `None` when focus rests on the body.
    pub fn active_element(&self) -> Option<NodeId> {
        self.active.filter(|&node| self.contains(node))
    }

    /// Move focus to `node`. Returns false when it is detached or not focusable.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.contains(node) || !self.is_focusable(node) {
            return false;
        }
        self.active = Some(node);
        true
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    pub fn body_style(&self, name: &str) -> Option<&str> {
        self.body_style.get(name).map(String::as_str)
    }

    pub fn set_body_style(&mut self, name: &str, value: &str) {
        self.body_style.insert(name.to_string(), value.to_string());
    }

    pub fn remove_body_style(&mut self, name: &str) {
        self.body_style.remove(name);
    }

    /// Take a page scroll lock. The first holder sets `overflow: hidden`.
    pub fn lock_scroll(&mut self) {
        self.scroll_locks += 1;
        if self.scroll_locks == 1 {
            self.set_body_style("overflow", "hidden");
        }
    }

    /// Release a page scroll lock. The last holder clears the overflow rule.
    pub fn unlock_scroll(&mut self) {
        match self.scroll_locks {
            0 => log::debug!("Scroll unlock without a matching lock"),
            1 => {
                self.scroll_locks = 0;
                self.remove_body_style("overflow");
            }
            _ => self.scroll_locks -= 1,
        }
    }

    #[inline]
    pub fn scroll_lock_count(&self) -> usize {
        self.scroll_locks
    }

    pub fn add_key_listener(&mut self) -> ListenerId {
        self.key_listeners.insert(())
    }

    pub fn remove_key_listener(&mut self, id: ListenerId) -> bool {
        self.key_listeners.remove(id).is_some()
    }

    pub fn key_listener_count(&self) -> usize {
        self.key_listeners.len()
    }

    /// Current form value of an input, select or textarea.
    pub fn value(&self, node: NodeId) -> &str {
        self.nodes.get(node).map_or("", |n| n.value.as_str())
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.value = value.to_string();
        }
    }

    fn check(&self, node: NodeId) -> Result<(), DomError> {
        if self.nodes.contains_key(node) {
            Ok(())
        } else {
            Err(DomError::UnknownNode(node))
        }
    }
}
