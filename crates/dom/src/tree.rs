//! Node arena and tree mutations.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

/// Identifies a node within one [`Document`].
///
/// Ids are minted by the owning document and stay valid for its lifetime;
/// detaching a node does not recycle its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-node state: identity, attributes, and the bits the action catalogue
/// observes and mutates.
#[derive(Debug, Clone)]
struct Node {
    /// Element tag, lowercase by convention.
    tag: String,
    /// Attribute map, including `id` and the engine's marker attributes.
    attrs: BTreeMap<String, String>,
    /// Class tokens, deduplicated.
    classes: BTreeSet<String>,
    /// Form-control value.
    value: String,
    /// Form-control checked state.
    checked: bool,
    /// Visibility flag toggled by show/hide/toggle.
    visible: bool,
    /// Parent link; `None` for the root and for detached nodes.
    parent: Option<NodeId>,
    /// Child links in document order.
    children: Vec<NodeId>,
    /// Set when the node was detached from the tree.
    detached: bool,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            classes: BTreeSet::new(),
            value: String::new(),
            checked: false,
            visible: true,
            parent: None,
            children: Vec::new(),
            detached: false,
        }
    }
}

/// Scroll position request recorded by the `scroll` action.
///
/// The tree has no pixel geometry; the anchor records which node the document
/// should be scrolled to, plus an offset supplied by the action params, so a
/// host embedding the engine can effect the scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollAnchor {
    /// Node the document scrolled to.
    pub node: NodeId,
    /// Offset relative to the node position.
    pub offset: i64,
}

/// An in-memory document: a rooted tree of nodes with document-level focus
/// and scroll state.
#[derive(Debug, Clone)]
pub struct Document {
    /// Node arena; ids index into this.
    nodes: Vec<Node>,
    /// The root node (always present, never detachable).
    root: NodeId,
    /// Node currently holding focus, if any.
    focused: Option<NodeId>,
    /// Last scroll request, if any.
    scroll: Option<ScrollAnchor>,
}

impl Document {
    /// Create a document with a single root node of the given tag.
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![Node::new(root_tag)],
            root: NodeId(0),
            focused: None,
            scroll: None,
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Append a new child node under `parent` and return its id.
    ///
    /// Panics if `parent` was not minted by this document.
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut node = Node::new(tag);
        node.parent = Some(parent);
        self.nodes.push(node);
        self.node_mut(parent).children.push(id);
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// Element tag of `id`.
    pub fn tag(&self, id: NodeId) -> &str {
        &self.node(id).tag
    }

    /// Attribute value, if set.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).attrs.get(name).map(String::as_str)
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        self.node_mut(id)
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        self.node_mut(id).attrs.remove(name);
    }

    /// Iterate over the attribute map of `id`.
    pub fn attrs(&self, id: NodeId) -> impl Iterator<Item = (&str, &str)> {
        self.node(id)
            .attrs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All attached nodes carrying attribute `name` with exactly `value`,
    /// in document order.
    pub fn with_attr_value(&self, name: &str, value: &str) -> Vec<NodeId> {
        self.walk(self.root, true)
            .into_iter()
            .filter(|&id| self.attr(id, name) == Some(value))
            .collect()
    }

    /// All attached nodes carrying attribute `name`, in document order.
    pub fn with_attr(&self, name: &str) -> Vec<NodeId> {
        self.walk(self.root, true)
            .into_iter()
            .filter(|&id| self.attr(id, name).is_some())
            .collect()
    }

    // ----- class list -----

    /// Whether `id` carries the single class token `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).classes.contains(class)
    }

    /// Add whitespace-separated class token(s).
    pub fn add_class(&mut self, id: NodeId, tokens: &str) {
        for t in tokens.split_whitespace() {
            self.node_mut(id).classes.insert(t.to_string());
        }
    }

    /// Remove whitespace-separated class token(s).
    pub fn remove_class(&mut self, id: NodeId, tokens: &str) {
        for t in tokens.split_whitespace() {
            self.node_mut(id).classes.remove(t);
        }
    }

    /// Toggle each whitespace-separated class token independently.
    pub fn toggle_class(&mut self, id: NodeId, tokens: &str) {
        for t in tokens.split_whitespace() {
            let node = self.node_mut(id);
            if !node.classes.remove(t) {
                node.classes.insert(t.to_string());
            }
        }
    }

    /// Class tokens of `id` in sorted order.
    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.node(id).classes.iter().map(String::as_str)
    }

    // ----- visibility / form state -----

    /// Visibility flag of `id`.
    pub fn visible(&self, id: NodeId) -> bool {
        self.node(id).visible
    }

    /// Set the visibility flag.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.node_mut(id).visible = visible;
    }

    /// Flip the visibility flag.
    pub fn toggle_visible(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.visible = !node.visible;
    }

    /// Form-control value of `id`.
    pub fn value(&self, id: NodeId) -> &str {
        &self.node(id).value
    }

    /// Set the form-control value.
    pub fn set_value(&mut self, id: NodeId, value: &str) {
        self.node_mut(id).value = value.to_string();
    }

    /// Checked state of `id`.
    pub fn checked(&self, id: NodeId) -> bool {
        self.node(id).checked
    }

    /// Set the checked state.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        self.node_mut(id).checked = checked;
    }

    // ----- focus / scroll -----

    /// Node currently holding focus.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Move focus to `id`.
    pub fn focus(&mut self, id: NodeId) {
        self.focused = Some(id);
    }

    /// Drop focus if `id` currently holds it.
    pub fn blur(&mut self, id: NodeId) {
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    /// Last scroll request recorded by the `scroll` action.
    pub fn scroll_anchor(&self) -> Option<ScrollAnchor> {
        self.scroll
    }

    /// Record a scroll request.
    pub fn set_scroll_anchor(&mut self, node: NodeId, offset: i64) {
        self.scroll = Some(ScrollAnchor { node, offset });
    }

    // ----- structure -----

    /// Parent of `id`; `None` for the root and for detached nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Whether `id` is still reachable from the root.
    pub fn in_document(&self, id: NodeId) -> bool {
        let mut cur = id;
        loop {
            if cur == self.root {
                return true;
            }
            match self.node(cur).parent {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    /// Detach `id` (and thereby its subtree) from the tree.
    ///
    /// The root cannot be detached; the call is then a no-op.
    pub fn detach(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|&c| c != id);
        }
        let node = self.node_mut(id);
        node.parent = None;
        node.detached = true;
    }

    /// Detach all children of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.node(id).children.clone() {
            self.detach(child);
        }
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = id;
        while let Some(p) = self.node(cur).parent {
            out.push(p);
            cur = p;
        }
        out
    }

    /// Descendants of `id` in preorder, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.walk(id, false)
    }

    /// Preorder walk from `start`, optionally including the start node.
    fn walk(&self, start: NodeId, include_start: bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = if include_start {
            vec![start]
        } else {
            self.node(start).children.iter().rev().copied().collect()
        };
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.node(id).children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}
