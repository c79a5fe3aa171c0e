//! Fixture document descriptions.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::tree::{Document, NodeId};

/// A serde-deserializable node description used to build fixture documents,
/// typically from RON:
///
/// ```ron
/// (tag: "body", children: [
///     (tag: "a", attrs: {"data-had": "{\"click\":[[\"show\",\"overlay\"]]}"}),
///     (tag: "div", attrs: {"data-hook": "overlay"}, hidden: true),
/// ])
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    /// Element tag.
    pub tag: String,
    /// Attributes, including marker attributes like `data-had`.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// Initial class tokens.
    #[serde(default)]
    pub classes: Vec<String>,
    /// Initial form-control value.
    #[serde(default)]
    pub value: Option<String>,
    /// Initial checked state.
    #[serde(default)]
    pub checked: bool,
    /// Start hidden instead of visible.
    #[serde(default)]
    pub hidden: bool,
    /// Child nodes in document order.
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl Document {
    /// Build a document from a [`NodeSpec`] tree.
    pub fn from_spec(spec: &NodeSpec) -> Self {
        let mut doc = Self::new(&spec.tag);
        let root = doc.root();
        apply(&mut doc, root, spec);
        for child in &spec.children {
            build(&mut doc, root, child);
        }
        doc
    }
}

/// Copy a spec's state onto an existing node.
fn apply(doc: &mut Document, id: NodeId, spec: &NodeSpec) {
    for (name, value) in &spec.attrs {
        doc.set_attr(id, name, value);
    }
    for class in &spec.classes {
        doc.add_class(id, class);
    }
    if let Some(value) = &spec.value {
        doc.set_value(id, value);
    }
    doc.set_checked(id, spec.checked);
    doc.set_visible(id, !spec.hidden);
}

/// Append a spec subtree under `parent`.
fn build(doc: &mut Document, parent: NodeId, spec: &NodeSpec) {
    let id = doc.append(parent, &spec.tag);
    apply(doc, id, spec);
    for child in &spec.children {
        build(doc, id, child);
    }
}
