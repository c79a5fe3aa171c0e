//! Plain-text rendering of a document tree.

use std::fmt::Write as _;

use dom::{Document, NodeId};

/// Render the attached tree as an indented dump, one node per line.
pub fn tree(doc: &Document) -> String {
    let mut out = String::new();
    node(doc, doc.root(), 0, &mut out);
    out
}

/// Render one node and recurse into its children.
fn node(doc: &Document, id: NodeId, depth: usize, out: &mut String) {
    let mut line = format!("{}{}", "  ".repeat(depth), doc.tag(id));
    if let Some(idattr) = doc.attr(id, "id") {
        let _ignored = write!(line, "#{}", idattr);
    }
    for class in doc.classes(id) {
        let _ignored = write!(line, ".{}", class);
    }
    if let Some(hook) = doc.attr(id, "data-hook") {
        let _ignored = write!(line, " [hook={}]", hook);
    }
    if !doc.value(id).is_empty() {
        let _ignored = write!(line, " value={:?}", doc.value(id));
    }
    if doc.checked(id) {
        line.push_str(" checked");
    }
    if !doc.visible(id) {
        line.push_str(" hidden");
    }
    if doc.focused() == Some(id) {
        line.push_str(" focused");
    }
    out.push_str(&line);
    out.push('\n');
    for &child in doc.children(id) {
        node(doc, child, depth + 1, out);
    }
}
