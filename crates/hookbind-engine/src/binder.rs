//! Listener binding state for elements carrying definitions.

use std::collections::{BTreeSet, HashMap};

use dom::{Document, NodeId};
use hookdef::DefMap;
use tracing::trace;

use crate::{HAD_ATTR, error::Result};

/// Tracks which `(element, event)` pairs currently have the dispatcher
/// attached.
///
/// Per element this is a two-state machine — unbound, or bound with an
/// event set. Binding detaches any previous listener for the exact event
/// key before attaching, so binding a subtree twice still yields one
/// dispatch per native event occurrence.
#[derive(Debug, Default)]
pub struct Binder {
    /// Element → bound event names.
    bound: HashMap<NodeId, BTreeSet<String>>,
}

impl Binder {
    /// All descendants of `scope` carrying a definition attribute, in
    /// document order. An empty result is a no-op for callers, not an
    /// error.
    pub fn scan(doc: &Document, scope: NodeId) -> Vec<NodeId> {
        doc.descendants(scope)
            .into_iter()
            .filter(|&id| doc.attr(id, HAD_ATTR).is_some())
            .collect()
    }

    /// Bind the dispatcher to every event declared on `node`.
    ///
    /// Returns the number of event keys bound. A node without the
    /// definition attribute binds nothing.
    pub fn bind(&mut self, doc: &Document, node: NodeId) -> Result<usize> {
        let Some(text) = doc.attr(node, HAD_ATTR) else {
            return Ok(0);
        };
        let map = DefMap::parse(text)?;

        let events = self.bound.entry(node).or_default();
        let mut count = 0;
        for event in map.events() {
            // detach-then-attach: a re-bind replaces the previous listener
            // for this exact key instead of stacking a second one
            events.remove(event);
            let _ = events.insert(event.to_string());
            count += 1;
            trace!("bound {} on {}", event, node);
        }
        Ok(count)
    }

    /// Whether `node` currently has a listener for `event`.
    pub fn is_bound(&self, node: NodeId, event: &str) -> bool {
        self.bound
            .get(&node)
            .is_some_and(|events| events.contains(event))
    }
}
