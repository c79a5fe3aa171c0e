//! Target resolution and the shared hook cache.

use std::collections::HashMap;

use dom::{Document, NodeId, Selector};
use tracing::{debug, trace};

use crate::HOOK_ATTR;

/// Memoized hook-name → target-set store.
///
/// The cache is an explicit object owned by one engine instance, not
/// process-wide state; entries have no expiry and live as long as the
/// engine. An entry can be explicitly invalidated, which forces the next
/// resolution to re-query while keeping the name known.
#[derive(Debug, Default)]
pub struct HookCache {
    /// Hook name → resolved set; `None` marks an invalidated entry.
    entries: HashMap<String, Option<Vec<NodeId>>>,
}

impl HookCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` for re-resolution on next use.
    pub fn invalidate(&mut self, name: &str) {
        if let Some(entry) = self.entries.get_mut(name) {
            *entry = None;
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Resolve the target set for a definition.
    ///
    /// An empty or absent name is the triggering node itself and never
    /// touches the cache. Otherwise a present, non-invalidated entry is
    /// returned as-is when `cacheable`; any other case re-resolves through
    /// the fallback chain and refreshes the shared entry regardless of
    /// `cacheable` — the cache is a shared memo, not a per-call switch.
    pub fn resolve(
        &mut self,
        doc: &Document,
        name: Option<&str>,
        trigger: NodeId,
        cacheable: bool,
    ) -> Vec<NodeId> {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            return vec![trigger];
        };

        if cacheable && let Some(Some(cached)) = self.entries.get(name) {
            trace!("hook cache hit: {}", name);
            return cached.clone();
        }

        let resolved = lookup(doc, name, trigger);
        trace!("hook resolved: {} -> {} node(s)", name, resolved.len());
        self.entries
            .insert(name.to_string(), Some(resolved.clone()));
        resolved
    }
}

/// Full lookup for a hook name, in fixed fallback order: declared
/// `data-hook` markers, then the `closest `/`find ` relative shorthands,
/// then the name itself as a raw selector against the whole document.
fn lookup(doc: &Document, name: &str, trigger: NodeId) -> Vec<NodeId> {
    let marked = doc.with_attr_value(HOOK_ATTR, name);
    if !marked.is_empty() {
        return marked;
    }

    if let Some(expr) = name.strip_prefix("closest ") {
        return match Selector::parse(expr) {
            Ok(sel) => doc.closest(trigger, &sel).into_iter().collect(),
            Err(e) => {
                debug!("bad closest selector '{}': {}", expr, e);
                Vec::new()
            }
        };
    }
    if let Some(expr) = name.strip_prefix("find ") {
        return match Selector::parse(expr) {
            Ok(sel) => doc.find(trigger, &sel),
            Err(e) => {
                debug!("bad find selector '{}': {}", expr, e);
                Vec::new()
            }
        };
    }

    match Selector::parse(name) {
        Ok(sel) => doc.select_all(&sel),
        Err(e) => {
            debug!("hook '{}' is not a selector either: {}", name, e);
            Vec::new()
        }
    }
}
