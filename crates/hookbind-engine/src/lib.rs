//! Hookbind Engine
//!
//! The engine crate coordinates declarative hook actions:
//! - discovers elements carrying `data-had` definitions and binds the
//!   dispatcher to their declared events (idempotently)
//! - on each event, normalizes definitions, evaluates conditions, picks the
//!   ternary branch, resolves the target set through the shared hook cache,
//!   and executes the catalogue action
//! - re-raises follow-up events (`trigger`, `submit`, `open`/`close`
//!   notifications) back through itself, synchronously
//!
//! All engine state — listener bindings, the hook cache, the
//! initialization registry, the script runtime — lives on the [`Engine`]
//! instance. Nothing is process-wide, so independent engines never
//! contaminate each other.

use std::{collections::HashSet, result::Result as StdResult};

use dom::{Document, Event, NodeId};
use hookdef::{Condition, DefMap, Definition, NodeCtx};
use serde_json::Value;
use tracing::{debug, trace, warn};

mod binder;
mod cache;
mod catalogue;
mod error;

pub use cache::HookCache;
pub use catalogue::HookAction;
pub use error::{Error, Result};

use binder::Binder;

/// Attribute holding the serialized event definition map.
pub const HAD_ATTR: &str = "data-had";
/// Attribute marking an element as a named hook target.
pub const HOOK_ATTR: &str = "data-hook";

/// Summary of one dispatch: how many definitions ran, were skipped
/// (no-ops), or failed (logged and swallowed).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Definitions whose action executed.
    pub executed: usize,
    /// Definitions that were valid no-ops (empty ternary branch, unknown
    /// action name).
    pub skipped: usize,
    /// Definitions that failed (malformed shape or script error).
    pub failed: usize,
}

/// How one definition ended.
enum RunStatus {
    /// The chosen action executed.
    Ran,
    /// A deliberate no-op.
    Skipped,
}

/// Tracks which initialization markers have already been consumed.
///
/// An explicit object owned by the engine, so isolated engines (one per
/// test, say) each get their own idempotence scope.
#[derive(Debug, Default)]
struct InitRegistry {
    /// Named markers already initialized.
    markers: HashSet<String>,
    /// Whether the unnamed (global) marker was consumed.
    global: bool,
}

impl InitRegistry {
    /// Claim a marker; returns false when it was already claimed and
    /// `force` is not set.
    fn try_claim(&mut self, marker: Option<&str>, force: bool) -> bool {
        match marker {
            Some(m) => {
                if !force && self.markers.contains(m) {
                    return false;
                }
                let _ = self.markers.insert(m.to_string());
                true
            }
            None => {
                if !force && self.global {
                    return false;
                }
                self.global = true;
                true
            }
        }
    }
}

/// The hookbind engine: binder, dispatcher, hook cache, and script runtime.
///
/// Construct via [`Engine::new`], initialize a document subtree with
/// [`Engine::init`], then feed UI events through [`Engine::dispatch`].
#[derive(Debug, Default)]
pub struct Engine {
    /// Listener binding state.
    binder: Binder,
    /// Shared hook-name → target-set memo.
    cache: HookCache,
    /// Already-initialized markers.
    inits: InitRegistry,
    /// Runtime for embedded condition/callback source.
    runtime: hookdef::ScriptRuntime,
}

impl Engine {
    /// Create an engine with empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable access to the script runtime, e.g. to register host
    /// functions before the first dispatch.
    pub fn runtime_mut(&mut self) -> &mut hookdef::ScriptRuntime {
        &mut self.runtime
    }

    /// Mark a hook name for re-resolution on next use.
    pub fn invalidate_hook(&mut self, name: &str) {
        self.cache.invalidate(name);
    }

    /// Drop every cached hook target set.
    pub fn clear_hook_cache(&mut self) {
        self.cache.clear();
    }

    /// Idempotent entry point: scan `scope` (default: the whole document)
    /// and bind every element declaring definitions.
    ///
    /// The `marker` identifies this initialization; re-initializing the
    /// same marker without `force` is a no-op. Returns the number of
    /// elements bound.
    pub fn init(
        &mut self,
        doc: &Document,
        scope: Option<NodeId>,
        marker: Option<&str>,
        force: bool,
    ) -> usize {
        if !self.inits.try_claim(marker, force) {
            debug!("already initialized for {:?}, skipping", marker);
            return 0;
        }

        let scope = scope.unwrap_or_else(|| doc.root());
        let mut bound = 0;
        for node in Binder::scan(doc, scope) {
            match self.binder.bind(doc, node) {
                Ok(events) if events > 0 => bound += 1,
                Ok(_) => {}
                // malformed definitions bind nothing and surface nothing
                Err(e) => debug!("ignoring unbindable definitions on {}: {}", node, e),
            }
        }
        debug!("init bound {} element(s) under {}", bound, scope);
        bound
    }

    /// Bind a single element's declared events, surfacing parse errors.
    pub fn bind(&mut self, doc: &Document, node: NodeId) -> Result<usize> {
        self.binder.bind(doc, node)
    }

    /// Whether `node` currently has a listener for `event`.
    pub fn is_bound(&self, node: NodeId, event: &str) -> bool {
        self.binder.is_bound(node, event)
    }

    /// Deliver one event occurrence on `node`.
    ///
    /// No-op unless the pair is bound. Definitions for the event run in
    /// declaration order, each normalized and evaluated independently: one
    /// failing definition is logged and does not stop its siblings.
    pub fn dispatch(&mut self, doc: &mut Document, node: NodeId, event: &mut Event) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        if !self.binder.is_bound(node, event.name()) {
            trace!("{} not bound for {}", node, event.name());
            return outcome;
        }

        let Some(text) = doc.attr(node, HAD_ATTR).map(str::to_string) else {
            return outcome;
        };
        let map = match DefMap::parse(&text) {
            Ok(map) => map,
            Err(e) => {
                debug!("definition map on {} no longer parses: {}", node, e);
                return outcome;
            }
        };

        let defs = map.defs(event.name()).to_vec();
        trace!("dispatch {} on {}: {} definition(s)", event.name(), node, defs.len());
        for raw in &defs {
            match self.run_one(doc, node, event, raw) {
                Ok(RunStatus::Ran) => outcome.executed += 1,
                Ok(RunStatus::Skipped) => outcome.skipped += 1,
                Err(e) => {
                    log_def_error(&e);
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }

    /// Run a single raw definition for an event occurrence.
    fn run_one(
        &mut self,
        doc: &mut Document,
        trigger: NodeId,
        event: &mut Event,
        raw: &Value,
    ) -> StdResult<RunStatus, hookdef::Error> {
        let def = Definition::from_value(raw)?;

        if def.prevent_default() {
            event.prevent_default();
        }

        let verdict = match def.condition() {
            Condition::Literal(b) => *b,
            Condition::Script(src) => {
                let ctx = node_ctx(doc, trigger);
                self.runtime.eval_predicate(src, &ctx)?
            }
        };

        let Some(chosen) = def.ternary().pick(verdict).map(str::to_string) else {
            trace!("no branch for verdict {} on '{}'", verdict, def.action());
            return Ok(RunStatus::Skipped);
        };
        let Some(action) = HookAction::parse(&chosen) else {
            debug!("unknown action '{}'", chosen);
            return Ok(RunStatus::Skipped);
        };

        if action.is_inline() {
            // the escape hatch: params are script, the trigger is the
            // context, and an array result is executed as definitions
            let Some(src) = def.params().as_str() else {
                debug!("do params must be script source");
                return Ok(RunStatus::Skipped);
            };
            let ctx = node_ctx(doc, trigger);
            let follow_defs = self.runtime.eval_callback(src, &ctx)?;
            for raw in &follow_defs {
                if let Err(e) = self.run_one(doc, trigger, event, raw) {
                    log_def_error(&e);
                }
            }
            return Ok(RunStatus::Ran);
        }

        let targets = self
            .cache
            .resolve(doc, def.target(), trigger, def.cacheable());
        let outcome = catalogue::run(action, doc, &targets, def.params(), verdict);

        for (target, name) in outcome.follow_ups {
            let mut follow = Event::new(&name);
            let _ = self.dispatch(doc, target, &mut follow);
        }
        Ok(RunStatus::Ran)
    }
}

/// Log a failed definition at the appropriate level and move on.
fn log_def_error(err: &hookdef::Error) {
    match err {
        hookdef::Error::Script { .. } => warn!("{}", err.pretty()),
        other => debug!("skipping definition: {}", other),
    }
}

/// Snapshot the triggering node for script scope.
fn node_ctx(doc: &Document, id: NodeId) -> NodeCtx {
    NodeCtx {
        tag: doc.tag(id).to_string(),
        id: doc.attr(id, "id").map(str::to_string),
        hook: doc.attr(id, HOOK_ATTR).map(str::to_string),
        value: doc.value(id).to_string(),
        checked: doc.checked(id),
        visible: doc.visible(id),
        classes: doc.classes(id).map(str::to_string).collect(),
        attrs: doc
            .attrs(id)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}
