//! Sandboxed runtime for embedded condition and callback source.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use rhai::{AST, Dynamic, Engine, EvalAltResult, Scope, serde::from_dynamic, serde::to_dynamic};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, excerpt_at};

/// Snapshot of the triggering node handed to embedded script as `node`.
///
/// An explicit context value instead of an implicit receiver: scripts read
/// `node.checked`, `node.value`, `node.classes`, and so on.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NodeCtx {
    /// Element tag.
    pub tag: String,
    /// `id` attribute, if set.
    pub id: Option<String>,
    /// `data-hook` marker, if the node is itself a named hook.
    pub hook: Option<String>,
    /// Form-control value.
    pub value: String,
    /// Checked state.
    pub checked: bool,
    /// Visibility flag.
    pub visible: bool,
    /// Class tokens.
    pub classes: Vec<String>,
    /// Full attribute map.
    pub attrs: BTreeMap<String, String>,
}

/// Compiles and evaluates embedded script with conservative sandbox limits.
///
/// Compiled ASTs are memoized per source string for the lifetime of the
/// runtime; the same condition text on every event fire compiles once.
pub struct ScriptRuntime {
    /// Engine configured with sandbox limits and log forwarding.
    engine: Engine,
    /// Source text → compiled AST memo.
    cache: HashMap<String, AST>,
}

impl fmt::Debug for ScriptRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptRuntime")
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl Default for ScriptRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptRuntime {
    /// Create a runtime with sandbox limits applied.
    pub fn new() -> Self {
        let mut engine = Engine::new();
        engine.on_print(|s| info!(target: "hookdef::script", "{}", s));
        engine.on_debug(|s, src, pos| {
            debug!(target: "hookdef::script", "{} @ {:?}:{:?}", s, src, pos);
        });

        // Conservative limits: embedded conditions are tiny expressions, not
        // programs.
        engine.set_max_operations(200_000);
        engine.set_max_call_levels(64);
        engine.set_max_expr_depths(128, 64);

        Self {
            engine,
            cache: HashMap::new(),
        }
    }

    /// Mutable access to the underlying engine so a host can register extra
    /// functions before the first dispatch.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Evaluate condition source; the returned verdict is the script's
    /// result coerced by truthiness.
    pub fn eval_predicate(&mut self, source: &str, ctx: &NodeCtx) -> Result<bool, Error> {
        let out = self.eval(source, ctx)?;
        Ok(truthy(&out))
    }

    /// Evaluate callback source (the `do` action).
    ///
    /// A unit result is a plain side-effect-free call; an array result is
    /// decoded as raw definitions for the dispatcher to execute.
    pub fn eval_callback(&mut self, source: &str, ctx: &NodeCtx) -> Result<Vec<Value>, Error> {
        let out = self.eval(source, ctx)?;
        if out.is_unit() {
            return Ok(Vec::new());
        }
        from_dynamic::<Vec<Value>>(&out).map_err(|e| script_error(source, &e))
    }

    /// Compile (or reuse) and evaluate `source` with `node` in scope.
    fn eval(&mut self, source: &str, ctx: &NodeCtx) -> Result<Dynamic, Error> {
        if !self.cache.contains_key(source) {
            let ast = self.engine.compile(source).map_err(|e| {
                let (line, col) = (e.1.line(), e.1.position());
                Error::Script {
                    line,
                    col,
                    message: e.to_string(),
                    excerpt: line.map(|l| excerpt_at(source, l, col.unwrap_or(1))),
                }
            })?;
            self.cache.insert(source.to_string(), ast);
        }

        let node = to_dynamic(ctx).map_err(|e| script_error(source, &e))?;
        let mut scope = Scope::new();
        let _ = scope.push_constant_dynamic("node", node);

        let ast = &self.cache[source];
        self.engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, ast)
            .map_err(|e| script_error(source, &e))
    }
}

/// Convert a rhai evaluation error into [`Error::Script`] with an excerpt.
fn script_error(source: &str, err: &EvalAltResult) -> Error {
    let pos = err.position();
    let (line, col) = (pos.line(), pos.position());
    Error::Script {
        line,
        col,
        message: err.to_string(),
        excerpt: line.map(|l| excerpt_at(source, l, col.unwrap_or(1))),
    }
}

/// Truthiness of a script result: the verdict is whatever the embedded
/// logic returned, coerced the way dynamic languages coerce.
fn truthy(value: &Dynamic) -> bool {
    if value.is_unit() {
        false
    } else if let Ok(b) = value.as_bool() {
        b
    } else if let Ok(i) = value.as_int() {
        i != 0
    } else if let Ok(f) = value.as_float() {
        f != 0.0
    } else if let Some(s) = value.read_lock::<rhai::ImmutableString>() {
        !s.is_empty()
    } else if let Some(a) = value.read_lock::<rhai::Array>() {
        !a.is_empty()
    } else if let Some(m) = value.read_lock::<rhai::Map>() {
        !m.is_empty()
    } else {
        true
    }
}
