//! Event scripts: ordered (selector, event) pairs fired at the document.

use std::{fs, path::Path};

use dom::{Document, Event, Selector};
use hookbind_engine::{DispatchOutcome, Engine};

/// One scripted event occurrence.
#[derive(Debug, Clone)]
pub struct Step {
    /// Selector naming the node to fire at (first match wins).
    pub selector: String,
    /// Event type name.
    pub event: String,
}

/// Load an event script from a RON file of `(selector, event)` pairs.
pub fn load(path: &Path) -> Result<Vec<Step>, String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let pairs: Vec<(String, String)> =
        ron::from_str(&text).map_err(|e| format!("cannot parse {}: {}", path.display(), e))?;
    Ok(pairs
        .into_iter()
        .map(|(selector, event)| Step { selector, event })
        .collect())
}

/// Fire one step and describe what happened.
pub fn fire(engine: &mut Engine, doc: &mut Document, step: &Step) -> Result<String, String> {
    let selector = Selector::parse(&step.selector)
        .map_err(|e| format!("bad selector '{}': {}", step.selector, e))?;
    let Some(&node) = doc.select_all(&selector).first() else {
        return Err(format!("no node matches '{}'", step.selector));
    };

    let mut event = Event::new(&step.event);
    let outcome = engine.dispatch(doc, node, &mut event);
    Ok(describe(step, outcome, event.default_prevented()))
}

/// One result line for a fired step.
fn describe(step: &Step, outcome: DispatchOutcome, prevented: bool) -> String {
    format!(
        "{} on '{}': {} ran, {} skipped, {} failed{}",
        step.event,
        step.selector,
        outcome.executed,
        outcome.skipped,
        outcome.failed,
        if prevented { ", default prevented" } else { "" }
    )
}
