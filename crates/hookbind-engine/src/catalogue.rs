//! The fixed catalogue of built-in hook actions.

use dom::{Document, NodeId};
use hookdef::Ternary;
use serde_json::Value;
use tracing::debug;

/// One of the built-in actions a definition can name.
///
/// Unknown names fail to parse and dispatch treats them as a no-op; every
/// action tolerates an empty target set the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
    /// Add the `open` state class and re-raise an `open` event.
    Open,
    /// Remove the `open` state class and re-raise a `close` event.
    Close,
    /// Record a scroll request to the first target.
    Scroll,
    /// Make targets visible.
    Show,
    /// Hide targets.
    Hide,
    /// Flip target visibility.
    Toggle,
    /// Detach targets from the tree.
    Remove,
    /// Detach all children of each target.
    Clear,
    /// Check targets.
    Check,
    /// Uncheck targets.
    Uncheck,
    /// Focus targets (last one ends up focused).
    Focus,
    /// Blur targets holding focus.
    Blur,
    /// Re-raise an event named by params (possibly ternary).
    Trigger,
    /// Add class token(s) from params.
    ClassAdd,
    /// Remove class token(s) from params.
    ClassRmw,
    /// Toggle class token(s) from params.
    ClassTgl,
    /// Set each target's value to empty.
    InputClear,
    /// Clear the value of every descendant input-like node.
    InputClearAll,
    /// Set each target's value from params.
    InputVal,
    /// Re-raise a `submit` event on targets.
    Submit,
    /// Run params as inline script with the trigger in scope.
    Do,
}

impl HookAction {
    /// Look an action up by its declared name.
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "open" => Self::Open,
            "close" => Self::Close,
            "scroll" => Self::Scroll,
            "show" => Self::Show,
            "hide" => Self::Hide,
            "toggle" => Self::Toggle,
            "remove" => Self::Remove,
            "clear" => Self::Clear,
            "check" => Self::Check,
            "uncheck" => Self::Uncheck,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "trigger" => Self::Trigger,
            "class-add" => Self::ClassAdd,
            "class-rmw" => Self::ClassRmw,
            "class-tgl" => Self::ClassTgl,
            "input-clear" => Self::InputClear,
            "input-clear-all" => Self::InputClearAll,
            "input-val" => Self::InputVal,
            "submit" => Self::Submit,
            "do" => Self::Do,
            _ => return None,
        })
    }

    /// Whether this is the inline-script escape hatch, which skips target
    /// resolution entirely.
    pub fn is_inline(self) -> bool {
        matches!(self, Self::Do)
    }
}

/// What an executed action asks the dispatcher to do next.
#[derive(Debug, Default)]
pub struct ActionOutcome {
    /// Events to re-raise, in order.
    pub follow_ups: Vec<(NodeId, String)>,
}

/// Execute a catalogue action over the resolved target set.
///
/// `verdict` is the condition verdict already computed for the definition;
/// the `trigger` action reuses it for its own ternary params rather than
/// re-evaluating the condition.
pub fn run(
    action: HookAction,
    doc: &mut Document,
    targets: &[NodeId],
    params: &Value,
    verdict: bool,
) -> ActionOutcome {
    let mut out = ActionOutcome::default();
    match action {
        HookAction::Open => {
            for &t in targets {
                doc.add_class(t, "open");
                out.follow_ups.push((t, "open".to_string()));
            }
        }
        HookAction::Close => {
            for &t in targets {
                doc.remove_class(t, "open");
                out.follow_ups.push((t, "close".to_string()));
            }
        }
        HookAction::Scroll => {
            if let Some(&first) = targets.first() {
                let offset = params.get("offset").and_then(Value::as_i64).unwrap_or(0);
                doc.set_scroll_anchor(first, offset);
            }
        }
        HookAction::Show => {
            for &t in targets {
                doc.set_visible(t, true);
            }
        }
        HookAction::Hide => {
            for &t in targets {
                doc.set_visible(t, false);
            }
        }
        HookAction::Toggle => {
            for &t in targets {
                doc.toggle_visible(t);
            }
        }
        HookAction::Remove => {
            for &t in targets {
                doc.detach(t);
            }
        }
        HookAction::Clear => {
            for &t in targets {
                doc.clear_children(t);
            }
        }
        HookAction::Check => {
            for &t in targets {
                doc.set_checked(t, true);
            }
        }
        HookAction::Uncheck => {
            for &t in targets {
                doc.set_checked(t, false);
            }
        }
        HookAction::Focus => {
            for &t in targets {
                doc.focus(t);
            }
        }
        HookAction::Blur => {
            for &t in targets {
                doc.blur(t);
            }
        }
        HookAction::Trigger => {
            if let Some(name) = params.as_str() {
                if let Some(event) = Ternary::split(Some(name)).pick(verdict) {
                    for &t in targets {
                        out.follow_ups.push((t, event.to_string()));
                    }
                }
            } else {
                debug!("trigger params must be an event name string");
            }
        }
        HookAction::ClassAdd => {
            if let Some(tokens) = class_tokens(params) {
                for &t in targets {
                    doc.add_class(t, &tokens);
                }
            }
        }
        HookAction::ClassRmw => {
            if let Some(tokens) = class_tokens(params) {
                for &t in targets {
                    doc.remove_class(t, &tokens);
                }
            }
        }
        HookAction::ClassTgl => {
            if let Some(tokens) = class_tokens(params) {
                for &t in targets {
                    doc.toggle_class(t, &tokens);
                }
            }
        }
        HookAction::InputClear => {
            for &t in targets {
                doc.set_value(t, "");
            }
        }
        HookAction::InputClearAll => {
            for &t in targets {
                for d in doc.descendants(t) {
                    if input_like(doc.tag(d)) {
                        doc.set_value(d, "");
                    }
                }
            }
        }
        HookAction::InputVal => {
            let value = value_text(params);
            for &t in targets {
                doc.set_value(t, &value);
            }
        }
        HookAction::Submit => {
            for &t in targets {
                out.follow_ups.push((t, "submit".to_string()));
            }
        }
        // handled by the dispatcher before target resolution
        HookAction::Do => {}
    }
    out
}

/// Class token(s) from action params: a string of whitespace-separated
/// tokens or an array of token strings.
fn class_tokens(params: &Value) -> Option<String> {
    match params {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let tokens: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if tokens.is_empty() {
                None
            } else {
                Some(tokens.join(" "))
            }
        }
        _ => {
            debug!("class action params must be token string(s)");
            None
        }
    }
}

/// True for tags whose value `input-clear-all` resets.
fn input_like(tag: &str) -> bool {
    matches!(tag, "input" | "textarea" | "select")
}

/// Render action params as a form-control value.
fn value_text(params: &Value) -> String {
    match params {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
