//! Canonical definitions and the per-element event map.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    Ternary,
    error::Error,
    raw::{RawCondition, RawDef},
};

/// Condition attached to a definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Literal verdict; passes through without evaluation.
    Literal(bool),
    /// Script source evaluated with the triggering node in scope.
    Script(String),
}

impl Default for Condition {
    fn default() -> Self {
        Self::Literal(true)
    }
}

impl From<RawCondition> for Condition {
    fn from(raw: RawCondition) -> Self {
        match raw {
            RawCondition::Literal(b) => Self::Literal(b),
            RawCondition::Script(src) => Self::Script(src),
        }
    }
}

/// One normalized reaction to one event on one element.
///
/// Constructed fresh from raw attribute data on every dispatch and never
/// mutated; accessors are read-only views.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    /// Action name, possibly a ternary `positive:negative` pair.
    action: String,
    /// Target hook name; `None` means the triggering node itself.
    target: Option<String>,
    /// Condition deciding the ternary branch.
    condition: Condition,
    /// Parameters handed to the chosen action.
    params: Value,
    /// Whether target resolution may reuse the shared hook cache.
    cacheable: bool,
    /// Whether the event's default behavior is suppressed.
    prevent_default: bool,
}

impl Definition {
    /// Normalize a raw wire form into a canonical definition.
    ///
    /// Positional entries map index 0 → action, 1 → target, 2 → condition,
    /// 3 → params; trailing entries are optional. Arity outside 1–4, wrong
    /// entry types, or a missing/empty action name fail normalization — the
    /// caller treats that as "no definition".
    pub fn normalize(raw: RawDef) -> Result<Self, Error> {
        match raw {
            RawDef::Named(named) => {
                let action = named
                    .act
                    .filter(|a| !a.is_empty())
                    .ok_or(Error::MissingAction)?;
                Ok(Self {
                    action,
                    target: named.hook.filter(|h| !h.is_empty()),
                    condition: named.cdn.map(Condition::from).unwrap_or_default(),
                    params: named.attrs.unwrap_or(Value::Null),
                    cacheable: named.cache.unwrap_or(true),
                    prevent_default: named.prevent.unwrap_or(true),
                })
            }
            RawDef::Positional(items) => {
                if items.is_empty() || items.len() > 4 {
                    return Err(Error::Arity { len: items.len() });
                }
                let action = match items.first() {
                    Some(Value::String(s)) if !s.is_empty() => s.clone(),
                    Some(Value::String(_)) => return Err(Error::MissingAction),
                    _ => {
                        return Err(Error::Field {
                            index: 0,
                            expected: "an action name string",
                        });
                    }
                };
                let target = match items.get(1) {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) if s.is_empty() => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(_) => {
                        return Err(Error::Field {
                            index: 1,
                            expected: "a hook name string",
                        });
                    }
                };
                let condition = match items.get(2) {
                    None | Some(Value::Null) => Condition::default(),
                    Some(Value::Bool(b)) => Condition::Literal(*b),
                    Some(Value::String(s)) => Condition::Script(s.clone()),
                    Some(_) => {
                        return Err(Error::Field {
                            index: 2,
                            expected: "a boolean or script source string",
                        });
                    }
                };
                let params = items.get(3).cloned().unwrap_or(Value::Null);
                Ok(Self {
                    action,
                    target,
                    condition,
                    params,
                    cacheable: true,
                    prevent_default: true,
                })
            }
        }
    }

    /// Normalize a raw JSON value (array or object form).
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        let raw: RawDef = serde_json::from_value(value.clone()).map_err(|_| Error::Shape)?;
        Self::normalize(raw)
    }

    /// Action name as declared (possibly ternary).
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The action name split into its ternary branches.
    pub fn ternary(&self) -> Ternary {
        Ternary::split(Some(&self.action))
    }

    /// Target hook name; `None` means act on the triggering node.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// The attached condition.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Parameters for the chosen action.
    pub fn params(&self) -> &Value {
        &self.params
    }

    /// Whether target resolution may reuse the shared hook cache.
    pub fn cacheable(&self) -> bool {
        self.cacheable
    }

    /// Whether the event's default behavior is suppressed.
    pub fn prevent_default(&self) -> bool {
        self.prevent_default
    }
}

/// Per-element event definition map parsed from the `data-had` attribute.
///
/// Values are kept raw: each dispatch re-normalizes the entries it runs, so
/// one malformed entry never poisons its siblings.
#[derive(Debug, Clone, Default)]
pub struct DefMap {
    /// Event name → ordered raw definition list.
    events: BTreeMap<String, Vec<Value>>,
}

impl DefMap {
    /// Parse the JSON attribute text into an event map.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let events: BTreeMap<String, Vec<Value>> =
            serde_json::from_str(text).map_err(|e| Error::Map {
                message: e.to_string(),
            })?;
        Ok(Self { events })
    }

    /// Declared event names.
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    /// Raw definitions declared for `event`, in declaration order.
    pub fn defs(&self, event: &str) -> &[Value] {
        self.events.get(event).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether no events are declared.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
