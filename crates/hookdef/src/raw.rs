//! Raw wire forms of a definition, before normalization.

use serde::Deserialize;
use serde_json::Value;

/// One definition as it appears in the `data-had` attribute.
///
/// Two shapes are accepted and normalized through a single path
/// ([`crate::Definition::normalize`]); callers never branch on the shape
/// themselves:
///
/// - short positional form: `["show:hide", "overlay", "node.checked"]`
/// - full named form: `{"act": "show:hide", "hook": "overlay",
///   "cdn": "node.checked", "attrs": null, "cache": true, "prevent": true}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDef {
    /// Full named-field form.
    Named(RawNamed),
    /// Short positional form: `[action, target?, condition?, params?]`.
    Positional(Vec<Value>),
}

/// Named-field wire form with every field optional.
///
/// Unknown fields are rejected, which makes the whole entry invalid; the
/// dispatcher then skips it silently, matching the malformed-definition
/// policy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawNamed {
    /// Action name, possibly a ternary `positive:negative` pair.
    #[serde(default)]
    pub act: Option<String>,
    /// Target hook name; empty/absent means the triggering node.
    #[serde(default)]
    pub hook: Option<String>,
    /// Condition: boolean literal or script source.
    #[serde(default)]
    pub cdn: Option<RawCondition>,
    /// Parameters handed to the chosen action.
    #[serde(default)]
    pub attrs: Option<Value>,
    /// Whether target resolution may reuse the shared hook cache.
    #[serde(default)]
    pub cache: Option<bool>,
    /// Whether the event's default behavior is suppressed.
    #[serde(default)]
    pub prevent: Option<bool>,
}

/// Condition wire form: a boolean literal passes through unevaluated,
/// anything else is script source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCondition {
    /// Literal verdict, no evaluation.
    Literal(bool),
    /// Script source evaluated at dispatch time.
    Script(String),
}
