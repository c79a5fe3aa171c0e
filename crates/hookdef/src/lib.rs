//! Hook action definition model.
//!
//! Elements declare reactions to UI events in a serialized `data-had`
//! attribute: a JSON mapping from event name to an ordered list of
//! definitions. Each definition names an action (possibly a ternary
//! `positive:negative` pair), an optional target hook, a condition, and
//! parameters. This crate owns:
//!
//! - the raw wire forms ([`RawDef`]: short positional array or full named
//!   object) and their normalization into the canonical [`Definition`]
//! - the per-element event map ([`DefMap`])
//! - [`Ternary`] action-name splitting
//! - the sandboxed [`ScriptRuntime`] that evaluates embedded condition and
//!   callback source against a [`NodeCtx`] describing the triggering node
//!
//! Definitions are ephemeral values: callers re-normalize from the raw
//! attribute data on every dispatch and never mutate a `Definition`.

mod def;
mod error;
mod raw;
mod script;
mod ternary;

#[cfg(test)]
mod test_parse;

pub use def::{Condition, DefMap, Definition};
pub use error::Error;
pub use raw::{RawCondition, RawDef, RawNamed};
pub use script::{NodeCtx, ScriptRuntime};
pub use ternary::Ternary;
