//! In-memory document tree used by the hookbind engine.
//!
//! This crate supplies the substrate the engine operates on:
//! - [`Document`]: an arena of nodes addressed by [`NodeId`], with the
//!   attribute, class, visibility, and form-control state the action
//!   catalogue mutates
//! - [`Selector`]: a minimal compound selector (`tag`, `#id`, `.class`,
//!   `[attr]`, `[attr=value]`) used for target resolution fallbacks
//! - [`Event`]: a fired UI event with default-prevention
//! - [`NodeSpec`]: a serde-deserializable description for building fixture
//!   documents (typically from RON)
//!
//! The tree is deliberately small: it models exactly the state the hook
//! action catalogue observes and mutates, not a full DOM.

mod event;
mod selector;
mod spec;
mod tree;

pub use event::Event;
pub use selector::{Selector, SelectorError};
pub use spec::NodeSpec;
pub use tree::{Document, NodeId, ScrollAnchor};
