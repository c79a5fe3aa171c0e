//! Minimal compound selector parsing and matching.

use std::{iter::Peekable, str::CharIndices};

use thiserror::Error;

use crate::tree::{Document, NodeId};

/// Errors produced while parsing a selector expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The expression was empty or whitespace-only.
    #[error("empty selector")]
    Empty,
    /// An unexpected character at the given byte offset.
    #[error("unexpected character '{ch}' at offset {at} in selector")]
    Unexpected {
        /// The offending character.
        ch: char,
        /// Byte offset into the expression.
        at: usize,
    },
    /// A `.class`, `#id`, or `[attr]` part with no name.
    #[error("missing name after '{prefix}' at offset {at}")]
    MissingName {
        /// The introducing sigil.
        prefix: char,
        /// Byte offset into the expression.
        at: usize,
    },
    /// An attribute filter missing its closing bracket.
    #[error("unterminated attribute filter starting at offset {at}")]
    UnterminatedAttr {
        /// Byte offset of the opening `[`.
        at: usize,
    },
}

/// One `[attr]` or `[attr=value]` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrFilter {
    /// Attribute name.
    name: String,
    /// Required value; `None` means presence only.
    value: Option<String>,
}

/// A parsed compound selector: `tag#id.class[attr=value]...`.
///
/// Combinators (descendant, child, sibling) are not supported; relative
/// matching is expressed through [`Document::find`] and
/// [`Document::closest`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Required tag; `None` matches any tag (`*` or omitted).
    tag: Option<String>,
    /// Required `id` attribute.
    id: Option<String>,
    /// Required class tokens.
    classes: Vec<String>,
    /// Required attribute filters.
    attrs: Vec<AttrFilter>,
}

/// True for characters allowed in tag, class, id, and attribute names.
fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

impl Selector {
    /// Parse a selector expression.
    pub fn parse(expr: &str) -> Result<Self, SelectorError> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut sel = Self {
            tag: None,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
        };
        let mut chars = expr.char_indices().peekable();

        // Leading tag or universal.
        match chars.peek().copied() {
            Some((_, '*')) => {
                let _ = chars.next();
            }
            Some((_, ch)) if is_name_char(ch) => {
                sel.tag = Some(take_name(&mut chars));
            }
            _ => {}
        }

        while let Some((at, ch)) = chars.next() {
            match ch {
                '#' => {
                    let name = take_name(&mut chars);
                    if name.is_empty() {
                        return Err(SelectorError::MissingName { prefix: '#', at });
                    }
                    sel.id = Some(name);
                }
                '.' => {
                    let name = take_name(&mut chars);
                    if name.is_empty() {
                        return Err(SelectorError::MissingName { prefix: '.', at });
                    }
                    sel.classes.push(name);
                }
                '[' => {
                    let filter = take_attr_filter(&mut chars, at)?;
                    sel.attrs.push(filter);
                }
                _ => return Err(SelectorError::Unexpected { ch, at }),
            }
        }

        Ok(sel)
    }

    /// Whether `id` in `doc` matches this selector.
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        if let Some(tag) = &self.tag
            && doc.tag(id) != tag.as_str()
        {
            return false;
        }
        if let Some(want) = &self.id
            && doc.attr(id, "id") != Some(want.as_str())
        {
            return false;
        }
        if self.classes.iter().any(|c| !doc.has_class(id, c)) {
            return false;
        }
        self.attrs.iter().all(|f| match &f.value {
            Some(v) => doc.attr(id, &f.name) == Some(v.as_str()),
            None => doc.attr(id, &f.name).is_some(),
        })
    }
}

/// Consume a run of name characters.
fn take_name(chars: &mut Peekable<CharIndices<'_>>) -> String {
    let mut out = String::new();
    while let Some(&(_, ch)) = chars.peek() {
        if !is_name_char(ch) {
            break;
        }
        out.push(ch);
        let _ = chars.next();
    }
    out
}

/// Consume an attribute filter body after the opening `[`.
fn take_attr_filter(
    chars: &mut Peekable<CharIndices<'_>>,
    open_at: usize,
) -> Result<AttrFilter, SelectorError> {
    let name = take_name(chars);
    if name.is_empty() {
        return Err(SelectorError::MissingName {
            prefix: '[',
            at: open_at,
        });
    }
    match chars.next() {
        Some((_, ']')) => Ok(AttrFilter { name, value: None }),
        Some((_, '=')) => {
            let mut value = String::new();
            let quote = match chars.peek().copied() {
                Some((_, q @ ('"' | '\''))) => {
                    let _ = chars.next();
                    Some(q)
                }
                _ => None,
            };
            loop {
                match chars.next() {
                    Some((_, ch)) if Some(ch) == quote => {
                        // closing quote; expect ']' next
                        match chars.next() {
                            Some((_, ']')) => break,
                            Some((at, ch)) => {
                                return Err(SelectorError::Unexpected { ch, at });
                            }
                            None => {
                                return Err(SelectorError::UnterminatedAttr { at: open_at });
                            }
                        }
                    }
                    Some((_, ']')) if quote.is_none() => break,
                    Some((_, ch)) => value.push(ch),
                    None => return Err(SelectorError::UnterminatedAttr { at: open_at }),
                }
            }
            Ok(AttrFilter {
                name,
                value: Some(value),
            })
        }
        Some((at, ch)) => Err(SelectorError::Unexpected { ch, at }),
        None => Err(SelectorError::UnterminatedAttr { at: open_at }),
    }
}

impl Document {
    /// All attached nodes matching `selector`, in document order.
    pub fn select_all(&self, selector: &Selector) -> Vec<NodeId> {
        let root = self.root();
        let mut out = Vec::new();
        if selector.matches(self, root) {
            out.push(root);
        }
        out.extend(
            self.descendants(root)
                .into_iter()
                .filter(|&id| selector.matches(self, id)),
        );
        out
    }

    /// Descendants of `from` matching `selector`, in document order.
    pub fn find(&self, from: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(from)
            .into_iter()
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    /// Nearest ancestor-or-self of `from` matching `selector`.
    pub fn closest(&self, from: NodeId, selector: &Selector) -> Option<NodeId> {
        if selector.matches(self, from) {
            return Some(from);
        }
        self.ancestors(from)
            .into_iter()
            .find(|&id| selector.matches(self, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new("body");
        let panel = doc.append(doc.root(), "div");
        doc.add_class(panel, "panel wide");
        doc.set_attr(panel, "id", "main");
        let input = doc.append(panel, "input");
        doc.set_attr(input, "type", "checkbox");
        let item = doc.append(panel, "span");
        doc.add_class(item, "item");
        (doc, panel, input, item)
    }

    #[test]
    fn parse_compound_forms() {
        assert!(Selector::parse("div.panel#main[type=checkbox]").is_ok());
        assert!(Selector::parse("*").is_ok());
        assert!(Selector::parse(".item").is_ok());
        assert!(Selector::parse("[data-hook='x y']").is_ok());
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!(Selector::parse("  "), Err(SelectorError::Empty));
        assert!(matches!(
            Selector::parse("div."),
            Err(SelectorError::MissingName { prefix: '.', .. })
        ));
        assert!(matches!(
            Selector::parse("[type=checkbox"),
            Err(SelectorError::UnterminatedAttr { .. })
        ));
        assert!(matches!(
            Selector::parse("div>span"),
            Err(SelectorError::Unexpected { ch: '>', .. })
        ));
    }

    #[test]
    fn matching_by_tag_id_class_attr() {
        let (doc, panel, input, item) = doc();
        let sel = Selector::parse("div.panel").unwrap();
        assert!(sel.matches(&doc, panel));
        assert!(!sel.matches(&doc, item));

        let sel = Selector::parse("#main").unwrap();
        assert_eq!(doc.select_all(&sel), vec![panel]);

        let sel = Selector::parse("input[type=checkbox]").unwrap();
        assert_eq!(doc.select_all(&sel), vec![input]);

        let sel = Selector::parse("[type=radio]").unwrap();
        assert!(doc.select_all(&sel).is_empty());
    }

    #[test]
    fn find_is_descendants_only() {
        let (doc, panel, _input, item) = doc();
        let sel = Selector::parse(".item").unwrap();
        assert_eq!(doc.find(panel, &sel), vec![item]);
        let sel = Selector::parse("div").unwrap();
        assert!(doc.find(panel, &sel).is_empty());
    }

    #[test]
    fn closest_includes_self_then_ancestors() {
        let (doc, panel, input, _item) = doc();
        let sel = Selector::parse(".panel").unwrap();
        assert_eq!(doc.closest(input, &sel), Some(panel));
        assert_eq!(doc.closest(panel, &sel), Some(panel));
        let sel = Selector::parse("form").unwrap();
        assert_eq!(doc.closest(input, &sel), None);
    }
}
