//! Ternary action-name splitting.

/// An action name split into its condition branches.
///
/// `"show:hide"` runs `show` when the condition holds and `hide` when it
/// does not; a plain name has no negative branch. A `None` branch selected
/// at dispatch is a no-op, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ternary {
    /// Branch taken when the condition verdict is true.
    positive: Option<String>,
    /// Branch taken when the condition verdict is false.
    negative: Option<String>,
}

impl Ternary {
    /// Split an action name on the first `:`.
    ///
    /// `None` (no action) yields a ternary with both branches empty; empty
    /// segments on either side of the `:` become empty branches.
    pub fn split(name: Option<&str>) -> Self {
        let Some(name) = name else {
            return Self::default();
        };
        let (positive, negative) = match name.split_once(':') {
            Some((pos, neg)) => (pos, Some(neg)),
            None => (name, None),
        };
        Self {
            positive: Some(positive)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            negative: negative.filter(|s| !s.is_empty()).map(str::to_string),
        }
    }

    /// Branch taken for a true verdict.
    pub fn positive(&self) -> Option<&str> {
        self.positive.as_deref()
    }

    /// Branch taken for a false verdict.
    pub fn negative(&self) -> Option<&str> {
        self.negative.as_deref()
    }

    /// Select the branch for a condition verdict.
    pub fn pick(&self, verdict: bool) -> Option<&str> {
        if verdict {
            self.positive()
        } else {
            self.negative()
        }
    }
}
