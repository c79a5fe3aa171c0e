//! Fired UI events.

/// One occurrence of a UI event on a node.
///
/// The dispatcher sets [`Event::prevent_default`] when a matching definition
/// asks for it; the host that raised the event decides what "default
/// behavior" means and consults the flag afterwards.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event type name, e.g. `click` or `change`.
    name: String,
    /// Set once any handler suppressed the default behavior.
    default_prevented: bool,
}

impl Event {
    /// Create a fresh event of the given type.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            default_prevented: false,
        }
    }

    /// Event type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Suppress the event's default behavior.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether default behavior was suppressed.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::Event;

    #[test]
    fn prevent_default_latches() {
        let mut e = Event::new("click");
        assert!(!e.default_prevented());
        e.prevent_default();
        e.prevent_default();
        assert!(e.default_prevented());
    }
}
