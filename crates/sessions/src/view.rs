//! Presentation-only state layered over the history.

use std::collections::HashSet;

use uuid::Uuid;

/// Which reasoning replies currently have their reasoning expanded.
///
/// Keyed by message id; stored messages are never touched.
#[derive(Debug, Clone, Default)]
pub struct ReasoningView {
    expanded: HashSet<Uuid>,
}

impl ReasoningView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the state for `id`; returns the new state.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    pub fn is_expanded(&self, id: Uuid) -> bool {
        self.expanded.contains(&id)
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }
}
