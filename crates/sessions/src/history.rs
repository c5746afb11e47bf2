//! Append-only conversation history.
//!
//! The store only ever grows at the tail or is emptied wholesale; stored
//! messages are never reordered or handed out mutably.

use parley_domain::message::Message;

/// Ordered record of every message exchanged in a session.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    messages: Vec<Message>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one message to the end.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The full ordered sequence, oldest first.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    /// Drop every message. Used only by session reset.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
