//! In-memory conversation history.

use super::message::{Message, Sender};

/// Greeting the bot opens every conversation with.
pub const DEFAULT_GREETING: &str = "Hello, how can I help you today?";

/// Ordered, append-only sequence of messages for one widget instance.
///
/// The only way to remove messages is [`ConversationStore::reset`], which
/// replaces the whole history with a single greeting.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    messages: Vec<Message>,
}

impl ConversationStore {
    /// Creates a store holding only the bot greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::bot(greeting)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replaces the history with a single bot greeting.
    pub fn reset(&mut self, greeting: impl Into<String>) {
        self.messages = vec![Message::bot(greeting)];
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
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

    /// Whether the welcome banner still belongs on screen.
    ///
    /// True while nothing beyond the greeting has been exchanged.
    pub fn welcome_visible(&self) -> bool {
        self.messages.len() <= 1
    }

    /// Number of messages from the given sender.
    pub fn count_from(&self, sender: Sender) -> usize {
        self.messages.iter().filter(|m| m.sender() == sender).count()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::with_greeting(DEFAULT_GREETING)
    }
}
