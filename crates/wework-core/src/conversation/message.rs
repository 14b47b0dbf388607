//! Conversation message types.
//!
//! This module contains the record appended to the conversation for every
//! user submission and every bot reply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the person using the widget.
    User,
    /// Reply from the assistant, remote or fallback.
    Bot,
}

impl Sender {
    /// Short label used for avatars and CSS class prefixes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in the conversation.
///
/// Messages are immutable once created: fields are private and only exposed
/// through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    content: String,
    sender: Sender,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a message stamped with the current time.
    pub fn new(content: impl Into<String>, sender: Sender) -> Self {
        Self::at(content, sender, Utc::now())
    }

    /// Creates a message with an explicit timestamp.
    pub fn at(content: impl Into<String>, sender: Sender, timestamp: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            sender,
            timestamp,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Sender::User)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(content, Sender::Bot)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_from_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_serializes_lowercase() {
        let json = serde_json::to_string(&Sender::Bot).unwrap();
        assert_eq!(json, "\"bot\"");
    }

    #[test]
    fn constructors_set_sender() {
        assert_eq!(Message::user("hi").sender(), Sender::User);
        assert!(Message::bot("hello").is_from_bot());
    }
}
