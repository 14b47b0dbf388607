//! Classification of failed assistant calls.

use thiserror::Error;

/// Why an assistant call produced no usable reply.
///
/// Every variant is recovered from the same way (a local fallback reply);
/// the distinction exists for logging and tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveFailure {
    /// The request never completed: connect, DNS or body read failure.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Protocol { status: u16 },

    /// The payload was malformed, lacked a reply, or reported `success: false`.
    #[error("unusable response: {0}")]
    Semantic(String),
}

impl ResolveFailure {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn semantic(message: impl Into<String>) -> Self {
        Self::Semantic(message.into())
    }

    /// Short label for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Protocol { .. } => "protocol",
            Self::Semantic(_) => "semantic",
        }
    }
}

impl From<serde_json::Error> for ResolveFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::Semantic(format!("malformed JSON: {err}"))
    }
}
