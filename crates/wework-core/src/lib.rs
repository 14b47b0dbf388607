pub mod config;
pub mod conversation;
pub mod error;
pub mod fallback;
pub mod sanitize;

// Re-export common error type
pub use error::ChatError;

pub use conversation::{ConversationStore, FlowPhase, Message, Sender, SessionState};
pub use sanitize::{SafeMarkup, render};
