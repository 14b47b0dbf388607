//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: message record and sender (`Message`, `Sender`)
//! - `store`: append-only history (`ConversationStore`)
//! - `state`: transient widget flags (`SessionState`, `FlowPhase`)

mod message;
mod state;
mod store;

pub use message::{Message, Sender};
pub use state::{FlowPhase, SessionState};
pub use store::{ConversationStore, DEFAULT_GREETING};
