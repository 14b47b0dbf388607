//! Transient per-widget flags.

use serde::{Deserialize, Serialize};

/// Flags tracked for one widget instance. Not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// A bot reply is being resolved; doubles as the single-flight guard.
    pub is_typing: bool,
    /// The widget container is shown.
    pub is_open: bool,
}

/// Phase of the message-flow controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowPhase {
    Idle,
    Pending,
}

impl SessionState {
    pub fn phase(&self) -> FlowPhase {
        if self.is_typing {
            FlowPhase::Pending
        } else {
            FlowPhase::Idle
        }
    }
}
