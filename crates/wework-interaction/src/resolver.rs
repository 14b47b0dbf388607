//! Turns user text into a bot message.

use crate::AssistantBackend;
use crate::failure::ResolveFailure;
use std::sync::Arc;
use wework_core::Message;
use wework_core::fallback::FallbackResponder;

/// Makes one assistant call per query and supplies local fallback replies.
///
/// [`attempt`](Self::attempt) exposes the classified outcome of the call.
/// [`resolve`](Self::resolve) and [`resolve_reporting`](Self::resolve_reporting)
/// always yield a bot message.
pub struct ResponseResolver {
    backend: Arc<dyn AssistantBackend>,
    fallback: FallbackResponder,
}

impl ResponseResolver {
    pub fn new(backend: Arc<dyn AssistantBackend>) -> Self {
        Self::with_fallback(backend, FallbackResponder::new())
    }

    /// Uses a caller-supplied fallback responder, e.g. one with a seeded RNG.
    pub fn with_fallback(backend: Arc<dyn AssistantBackend>, fallback: FallbackResponder) -> Self {
        Self { backend, fallback }
    }

    pub fn backend(&self) -> &Arc<dyn AssistantBackend> {
        &self.backend
    }

    /// Performs exactly one backend call. No retry.
    pub async fn attempt(&self, text: &str) -> Result<Message, ResolveFailure> {
        let reply = self.backend.ask(text).await?;
        Ok(Message::bot(reply))
    }

    /// Local reply for `text`, without touching the network.
    pub fn fallback(&self, text: &str) -> Message {
        Message::bot(self.fallback.reply_for(text))
    }

    /// Remote reply when the call succeeds, fallback reply otherwise.
    pub async fn resolve(&self, text: &str) -> Message {
        self.resolve_reporting(text).await.0
    }

    /// Like [`resolve`](Self::resolve), also returning the failure that
    /// caused a fallback reply.
    pub async fn resolve_reporting(&self, text: &str) -> (Message, Option<ResolveFailure>) {
        match self.attempt(text).await {
            Ok(message) => (message, None),
            Err(failure) => {
                tracing::warn!(
                    backend = self.backend.name(),
                    kind = failure.kind(),
                    error = %failure,
                    "assistant call failed, using fallback reply"
                );
                (self.fallback(text), Some(failure))
            }
        }
    }
}
