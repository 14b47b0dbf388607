//! Message-flow controller for one chat widget.
//!
//! `submit` drives `Idle -> Pending -> Idle`. The `is_typing` flag is the
//! single-flight guard: it is checked and set under the state lock, and the
//! lock is released while the assistant call is awaited.
//!
//! The lock is never held across an await point, so a blocking mutex is
//! used. That also lets a dropped submission settle itself from `Drop`.

use crate::view::{RenderedMessage, WidgetView};
use std::sync::{Mutex, MutexGuard, PoisonError};
use wework_core::{ConversationStore, Message, Sender, SessionState};
use wework_interaction::{ResolveFailure, ResponseResolver};

/// Why a submission was dropped without touching the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Input was empty or whitespace only.
    Empty,
    /// A reply is still being resolved.
    Pending,
}

/// Result of [`ChatWidget::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A user message and one bot reply were appended.
    Sent {
        reply: Message,
        /// Set when the reply is a local fallback.
        failure: Option<ResolveFailure>,
    },
    Ignored(IgnoreReason),
}

impl SubmitOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    pub fn used_fallback(&self) -> bool {
        matches!(self, Self::Sent { failure: Some(_), .. })
    }
}

struct WidgetInner<V> {
    store: ConversationStore,
    state: SessionState,
    view: V,
}

impl<V: WidgetView> WidgetInner<V> {
    fn append(&mut self, message: Message) {
        self.view.append_message(&RenderedMessage::from_message(&message));
        self.view.scroll_to_bottom();
        self.store.push(message);
    }

    /// Ends the pending phase with `reply`.
    fn settle(&mut self, reply: Message) {
        self.view.hide_typing_indicator();
        self.state.is_typing = false;
        self.append(reply);
    }
}

/// Marks one submission as pending until it is settled.
///
/// Dropping it unsettled (the `submit` future was cancelled mid-call) settles
/// the conversation with a local fallback reply.
struct PendingReply<'a, V: WidgetView> {
    widget: &'a ChatWidget<V>,
    text: &'a str,
    settled: bool,
}

impl<V: WidgetView> PendingReply<'_, V> {
    fn settle(mut self, reply: Message) {
        self.widget.lock().settle(reply);
        self.settled = true;
    }
}

impl<V: WidgetView> Drop for PendingReply<'_, V> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::warn!("submission cancelled before a reply arrived, using fallback reply");
        let reply = self.widget.resolver.fallback(self.text);
        self.widget.lock().settle(reply);
    }
}

/// One widget instance: conversation, flags and the view they drive.
pub struct ChatWidget<V: WidgetView> {
    resolver: ResponseResolver,
    greeting: String,
    inner: Mutex<WidgetInner<V>>,
}

impl<V: WidgetView> ChatWidget<V> {
    /// Creates a closed widget whose conversation holds only `greeting`.
    pub fn new(resolver: ResponseResolver, mut view: V, greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        let store = ConversationStore::with_greeting(&greeting);
        for message in store.messages() {
            view.append_message(&RenderedMessage::from_message(message));
        }

        Self {
            resolver,
            greeting,
            inner: Mutex::new(WidgetInner {
                store,
                state: SessionState::default(),
                view,
            }),
        }
    }

    pub fn resolver(&self) -> &ResponseResolver {
        &self.resolver
    }

    fn lock(&self) -> MutexGuard<'_, WidgetInner<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submits the current contents of the input field.
    pub async fn send_current_input(&self) -> SubmitOutcome {
        let input = self.lock().view.input_text();
        self.submit(&input).await
    }

    /// Sends `raw_text` and appends exactly one bot reply.
    ///
    /// No-op for blank input and while another submission is pending.
    pub async fn submit(&self, raw_text: &str) -> SubmitOutcome {
        let text = raw_text.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::Empty);
        }

        {
            let mut inner = self.lock();
            if inner.state.is_typing {
                tracing::debug!("submission ignored while a reply is pending");
                return SubmitOutcome::Ignored(IgnoreReason::Pending);
            }

            if inner.store.welcome_visible() {
                inner.view.set_welcome_visible(false);
            }
            inner.append(Message::user(text));
            inner.view.clear_input();

            inner.state.is_typing = true;
            inner.view.show_typing_indicator();
        }

        let pending = PendingReply {
            widget: self,
            text,
            settled: false,
        };

        tracing::info!(chars = text.len(), "resolving reply");
        let (reply, failure) = self.resolver.resolve_reporting(text).await;
        pending.settle(reply.clone());

        SubmitOutcome::Sent { reply, failure }
    }

    /// Renders and stores a message without contacting the assistant.
    pub async fn append_message(&self, content: impl Into<String>, sender: Sender) {
        let mut inner = self.lock();
        inner.append(Message::new(content, sender));
    }

    /// Opens or closes the widget; returns whether it is now open.
    pub async fn toggle(&self) -> bool {
        let mut inner = self.lock();
        let open = !inner.state.is_open;
        inner.state.is_open = open;
        inner.view.set_widget_visible(open);

        if open {
            if inner.store.welcome_visible() {
                inner.view.set_welcome_visible(true);
            }
            inner.view.focus_input();
        }
        open
    }

    /// Restarts the conversation from the greeting.
    ///
    /// Returns `false` without changing anything while a reply is pending.
    pub async fn reset(&self) -> bool {
        let mut inner = self.lock();
        if inner.state.is_typing {
            tracing::debug!("reset ignored while a reply is pending");
            return false;
        }

        inner.view.clear_transcript();
        inner.store.reset(self.greeting.as_str());
        if let Some(greeting) = inner.store.last().map(RenderedMessage::from_message) {
            inner.view.append_message(&greeting);
        }
        inner.view.set_welcome_visible(true);
        inner.view.clear_input();
        inner.view.focus_input();
        tracing::info!("conversation reset");
        true
    }

    /// Snapshot of the conversation.
    pub async fn messages(&self) -> Vec<Message> {
        self.lock().store.messages().to_vec()
    }

    pub async fn session_state(&self) -> SessionState {
        self.lock().state
    }

    /// Runs `f` with mutable access to the view, e.g. to feed input.
    pub async fn with_view<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut self.lock().view)
    }
}
