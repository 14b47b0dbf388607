use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use wework_application::{
    ChatWidget, HeadlessView, IgnoreReason, MessageBody, SubmitOutcome, ViewEvent,
};
use wework_core::conversation::DEFAULT_GREETING;
use wework_core::fallback::{DEFAULT_REPLIES, FallbackResponder};
use wework_core::{FlowPhase, Sender};
use wework_interaction::{AssistantBackend, ResolveFailure, ResponseResolver};

/// Backend returning a fixed result, optionally held until released.
struct ScriptedBackend {
    result: Result<String, ResolveFailure>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(text.to_string()),
            gate: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(failure: ResolveFailure) -> Arc<Self> {
        Arc::new(Self {
            result: Err(failure),
            gate: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn gated(text: &str, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(text.to_string()),
            gate: Some(gate),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssistantBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn ask(&self, _query: &str) -> Result<String, ResolveFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.result.clone()
    }
}

fn widget(backend: Arc<ScriptedBackend>) -> ChatWidget<HeadlessView> {
    let resolver = ResponseResolver::with_fallback(
        backend,
        FallbackResponder::with_rng(StdRng::seed_from_u64(99)),
    );
    ChatWidget::new(resolver, HeadlessView::new(), DEFAULT_GREETING)
}

#[tokio::test]
async fn submit_appends_user_then_bot() {
    let backend = ScriptedBackend::replying("Your booking is confirmed.");
    let widget = widget(backend.clone());

    let outcome = widget.submit("  Book a room for 3pm  ").await;
    assert!(outcome.is_sent());
    assert!(!outcome.used_fallback());

    let messages = widget.messages().await;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].sender(), Sender::User);
    assert_eq!(messages[1].content(), "Book a room for 3pm");
    assert_eq!(messages[2].sender(), Sender::Bot);
    assert_eq!(messages[2].content(), "Your booking is confirmed.");
    assert_eq!(backend.calls(), 1);
    assert_eq!(widget.session_state().await.phase(), FlowPhase::Idle);
}

#[tokio::test]
async fn blank_input_is_ignored() {
    let backend = ScriptedBackend::replying("unused");
    let widget = widget(backend.clone());

    assert_eq!(
        widget.submit("").await,
        SubmitOutcome::Ignored(IgnoreReason::Empty)
    );
    assert_eq!(
        widget.submit(" \t\n ").await,
        SubmitOutcome::Ignored(IgnoreReason::Empty)
    );
    assert_eq!(widget.messages().await.len(), 1);
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn second_submit_while_pending_is_ignored() {
    let gate = Arc::new(Notify::new());
    let backend = ScriptedBackend::gated("first answer", gate.clone());
    let widget = widget(backend.clone());

    let first = widget.submit("first question");
    let second = async {
        tokio::task::yield_now().await;
        assert_eq!(widget.session_state().await.phase(), FlowPhase::Pending);
        let outcome = widget.submit("second question").await;
        gate.notify_one();
        outcome
    };
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_sent());
    assert_eq!(second, SubmitOutcome::Ignored(IgnoreReason::Pending));
    assert_eq!(backend.calls(), 1);

    let contents: Vec<String> = widget
        .messages()
        .await
        .iter()
        .map(|m| m.content().to_string())
        .collect();
    assert_eq!(
        contents,
        vec![DEFAULT_GREETING, "first question", "first answer"]
    );
}

#[tokio::test]
async fn cancelled_submit_settles_with_fallback_and_unblocks_widget() {
    let gate = Arc::new(Notify::new());
    let backend = ScriptedBackend::gated("late answer", gate.clone());
    let widget = widget(backend.clone());

    let timed_out = tokio::time::timeout(Duration::from_millis(20), widget.submit("book a room"))
        .await
        .is_err();
    assert!(timed_out);

    assert_eq!(widget.session_state().await.phase(), FlowPhase::Idle);
    let messages = widget.messages().await;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].content(), "book a room");
    assert_eq!(messages[2].sender(), Sender::Bot);
    assert!(messages[2].content().contains("book a meeting room"));
    assert_eq!(widget.with_view(|view| view.typing_placeholders()).await, 0);

    gate.notify_one();
    let next = widget.submit("hello again").await;
    assert!(next.is_sent());
    assert!(!next.used_fallback());
    assert_eq!(widget.messages().await.len(), 5);
    assert_eq!(backend.calls(), 2);
    assert!(widget.reset().await);
}

#[tokio::test]
async fn typing_indicator_is_removed_before_reply() {
    let widget = widget(ScriptedBackend::replying("done"));
    widget.submit("hello there").await;

    widget
        .with_view(|view| {
            assert_eq!(view.typing_placeholders(), 0);

            let shown = view
                .events
                .iter()
                .position(|e| *e == ViewEvent::TypingShown)
                .unwrap();
            let hidden = view
                .events
                .iter()
                .position(|e| *e == ViewEvent::TypingHidden)
                .unwrap();
            let bot_appended = view
                .events
                .iter()
                .rposition(|e| *e == ViewEvent::Appended(Sender::Bot))
                .unwrap();
            assert!(shown < hidden && hidden < bot_appended);
            assert_eq!(
                view.events
                    .iter()
                    .filter(|e| **e == ViewEvent::TypingShown)
                    .count(),
                1
            );
        })
        .await;
}

#[tokio::test]
async fn failed_call_still_appends_one_bot_message() {
    let backend = ScriptedBackend::failing(ResolveFailure::transport("connection refused"));
    let widget = widget(backend);

    let outcome = widget.submit("I need wifi help").await;
    assert!(outcome.used_fallback());

    let messages = widget.messages().await;
    assert_eq!(messages.len(), 3);
    assert!(messages[2].content().contains("Wi-Fi issues"));
    assert!(!widget.session_state().await.is_typing);
}

#[tokio::test]
async fn unmatched_failure_uses_a_default_reply() {
    let widget = widget(ScriptedBackend::failing(ResolveFailure::Protocol {
        status: 502,
    }));

    match widget.submit("xyz123").await {
        SubmitOutcome::Sent { reply, failure } => {
            assert!(DEFAULT_REPLIES.iter().any(|r| *r == reply.content()));
            assert_eq!(failure, Some(ResolveFailure::Protocol { status: 502 }));
        }
        other => panic!("expected an answer, got {other:?}"),
    }
}

#[tokio::test]
async fn user_text_is_shown_verbatim_and_bot_text_is_escaped() {
    let widget = widget(ScriptedBackend::replying(
        "See https://wework.co.in/help, <b>now</b>",
    ));
    widget.submit("<img src=x onerror=alert(1)>").await;

    widget
        .with_view(|view| {
            let user = &view.transcript[1];
            assert_eq!(
                user.body,
                MessageBody::PlainText("<img src=x onerror=alert(1)>".into())
            );

            let MessageBody::Markup(markup) = &view.transcript[2].body else {
                panic!("bot message should be markup");
            };
            assert!(markup.as_str().contains(r#"href="https://wework.co.in/help""#));
            assert!(markup.as_str().contains("</a>, &lt;b&gt;now&lt;/b&gt;"));
        })
        .await;
}

#[tokio::test]
async fn welcome_banner_hides_after_first_message() {
    let widget = widget(ScriptedBackend::replying("ok"));
    assert!(widget.with_view(|view| view.welcome_visible).await);

    widget.submit("hi").await;
    assert!(!widget.with_view(|view| view.welcome_visible).await);
}

#[tokio::test]
async fn send_current_input_reads_and_clears_field() {
    let backend = ScriptedBackend::replying("Printer drivers are on the intranet.");
    let widget = widget(backend);

    widget.with_view(|view| view.set_input("printer broken")).await;
    let outcome = widget.send_current_input().await;

    assert!(outcome.is_sent());
    assert_eq!(widget.with_view(|view| view.input.clone()).await, "");
    assert_eq!(widget.messages().await[1].content(), "printer broken");
}

#[tokio::test]
async fn reset_restores_single_greeting() {
    let widget = widget(ScriptedBackend::replying("ok"));
    widget.submit("book a room").await;
    widget.submit("and a desk").await;

    assert!(widget.reset().await);

    let messages = widget.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender(), Sender::Bot);
    assert_eq!(messages[0].content(), DEFAULT_GREETING);

    widget
        .with_view(|view| {
            assert!(view.welcome_visible);
            assert_eq!(view.transcript.len(), 1);
            assert!(view.input_focused);
        })
        .await;
}

#[tokio::test]
async fn toggle_opens_and_closes() {
    let widget = widget(ScriptedBackend::replying("ok"));

    assert!(widget.toggle().await);
    assert!(widget.session_state().await.is_open);
    widget
        .with_view(|view| {
            assert!(view.widget_visible);
            assert!(view.input_focused);
            assert!(view.welcome_visible);
        })
        .await;

    assert!(!widget.toggle().await);
    assert!(!widget.with_view(|view| view.widget_visible).await);
}

#[tokio::test]
async fn reopening_after_conversation_keeps_banner_hidden() {
    let widget = widget(ScriptedBackend::replying("ok"));
    widget.toggle().await;
    widget.submit("hello").await;
    widget.toggle().await;
    widget.toggle().await;

    assert!(!widget.with_view(|view| view.welcome_visible).await);
}

#[tokio::test]
async fn append_message_renders_by_sender() {
    let widget = widget(ScriptedBackend::replying("unused"));
    widget
        .append_message("Visit https://example.com, thanks.", Sender::Bot)
        .await;

    let messages = widget.messages().await;
    assert_eq!(messages.len(), 2);

    widget
        .with_view(|view| {
            let MessageBody::Markup(markup) = &view.transcript[1].body else {
                panic!("bot message should be markup");
            };
            assert!(markup.as_str().contains(r#"href="https://example.com""#));
            assert!(markup.as_str().contains("</a>, thanks."));
            assert_eq!(view.events.last(), Some(&ViewEvent::ScrolledToBottom));
        })
        .await;
}
