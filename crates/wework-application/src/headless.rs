//! In-memory [`WidgetView`] for test harnesses and non-visual hosts.

use crate::view::{RenderedMessage, WidgetView};
use wework_core::Sender;

/// Every call the controller made on the view, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Appended(Sender),
    TypingShown,
    TypingHidden,
    TranscriptCleared,
    WidgetVisible(bool),
    WelcomeVisible(bool),
    InputCleared,
    InputFocused,
    ScrolledToBottom,
}

/// Records view state instead of drawing it.
#[derive(Debug, Clone, Default)]
pub struct HeadlessView {
    pub transcript: Vec<RenderedMessage>,
    pub typing_indicator: bool,
    pub widget_visible: bool,
    pub welcome_visible: bool,
    pub input: String,
    pub input_focused: bool,
    pub events: Vec<ViewEvent>,
}

impl HeadlessView {
    pub fn new() -> Self {
        Self {
            welcome_visible: true,
            ..Self::default()
        }
    }

    /// Simulates typing into the input field.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Number of typing placeholders currently on screen (0 or 1).
    pub fn typing_placeholders(&self) -> usize {
        usize::from(self.typing_indicator)
    }
}

impl WidgetView for HeadlessView {
    fn append_message(&mut self, message: &RenderedMessage) {
        self.transcript.push(message.clone());
        self.events.push(ViewEvent::Appended(message.sender));
    }

    fn clear_transcript(&mut self) {
        self.transcript.clear();
        self.typing_indicator = false;
        self.events.push(ViewEvent::TranscriptCleared);
    }

    fn show_typing_indicator(&mut self) {
        if self.typing_indicator {
            return;
        }
        self.typing_indicator = true;
        self.events.push(ViewEvent::TypingShown);
    }

    fn hide_typing_indicator(&mut self) {
        self.typing_indicator = false;
        self.events.push(ViewEvent::TypingHidden);
    }

    fn set_widget_visible(&mut self, visible: bool) {
        self.widget_visible = visible;
        self.events.push(ViewEvent::WidgetVisible(visible));
    }

    fn set_welcome_visible(&mut self, visible: bool) {
        self.welcome_visible = visible;
        self.events.push(ViewEvent::WelcomeVisible(visible));
    }

    fn input_text(&self) -> String {
        self.input.clone()
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.events.push(ViewEvent::InputCleared);
    }

    fn focus_input(&mut self) {
        self.input_focused = true;
        self.events.push(ViewEvent::InputFocused);
    }

    fn scroll_to_bottom(&mut self) {
        self.events.push(ViewEvent::ScrolledToBottom);
    }
}
