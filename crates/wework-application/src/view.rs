//! Presentation adapter boundary.
//!
//! The controller never touches a rendering surface directly. A host binds
//! its element handles (chat container, input field, widget container,
//! toggle icons, welcome banner) behind [`WidgetView`].

use wework_core::sanitize::{SafeMarkup, render};
use wework_core::{Message, Sender};

/// Content of a message as it should be inserted into the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// User text; must be inserted verbatim, never interpreted as markup.
    PlainText(String),
    /// Bot text after escaping and linkification.
    Markup(SafeMarkup),
}

/// A message prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub sender: Sender,
    /// Original unescaped text.
    pub content: String,
    pub body: MessageBody,
}

impl RenderedMessage {
    /// Bot messages go through [`render`]; user messages stay plain text.
    pub fn from_message(message: &Message) -> Self {
        let body = match message.sender() {
            Sender::Bot => MessageBody::Markup(render(message.content())),
            Sender::User => MessageBody::PlainText(message.content().to_string()),
        };
        Self {
            sender: message.sender(),
            content: message.content().to_string(),
            body,
        }
    }
}

/// Rendering surface driven by [`ChatWidget`](crate::ChatWidget).
pub trait WidgetView: Send {
    /// Adds a message to the bottom of the chat container.
    fn append_message(&mut self, message: &RenderedMessage);

    /// Removes every rendered message, including the typing indicator.
    fn clear_transcript(&mut self);

    /// Shows the typing placeholder. Must not stack a second one.
    fn show_typing_indicator(&mut self);

    fn hide_typing_indicator(&mut self);

    /// Shows or hides the widget container and swaps the open/close icons.
    fn set_widget_visible(&mut self, visible: bool);

    fn set_welcome_visible(&mut self, visible: bool);

    /// Current contents of the input field.
    fn input_text(&self) -> String;

    fn clear_input(&mut self);

    fn focus_input(&mut self);

    fn scroll_to_bottom(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_text_is_never_rendered_as_markup() {
        let rendered = RenderedMessage::from_message(&Message::user("<b>hi</b>"));
        assert_eq!(rendered.body, MessageBody::PlainText("<b>hi</b>".into()));
    }

    #[test]
    fn bot_text_is_sanitized() {
        let rendered = RenderedMessage::from_message(&Message::bot("<b>hi</b>"));
        match rendered.body {
            MessageBody::Markup(markup) => assert_eq!(markup.as_str(), "&lt;b&gt;hi&lt;/b&gt;"),
            other => panic!("expected markup, got {other:?}"),
        }
        assert_eq!(rendered.content, "<b>hi</b>");
    }
}
