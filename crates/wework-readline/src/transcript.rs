//! HTML export of a finished conversation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use wework_core::Message;
use wework_core::sanitize::{escape_html, render};

/// Renders messages as the widget's chat container markup.
///
/// Bot text goes through the linkifier; user text is only escaped.
pub fn to_html(messages: &[Message]) -> String {
    let mut html = String::from("<div class=\"chat-messages\">\n");
    for message in messages {
        let sender = message.sender();
        let body = if message.is_from_bot() {
            render(message.content()).into_string()
        } else {
            escape_html(message.content())
        };
        html.push_str(&format!(
            "  <div class=\"message {sender}-message\" data-timestamp=\"{}\">\n    <div class=\"message-content\">{body}</div>\n  </div>\n",
            message.timestamp().to_rfc3339()
        ));
    }
    html.push_str("</div>\n");
    html
}

pub fn write(path: &Path, messages: &[Message]) -> Result<()> {
    fs::write(path, to_html(messages))
        .with_context(|| format!("Failed to write transcript to {}", path.display()))?;
    tracing::info!(path = %path.display(), count = messages.len(), "transcript written");
    Ok(())
}
