//! Terminal rendering of the widget.

use colored::Colorize;
use std::io::{self, Write};
use wework_application::{RenderedMessage, WidgetView};
use wework_core::Sender;
use wework_core::sanitize::find_links;

const WELCOME_LINES: &[&str] = &[
    "Welcome to WeWork India support.",
    "Ask about bookings, Wi-Fi, printing, billing, access or facilities.",
];

/// A piece of bot text: plain, or a URL to highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Link(&'a str),
}

/// Splits one line of raw bot text around its URLs.
pub fn segments(line: &str) -> Vec<Segment<'_>> {
    let mut parts = Vec::new();
    let mut cursor = 0;
    for link in find_links(line) {
        if link.start > cursor {
            parts.push(Segment::Text(&line[cursor..link.start]));
        }
        parts.push(Segment::Link(link.url));
        cursor = link.end;
    }
    if cursor < line.len() {
        parts.push(Segment::Text(&line[cursor..]));
    }
    parts
}

/// Prints the conversation to stdout. Only the input buffer is kept.
#[derive(Debug, Default)]
pub struct TerminalView {
    input: String,
    typing: bool,
    visible: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Stores a line read by the REPL as the input field contents.
    pub fn set_input(&mut self, line: impl Into<String>) {
        self.input = line.into();
    }

    fn print_bot(content: &str) {
        println!("{}", "[we]".bright_magenta());
        for line in content.lines() {
            let rendered: String = segments(line)
                .into_iter()
                .map(|segment| match segment {
                    Segment::Text(text) => text.bright_blue().to_string(),
                    Segment::Link(url) => url.blue().underline().to_string(),
                })
                .collect();
            println!("{rendered}");
        }
        println!();
    }
}

impl WidgetView for TerminalView {
    fn append_message(&mut self, message: &RenderedMessage) {
        match message.sender {
            // Printed as-is; the terminal never interprets user text.
            Sender::User => println!("{}", format!("> {}", message.content).green()),
            Sender::Bot => Self::print_bot(&message.content),
        }
    }

    fn clear_transcript(&mut self) {
        self.typing = false;
        println!("{}", "--- conversation cleared ---".bright_black());
    }

    fn show_typing_indicator(&mut self) {
        if self.typing {
            return;
        }
        self.typing = true;
        print!("{}", "we is typing...".bright_black());
        let _ = io::stdout().flush();
    }

    fn hide_typing_indicator(&mut self) {
        if self.typing {
            print!("\r\x1b[2K");
            let _ = io::stdout().flush();
        }
        self.typing = false;
    }

    fn set_widget_visible(&mut self, visible: bool) {
        self.visible = visible;
        if visible {
            println!("{}", "[chat opened]".bright_green());
        } else {
            println!("{}", "[chat closed, type /open to continue]".bright_black());
        }
    }

    fn set_welcome_visible(&mut self, visible: bool) {
        if visible {
            for line in WELCOME_LINES {
                println!("{}", line.bright_yellow());
            }
            println!();
        }
    }

    fn input_text(&self) -> String {
        self.input.clone()
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn focus_input(&mut self) {}
}
