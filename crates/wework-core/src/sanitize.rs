//! Bot-text sanitizer and linkifier.
//!
//! Bot replies come from a remote service and are shown as markup, so they
//! are escaped before any markup is added. User-authored text never goes
//! through [`render`]; presentation adapters insert it as plain text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

/// `http(s)://` followed by anything up to whitespace or a closing paren.
static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s)]+").expect("URL pattern is valid"));

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

const LINK_STYLE: &str = "color: #3b82f6; text-decoration: underline;";

/// Markup produced by [`render`], safe to insert as HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeMarkup(String);

impl SafeMarkup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SafeMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SafeMarkup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A URL located in raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSpan<'a> {
    /// Byte offset where the URL starts.
    pub start: usize,
    /// Byte offset just past the URL, trailing punctuation excluded.
    pub end: usize,
    pub url: &'a str,
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Splits a URL match into the link target and the punctuation trailing it.
fn split_trailing_punctuation(url: &str) -> (&str, &str) {
    let clean = url.trim_end_matches(TRAILING_PUNCTUATION);
    (clean, &url[clean.len()..])
}

/// Turns a bot reply into safe markup.
///
/// Escaping runs over the whole string first, then URLs are wrapped in
/// anchors opening a new browsing context, then newlines become `<br>`.
pub fn render(text: &str) -> SafeMarkup {
    let escaped = escape_html(text);

    let linked = URL_PATTERN.replace_all(&escaped, |caps: &Captures<'_>| {
        let (clean, punctuation) = split_trailing_punctuation(&caps[0]);
        format!(
            "<a href=\"{clean}\" target=\"_blank\" rel=\"noopener noreferrer\" style=\"{LINK_STYLE}\">{clean}</a>{punctuation}"
        )
    });

    SafeMarkup(linked.replace('\n', "<br>"))
}

/// Finds URLs in raw (unescaped) text using the same rules as [`render`].
pub fn find_links(text: &str) -> Vec<LinkSpan<'_>> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| {
            let (clean, _) = split_trailing_punctuation(m.as_str());
            LinkSpan {
                start: m.start(),
                end: m.start() + clean.len(),
                url: clean,
            }
        })
        .collect()
}
