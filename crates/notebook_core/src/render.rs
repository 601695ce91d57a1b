//! Markdown rendering seam.
//!
//! Rendering note bodies belongs to the UI collaborator; core only defines
//! the contract and a plain fallback.

/// Turns note markdown into HTML for display.
///
/// Implementations must return sanitized HTML: raw markup from note content
/// must never reach the page as executable script.
pub trait MarkdownRenderer {
    fn render_markdown(&self, text: &str) -> String;
}

/// Renders note text verbatim inside `<pre>`, escaping all markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapedTextRenderer;

impl MarkdownRenderer for EscapedTextRenderer {
    fn render_markdown(&self, text: &str) -> String {
        format!("<pre>{}</pre>", escape_html(text))
    }
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
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
