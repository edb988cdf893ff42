//! Markup rendering.
//!
//! Pure functions from domain data to HTML strings. Every fragment pushed
//! over a live stream has `<main id="view">` as its root so the client
//! morphs it in place of the current view.

mod components;

pub use components::{layout, todo_edit, todo_list, todo_new};

/// Escapes text for use in HTML content and quoted attribute values.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
