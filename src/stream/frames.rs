//! Transport frames written to an open live stream.
//!
//! The wire format is Datastar's server-sent-events protocol: every frame
//! is one SSE event whose `data:` lines are prefixed with a field name
//! (`elements`, `selector`, `mode`, `signals`).

use axum::response::sse::Event;

/// SSE event name for markup patches.
pub const PATCH_ELEMENTS_EVENT: &str = "datastar-patch-elements";

/// SSE event name for signal patches.
pub const PATCH_SIGNALS_EVENT: &str = "datastar-patch-signals";

/// One protocol write on a live stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Morph the given markup into the page.
    PatchElements {
        /// Rendered markup fragment.
        elements: String,
    },

    /// Replace the browser URL without navigating.
    ReplaceUrl {
        /// New location (path and query).
        location: String,
    },

    /// Merge signal values on the client.
    PatchSignals {
        /// Serialized JSON object.
        signals: String,
    },
}

impl Frame {
    /// Builds a markup patch frame.
    #[must_use]
    pub fn patch_elements(elements: impl Into<String>) -> Self {
        Self::PatchElements {
            elements: elements.into(),
        }
    }

    /// Builds a URL replacement frame.
    #[must_use]
    pub fn replace_url(location: impl Into<String>) -> Self {
        Self::ReplaceUrl {
            location: location.into(),
        }
    }

    /// Serializes `signals` into a signal patch frame.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] raised while serializing.
    pub fn patch_signals(signals: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(Self::PatchSignals {
            signals: serde_json::to_string(signals)?,
        })
    }

    /// SSE event name carrying this frame.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::PatchElements { .. } | Self::ReplaceUrl { .. } => PATCH_ELEMENTS_EVENT,
            Self::PatchSignals { .. } => PATCH_SIGNALS_EVENT,
        }
    }

    /// The `data:` lines of this frame, without the `data: ` prefix.
    #[must_use]
    pub fn data_lines(&self) -> Vec<String> {
        match self {
            Self::PatchElements { elements } => prefixed("elements", elements),
            Self::ReplaceUrl { location } => {
                let mut lines = vec!["selector body".to_string(), "mode append".to_string()];
                lines.extend(prefixed("elements", &replace_url_script(location)));
                lines
            }
            Self::PatchSignals { signals } => prefixed("signals", signals),
        }
    }

    /// Converts the frame into an axum SSE [`Event`].
    #[must_use]
    pub fn to_sse_event(&self) -> Event {
        Event::default()
            .event(self.event_name())
            .data(self.data_lines().join("\n"))
    }
}

/// Prefixes every line of `content` with `field`.
fn prefixed(field: &str, content: &str) -> Vec<String> {
    if content.is_empty() {
        return vec![field.to_string()];
    }
    content
        .lines()
        .map(|line| format!("{field} {line}"))
        .collect()
}

/// Self-removing script that rewrites the browser history entry.
fn replace_url_script(location: &str) -> String {
    let quoted = serde_json::Value::String(location.to_string())
        .to_string()
        .replace('<', "\\u003c");
    format!(
        r#"<script data-effect="el.remove()">window.history.replaceState({{}}, "", {quoted})</script>"#
    )
}
