//! Live-view events delivered through a session's mailbox.
//!
//! A [`LiveEvent`] is an immutable instruction for one open stream. It
//! carries no session identifier; membership is implied by the mailbox it
//! was handed to.

use serde::Serialize;

use crate::error::AppError;

/// Instruction to update the live view of one browser session.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    /// Replace the main view with freshly rendered markup.
    ///
    /// Written as an element patch, then a URL replacement, then (when
    /// present) a signals patch.
    ViewReplacement {
        /// Rendered markup fragment.
        content: String,
        /// Canonical location the browser URL is replaced with.
        location: String,
        /// Optional signal values applied after the markup.
        signals: Option<serde_json::Value>,
    },

    /// Patch client-side signals without touching the markup.
    SignalsOnly {
        /// Signal values to merge on the client.
        signals: serde_json::Value,
    },
}

impl LiveEvent {
    /// Builds a [`LiveEvent::ViewReplacement`], serializing `signals` if
    /// given.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Serialization`] if the signal payload cannot be
    /// converted to JSON.
    pub fn view<T: Serialize + ?Sized>(
        content: impl Into<String>,
        location: impl Into<String>,
        signals: Option<&T>,
    ) -> Result<Self, AppError> {
        let signals = signals.map(serde_json::to_value).transpose()?;
        Ok(Self::ViewReplacement {
            content: content.into(),
            location: location.into(),
            signals,
        })
    }

    /// Builds a [`LiveEvent::SignalsOnly`] from any serializable payload.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Serialization`] if the payload cannot be
    /// converted to JSON.
    pub fn signals_only<T: Serialize + ?Sized>(signals: &T) -> Result<Self, AppError> {
        Ok(Self::SignalsOnly {
            signals: serde_json::to_value(signals)?,
        })
    }

    /// Returns the event kind as a static string slice, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ViewReplacement { .. } => "view_replacement",
            Self::SignalsOnly { .. } => "signals_only",
        }
    }
}
