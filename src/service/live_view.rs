//! Live-view emission: hands events to the mailbox of a session's stream.

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::domain::{HandOff, LiveEvent, Registration, SessionId, SessionRegistry};

/// Entry point used by mutation handlers to push updates to open streams.
///
/// Emission is fire-and-forget: the event is queued without waiting and
/// the dispatch loop of the session's stream writes it later. Events for
/// sessions without a stream, or whose mailbox is full or closing, are
/// dropped. Nothing here ever fails the calling request.
#[derive(Debug, Clone)]
pub struct LiveViewService {
    registry: Arc<SessionRegistry>,
    shutdown: CancellationToken,
}

impl LiveViewService {
    /// Creates a service over `registry`. Streams opened through it close
    /// when `shutdown` is cancelled.
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>, shutdown: CancellationToken) -> Self {
        Self { registry, shutdown }
    }

    /// Returns a reference to the inner [`SessionRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Registers a new stream for `session`, replacing any previous one.
    #[must_use]
    pub fn open_stream(&self, session: SessionId) -> Registration {
        self.registry.register(session, &self.shutdown)
    }

    /// Queues `event` for the session's stream.
    ///
    /// The returned outcome is informational; callers are free to ignore
    /// it.
    pub fn emit(&self, session: &SessionId, event: LiveEvent) -> HandOff {
        let kind = event.kind();
        let outcome = self.registry.hand_off(session, event);
        match outcome {
            HandOff::Queued => tracing::trace!(%session, kind, "live event queued"),
            HandOff::NoStream => {
                tracing::debug!(%session, kind, "no live stream for session; event dropped");
            }
            HandOff::Closed => {
                tracing::debug!(%session, kind, "live stream closing; event dropped");
            }
            HandOff::Full => {
                tracing::warn!(%session, kind, "live stream mailbox full; event dropped");
            }
        }
        outcome
    }

    /// Serializes `signals` and queues a signals-only patch.
    ///
    /// A payload that cannot be serialized is logged and nothing is sent.
    pub fn emit_signals<T: Serialize + ?Sized>(&self, session: &SessionId, signals: &T) {
        match LiveEvent::signals_only(signals) {
            Ok(event) => {
                let _ = self.emit(session, event);
            }
            Err(error) => tracing::error!(%session, %error, "failed to marshal signals"),
        }
    }

    /// Queues a view replacement carrying `content`, `location` and
    /// optional `signals`.
    ///
    /// A payload that cannot be serialized is logged and nothing is sent.
    pub fn replace_view<T: Serialize + ?Sized>(
        &self,
        session: &SessionId,
        content: String,
        location: String,
        signals: Option<&T>,
    ) {
        match LiveEvent::view(content, location, signals) {
            Ok(event) => {
                let _ = self.emit(session, event);
            }
            Err(error) => tracing::error!(%session, %error, "failed to marshal signals"),
        }
    }
}
