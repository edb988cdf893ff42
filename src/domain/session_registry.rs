//! Process-wide map from session identifier to its live stream.
//!
//! [`SessionRegistry`] stores one entry per session: the producer half of
//! the session's mailbox and the cancellation token of the dispatch loop
//! reading it. Every operation holds a single [`parking_lot::Mutex`] for
//! the duration of the map operation only; no stream I/O and no `.await`
//! ever happens under the lock.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::mailbox::{HandOff, Mailbox, MailboxId, MailboxSender};
use super::{LiveEvent, SessionId};

/// Registry entry for one open stream.
#[derive(Debug)]
struct StreamEntry {
    sender: MailboxSender,
    cancel: CancellationToken,
}

/// Everything a dispatch loop needs to serve a freshly opened stream.
#[derive(Debug)]
pub struct Registration {
    /// Session the stream belongs to.
    pub session: SessionId,
    /// Consumer half of the session's mailbox.
    pub mailbox: Mailbox,
    /// Fires when the stream must close (disconnect, replacement, shutdown).
    pub cancel: CancellationToken,
}

/// Central store of open streams, keyed by [`SessionId`].
///
/// # Concurrency
///
/// - Lookup and hand-off happen under one lock acquisition, so an event is
///   never queued into an entry after its removal.
/// - Registering a session that already has a stream replaces the entry
///   and cancels the previous stream's loop.
/// - Cleanup of a stale loop never removes a newer registration
///   ([`SessionRegistry::release`] checks the mailbox generation).
#[derive(Debug)]
pub struct SessionRegistry {
    streams: Mutex<HashMap<SessionId, StreamEntry>>,
    mailbox_capacity: usize,
}

impl SessionRegistry {
    /// Creates an empty registry whose mailboxes hold at most
    /// `mailbox_capacity` pending events.
    #[must_use]
    pub fn new(mailbox_capacity: usize) -> Self {
        Self {
            streams: Mutex::new(HashMap::new()),
            mailbox_capacity,
        }
    }

    /// Opens a mailbox for `session` and installs it as the session's
    /// current stream.
    ///
    /// The returned cancellation token is a child of `parent`, so shutting
    /// down the parent closes the stream. If the session already had a
    /// stream, that entry is replaced and its loop is cancelled.
    pub fn register(&self, session: SessionId, parent: &CancellationToken) -> Registration {
        let (sender, mailbox) = Mailbox::channel(self.mailbox_capacity);
        let cancel = parent.child_token();
        let mailbox_id = sender.id();

        let replaced = self.streams.lock().insert(
            session.clone(),
            StreamEntry {
                sender,
                cancel: cancel.clone(),
            },
        );

        if let Some(previous) = replaced {
            previous.cancel.cancel();
            tracing::debug!(
                %session,
                replaced = %previous.sender.id(),
                mailbox = %mailbox_id,
                "stream replaced by newer registration"
            );
        }

        Registration {
            session,
            mailbox,
            cancel,
        }
    }

    /// Removes the stream registered for `session`, if any, and cancels
    /// its loop. Idempotent.
    ///
    /// Returns `true` if an entry was removed.
    pub fn deregister(&self, session: &SessionId) -> bool {
        let removed = self.streams.lock().remove(session);
        match removed {
            Some(entry) => {
                entry.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Removes the entry for `session` only if it still belongs to the
    /// mailbox `id`.
    ///
    /// Returns `true` if an entry was removed.
    pub fn release(&self, session: &SessionId, id: MailboxId) -> bool {
        let mut streams = self.streams.lock();
        match streams.get(session) {
            Some(entry) if entry.sender.id() == id => {
                streams.remove(session);
                true
            }
            _ => false,
        }
    }

    /// Returns the producer half of the session's current mailbox.
    #[must_use]
    pub fn lookup(&self, session: &SessionId) -> Option<MailboxSender> {
        self.streams
            .lock()
            .get(session)
            .map(|entry| entry.sender.clone())
    }

    /// Queues `event` for the session's current stream without waiting.
    ///
    /// Returns [`HandOff::NoStream`] when no stream is registered.
    pub fn hand_off(&self, session: &SessionId, event: LiveEvent) -> HandOff {
        let streams = self.streams.lock();
        streams
            .get(session)
            .map_or(HandOff::NoStream, |entry| entry.sender.hand_off(event))
    }

    /// Returns `true` if a stream is registered for `session`.
    #[must_use]
    pub fn contains(&self, session: &SessionId) -> bool {
        self.streams.lock().contains_key(session)
    }

    /// Returns the number of open streams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.lock().len()
    }

    /// Returns `true` if no stream is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.lock().is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAILBOX_CAPACITY)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signals(x: i64) -> LiveEvent {
        LiveEvent::SignalsOnly {
            signals: json!({ "x": x }),
        }
    }

    #[test]
    fn register_and_lookup() {
        let registry = SessionRegistry::new(8);
        let root = CancellationToken::new();
        let reg = registry.register(SessionId::from("s1"), &root);

        let Some(sender) = registry.lookup(&SessionId::from("s1")) else {
            panic!("expected a registered stream");
        };
        assert_eq!(sender.id(), reg.mailbox.id());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_unknown_is_none() {
        let registry = SessionRegistry::new(8);
        assert!(registry.lookup(&SessionId::from("nope")).is_none());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn hand_off_reaches_mailbox() {
        let registry = SessionRegistry::new(8);
        let root = CancellationToken::new();
        let mut reg = registry.register(SessionId::from("s1"), &root);

        let outcome = registry.hand_off(&SessionId::from("s1"), signals(1));
        assert_eq!(outcome, HandOff::Queued);
        assert_eq!(reg.mailbox.recv().await, Some(signals(1)));
    }

    #[test]
    fn hand_off_without_stream_is_dropped() {
        let registry = SessionRegistry::new(8);
        let outcome = registry.hand_off(&SessionId::from("unknown-session"), signals(1));
        assert_eq!(outcome, HandOff::NoStream);
        assert!(registry.is_empty());
    }

    #[test]
    fn deregister_is_idempotent_and_cancels() {
        let registry = SessionRegistry::new(8);
        let root = CancellationToken::new();
        let reg = registry.register(SessionId::from("s1"), &root);

        assert!(registry.deregister(&SessionId::from("s1")));
        assert!(!registry.deregister(&SessionId::from("s1")));
        assert!(reg.cancel.is_cancelled());
        assert_eq!(
            registry.hand_off(&SessionId::from("s1"), signals(1)),
            HandOff::NoStream
        );
    }

    #[tokio::test]
    async fn re_register_routes_to_new_mailbox_only() {
        let registry = SessionRegistry::new(8);
        let root = CancellationToken::new();
        let mut old = registry.register(SessionId::from("s1"), &root);
        let mut new = registry.register(SessionId::from("s1"), &root);

        assert!(old.cancel.is_cancelled());
        assert!(!new.cancel.is_cancelled());
        assert_eq!(registry.len(), 1);

        let _ = registry.hand_off(&SessionId::from("s1"), signals(7));
        assert_eq!(new.mailbox.recv().await, Some(signals(7)));
        old.mailbox.close();
        assert!(old.mailbox.recv().await.is_none());
    }

    #[test]
    fn stale_release_keeps_newer_registration() {
        let registry = SessionRegistry::new(8);
        let root = CancellationToken::new();
        let old = registry.register(SessionId::from("s1"), &root);
        let new = registry.register(SessionId::from("s1"), &root);

        assert!(!registry.release(&SessionId::from("s1"), old.mailbox.id()));
        assert!(registry.contains(&SessionId::from("s1")));

        assert!(registry.release(&SessionId::from("s1"), new.mailbox.id()));
        assert!(!registry.contains(&SessionId::from("s1")));
    }

    #[test]
    fn parent_cancellation_reaches_streams() {
        let registry = SessionRegistry::new(8);
        let root = CancellationToken::new();
        let a = registry.register(SessionId::from("a"), &root);
        let b = registry.register(SessionId::from("b"), &root);

        root.cancel();
        assert!(a.cancel.is_cancelled());
        assert!(b.cancel.is_cancelled());
    }
}
