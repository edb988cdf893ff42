//! Per-session delivery queue between emitters and one dispatch loop.
//!
//! A mailbox is a bounded [`tokio::sync::mpsc`] channel split into a
//! [`MailboxSender`] (kept in the registry, cloned by emitters) and a
//! [`Mailbox`] (owned by exactly one dispatch loop). Hand-off never blocks:
//! when the queue is full the newest event is dropped, and once the
//! mailbox is closed every hand-off is rejected.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::LiveEvent;

static NEXT_MAILBOX_ID: AtomicU64 = AtomicU64::new(1);

/// Registration generation of a mailbox.
///
/// Unique for the lifetime of the process. Lets the registry tell a stale
/// stream's cleanup apart from the current registration of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MailboxId(u64);

impl MailboxId {
    /// Allocates the next identifier.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_MAILBOX_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MailboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mb-{}", self.0)
    }
}

/// Outcome of handing an event to a session's mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandOff {
    /// The event is queued for the dispatch loop.
    Queued,
    /// The mailbox was full; the event was dropped.
    Full,
    /// The mailbox was torn down; the event was dropped.
    Closed,
    /// No stream is registered for the session; the event was dropped.
    NoStream,
}

impl HandOff {
    /// Returns `true` if the event reached the mailbox.
    #[must_use]
    pub const fn is_queued(self) -> bool {
        matches!(self, Self::Queued)
    }
}

/// Producer half of a mailbox.
#[derive(Debug, Clone)]
pub struct MailboxSender {
    id: MailboxId,
    tx: mpsc::Sender<LiveEvent>,
}

impl MailboxSender {
    /// Returns the generation of the mailbox this sender feeds.
    #[must_use]
    pub const fn id(&self) -> MailboxId {
        self.id
    }

    /// Queues `event` without waiting.
    ///
    /// Returns [`HandOff::Full`] or [`HandOff::Closed`] when the event had
    /// to be dropped.
    pub fn hand_off(&self, event: LiveEvent) -> HandOff {
        match self.tx.try_send(event) {
            Ok(()) => HandOff::Queued,
            Err(TrySendError::Full(_)) => HandOff::Full,
            Err(TrySendError::Closed(_)) => HandOff::Closed,
        }
    }

    /// Returns `true` once the consumer side has been closed or dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half of a mailbox, read by a single dispatch loop.
#[derive(Debug)]
pub struct Mailbox {
    id: MailboxId,
    rx: mpsc::Receiver<LiveEvent>,
}

impl Mailbox {
    /// Creates a mailbox holding at most `capacity` pending events.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn channel(capacity: usize) -> (MailboxSender, Self) {
        let id = MailboxId::next();
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (MailboxSender { id, tx }, Self { id, rx })
    }

    /// Returns the generation of this mailbox.
    #[must_use]
    pub const fn id(&self) -> MailboxId {
        self.id
    }

    /// Waits for the next event in FIFO order.
    ///
    /// Returns `None` when every sender is gone or the mailbox is closed
    /// and drained.
    pub async fn recv(&mut self) -> Option<LiveEvent> {
        self.rx.recv().await
    }

    /// Stops accepting events and discards whatever is still queued.
    ///
    /// Returns the number of discarded events.
    pub fn close(&mut self) -> usize {
        self.rx.close();
        let mut discarded = 0;
        while self.rx.try_recv().is_ok() {
            discarded += 1;
        }
        discarded
    }
}
