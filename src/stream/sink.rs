//! Destinations for protocol frames.
//!
//! [`FrameSink`] is the seam between the dispatch loop and the transport.
//! The production [`SseSink`] feeds the body of an axum `Sse` response.

use std::time::Duration;

use async_trait::async_trait;
use axum::response::sse::Event;
use tokio::sync::mpsc;

use super::frames::Frame;

/// Why a frame did not reach the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The response body has been dropped.
    #[error("stream disconnected")]
    Disconnected,

    /// The client did not accept the frame in time.
    #[error("frame write timed out after {0:?}")]
    Timeout(Duration),
}

/// Ordered, independently flushed frame writes on one open stream.
#[async_trait]
pub trait FrameSink: Send {
    /// Writes one frame.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] when the frame could not be delivered.
    async fn write(&mut self, frame: Frame) -> Result<(), SinkError>;
}

/// Sink feeding an SSE response body through a bounded channel.
#[derive(Debug)]
pub struct SseSink {
    tx: mpsc::Sender<Event>,
    timeout: Duration,
}

impl SseSink {
    /// Creates a sink and the receiver the response body drains.
    ///
    /// `buffer` frames may be pending before writes start waiting; a write
    /// that waits longer than `timeout` fails with [`SinkError::Timeout`].
    #[must_use]
    pub fn channel(buffer: usize, timeout: Duration) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx, timeout }, rx)
    }
}

#[async_trait]
impl FrameSink for SseSink {
    async fn write(&mut self, frame: Frame) -> Result<(), SinkError> {
        match tokio::time::timeout(self.timeout, self.tx.send(frame.to_sse_event())).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(SinkError::Disconnected),
            Err(_) => Err(SinkError::Timeout(self.timeout)),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording sink shared by dispatch and handler tests.

    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    /// Records every frame; optionally fails selected writes.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct RecordingSink {
        pub(crate) frames: Arc<Mutex<Vec<Frame>>>,
        /// Zero-based write indices that fail with `Disconnected`.
        pub(crate) fail_on: Vec<usize>,
        writes: Arc<Mutex<usize>>,
    }

    impl RecordingSink {
        pub(crate) fn failing_on(fail_on: Vec<usize>) -> Self {
            Self {
                fail_on,
                ..Self::default()
            }
        }

        pub(crate) fn snapshot(&self) -> Vec<Frame> {
            self.frames.lock().clone()
        }
    }

    #[async_trait]
    impl FrameSink for RecordingSink {
        async fn write(&mut self, frame: Frame) -> Result<(), SinkError> {
            let index = {
                let mut writes = self.writes.lock();
                let index = *writes;
                *writes += 1;
                index
            };
            if self.fail_on.contains(&index) {
                return Err(SinkError::Disconnected);
            }
            self.frames.lock().push(frame);
            Ok(())
        }
    }
}
