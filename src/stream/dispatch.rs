//! Per-stream dispatch loop.
//!
//! One loop runs for every open stream. It waits concurrently on the
//! stream's cancellation token and on its mailbox, and turns each
//! [`LiveEvent`] into an ordered sequence of [`Frame`] writes. Frame write
//! failures are logged and never end the loop; only cancellation (client
//! disconnect, replacement by a newer stream, or shutdown) does.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::frames::Frame;
use super::sink::FrameSink;
use crate::domain::{LiveEvent, Mailbox, Registration, SessionId, SessionRegistry};

/// Tears a stream down when the loop exits, whatever the exit path.
///
/// Releases the registry entry (only if it still belongs to this mailbox)
/// and closes the mailbox, discarding undelivered events.
#[derive(Debug)]
struct StreamGuard {
    registry: Arc<SessionRegistry>,
    session: SessionId,
    mailbox: Mailbox,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        let released = self.registry.release(&self.session, self.mailbox.id());
        let discarded = self.mailbox.close();
        tracing::info!(
            session = %self.session,
            mailbox = %self.mailbox.id(),
            released,
            discarded,
            "live stream closed"
        );
    }
}

/// Spawns [`run_dispatch`] on the runtime.
pub fn spawn_dispatch<S>(
    registry: Arc<SessionRegistry>,
    registration: Registration,
    sink: S,
) -> JoinHandle<()>
where
    S: FrameSink + 'static,
{
    tokio::spawn(run_dispatch(registry, registration, sink))
}

/// Serves one open stream until its cancellation token fires.
///
/// Events are written in mailbox order. A
/// [`LiveEvent::ViewReplacement`] is written as element patch, URL
/// replacement, then signals patch, with no other event's frames in
/// between.
pub async fn run_dispatch<S>(registry: Arc<SessionRegistry>, registration: Registration, mut sink: S)
where
    S: FrameSink,
{
    let Registration {
        session,
        mailbox,
        cancel,
    } = registration;
    let mut guard = StreamGuard {
        registry,
        session,
        mailbox,
    };
    tracing::info!(session = %guard.session, mailbox = %guard.mailbox.id(), "live stream opened");

    loop {
        let event = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = guard.mailbox.recv() => event,
        };
        let Some(event) = event else {
            // Every sender is gone; nothing can reach this stream anymore.
            break;
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = deliver(&guard.session, &mut sink, event) => {}
        }
    }
}

/// Writes the frames of one event in protocol order.
async fn deliver<S>(session: &SessionId, sink: &mut S, event: LiveEvent)
where
    S: FrameSink + ?Sized,
{
    tracing::debug!(%session, kind = event.kind(), "dispatching live event");
    match event {
        LiveEvent::SignalsOnly { signals } => write_signals(session, sink, &signals).await,
        LiveEvent::ViewReplacement {
            content,
            location,
            signals,
        } => {
            write_frame(session, sink, Frame::patch_elements(content)).await;
            write_frame(session, sink, Frame::replace_url(location)).await;
            if let Some(signals) = signals {
                write_signals(session, sink, &signals).await;
            }
        }
    }
}

async fn write_signals<S>(session: &SessionId, sink: &mut S, signals: &serde_json::Value)
where
    S: FrameSink + ?Sized,
{
    if signals.is_null() {
        return;
    }
    match Frame::patch_signals(signals) {
        Ok(frame) => write_frame(session, sink, frame).await,
        Err(error) => {
            tracing::error!(%session, %error, "failed to marshal signals");
        }
    }
}

async fn write_frame<S>(session: &SessionId, sink: &mut S, frame: Frame)
where
    S: FrameSink + ?Sized,
{
    let event_name = frame.event_name();
    if let Err(error) = sink.write(frame).await {
        tracing::warn!(%session, event = event_name, %error, "failed to write frame");
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::domain::HandOff;
    use crate::stream::sink::testing::RecordingSink;

    async fn wait_for_frames(sink: &RecordingSink, count: usize) -> Vec<Frame> {
        let waited = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let frames = sink.snapshot();
                if frames.len() >= count {
                    return frames;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        let Ok(frames) = waited else {
            panic!("timed out waiting for {count} frames");
        };
        frames
    }

    fn signals_frame(value: serde_json::Value) -> Frame {
        let Ok(frame) = Frame::patch_signals(&value) else {
            panic!("serializable signals");
        };
        frame
    }

    #[tokio::test]
    async fn frames_follow_enqueue_order() {
        let registry = Arc::new(SessionRegistry::new(16));
        let root = CancellationToken::new();
        let session = SessionId::from("s1");
        let registration = registry.register(session.clone(), &root);
        let cancel = registration.cancel.clone();
        let sink = RecordingSink::default();
        let handle = spawn_dispatch(Arc::clone(&registry), registration, sink.clone());

        let first = registry.hand_off(
            &session,
            LiveEvent::SignalsOnly {
                signals: json!({"x": 1}),
            },
        );
        let second = registry.hand_off(
            &session,
            LiveEvent::ViewReplacement {
                content: "<div>A</div>".to_string(),
                location: "/todos".to_string(),
                signals: Some(json!({"x": 2})),
            },
        );
        assert_eq!((first, second), (HandOff::Queued, HandOff::Queued));

        let frames = wait_for_frames(&sink, 4).await;
        assert_eq!(
            frames,
            vec![
                signals_frame(json!({"x": 1})),
                Frame::patch_elements("<div>A</div>"),
                Frame::replace_url("/todos"),
                signals_frame(json!({"x": 2})),
            ]
        );

        cancel.cancel();
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn view_without_signals_writes_two_frames() {
        let registry = Arc::new(SessionRegistry::new(16));
        let root = CancellationToken::new();
        let session = SessionId::from("s1");
        let registration = registry.register(session.clone(), &root);
        let sink = RecordingSink::default();
        let handle = spawn_dispatch(Arc::clone(&registry), registration, sink.clone());

        let _ = registry.hand_off(
            &session,
            LiveEvent::ViewReplacement {
                content: "<ul></ul>".to_string(),
                location: "/".to_string(),
                signals: None,
            },
        );
        let _ = registry.hand_off(
            &session,
            LiveEvent::SignalsOnly {
                signals: serde_json::Value::Null,
            },
        );
        let _ = registry.hand_off(
            &session,
            LiveEvent::SignalsOnly {
                signals: json!({"done": true}),
            },
        );

        let frames = wait_for_frames(&sink, 3).await;
        assert_eq!(
            frames,
            vec![
                Frame::patch_elements("<ul></ul>"),
                Frame::replace_url("/"),
                signals_frame(json!({"done": true})),
            ]
        );

        root.cancel();
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn cancellation_removes_registry_entry() {
        let registry = Arc::new(SessionRegistry::new(16));
        let root = CancellationToken::new();
        let session = SessionId::from("s1");
        let registration = registry.register(session.clone(), &root);
        let cancel = registration.cancel.clone();
        let handle = spawn_dispatch(
            Arc::clone(&registry),
            registration,
            RecordingSink::default(),
        );

        cancel.cancel();
        let joined = tokio::time::timeout(Duration::from_secs(2), handle).await;
        assert!(matches!(joined, Ok(Ok(()))));
        assert!(!registry.contains(&session));
        assert_eq!(
            registry.hand_off(
                &session,
                LiveEvent::SignalsOnly {
                    signals: json!({})
                }
            ),
            HandOff::NoStream
        );
    }

    #[tokio::test]
    async fn write_failure_keeps_loop_running() {
        let registry = Arc::new(SessionRegistry::new(16));
        let root = CancellationToken::new();
        let session = SessionId::from("s1");
        let registration = registry.register(session.clone(), &root);
        let sink = RecordingSink::failing_on(vec![0]);
        let handle = spawn_dispatch(Arc::clone(&registry), registration, sink.clone());

        for x in 1..=2 {
            let _ = registry.hand_off(
                &session,
                LiveEvent::SignalsOnly {
                    signals: json!({ "x": x }),
                },
            );
        }

        let frames = wait_for_frames(&sink, 1).await;
        assert_eq!(frames, vec![signals_frame(json!({"x": 2}))]);
        assert!(registry.contains(&session));

        root.cancel();
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn reconnect_cancels_previous_loop_only() {
        let registry = Arc::new(SessionRegistry::new(16));
        let root = CancellationToken::new();
        let session = SessionId::from("s1");

        let old_sink = RecordingSink::default();
        let old = spawn_dispatch(
            Arc::clone(&registry),
            registry.register(session.clone(), &root),
            old_sink.clone(),
        );
        let new_sink = RecordingSink::default();
        let new = spawn_dispatch(
            Arc::clone(&registry),
            registry.register(session.clone(), &root),
            new_sink.clone(),
        );

        let joined = tokio::time::timeout(Duration::from_secs(2), old).await;
        assert!(matches!(joined, Ok(Ok(()))));
        assert!(registry.contains(&session));

        let _ = registry.hand_off(
            &session,
            LiveEvent::SignalsOnly {
                signals: json!({"to": "new"}),
            },
        );
        let frames = wait_for_frames(&new_sink, 1).await;
        assert_eq!(frames, vec![signals_frame(json!({"to": "new"}))]);
        assert!(old_sink.snapshot().is_empty());

        root.cancel();
        assert!(new.await.is_ok());
        assert!(registry.is_empty());
    }
}
