//! `GET /endpoint`: opens the live stream of a session.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::Stream;

use super::dispatch::spawn_dispatch;
use super::sink::SseSink;
use crate::api::session::Session;
use crate::app_state::AppState;

/// Frames buffered between the dispatch loop and the response body.
const FRAME_BUFFER: usize = 32;

/// `GET /endpoint` — Server-sent event stream of live-view updates.
///
/// Registers the session's mailbox, spawns its dispatch loop, and returns
/// the response body fed by that loop. Dropping the body (client
/// disconnect) cancels the loop.
pub async fn stream_handler(
    State(state): State<AppState>,
    Session(session): Session,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!(%session, "opening live stream");

    let registration = state.live_view.open_stream(session);
    let disconnect = registration.cancel.clone().drop_guard();
    let (sink, mut frames) = SseSink::channel(FRAME_BUFFER, state.stream.frame_write_timeout);
    spawn_dispatch(
        Arc::clone(state.live_view.registry()),
        registration,
        sink,
    );

    let body = async_stream::stream! {
        let _disconnect = disconnect;
        while let Some(event) = frames.recv().await {
            yield Ok(event);
        }
    };

    Sse::new(body).keep_alive(KeepAlive::new().interval(state.stream.keep_alive))
}
