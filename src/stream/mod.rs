//! Live stream layer: frames, sinks, the dispatch loop, and the
//! stream-open handler.
//!
//! The endpoint at `/endpoint` keeps one server-sent-event stream open per
//! browser session and writes every [`crate::domain::LiveEvent`] handed to
//! that session's mailbox as Datastar protocol frames.

pub mod dispatch;
pub mod frames;
pub mod handler;
pub mod sink;

use std::time::Duration;

use crate::config::AppConfig;

/// Timing settings shared by all streams.
#[derive(Debug, Clone, Copy)]
pub struct StreamSettings {
    /// Longest wait for a stalled client to accept one frame.
    pub frame_write_timeout: Duration,
    /// Interval between SSE keep-alive comments.
    pub keep_alive: Duration,
}

impl From<&AppConfig> for StreamSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            frame_write_timeout: config.frame_write_timeout(),
            keep_alive: config.sse_keep_alive(),
        }
    }
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            frame_write_timeout: Duration::from_secs(5),
            keep_alive: Duration::from_secs(15),
        }
    }
}
