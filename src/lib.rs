//! # todo-live
//!
//! Todo application whose views are pushed to the browser over a
//! per-session server-sent-event stream speaking the Datastar protocol.
//!
//! Every browser session holds one open stream at `/endpoint`. Mutation
//! handlers never return markup: they render the refreshed view, hand it
//! to the session's mailbox, and answer `204 No Content`. A dispatch loop
//! per stream turns mailbox events into Datastar frames.
//!
//! ## Architecture
//!
//! ```text
//! Browser (Datastar)
//!     │
//!     ├── Page + mutation handlers (api/)      GET /endpoint (stream/)
//!     │         │                                   │
//!     │   TodoService ── TodoStore             dispatch loop ── SseSink
//!     │         │      (persistence/)               ▲
//!     │   LiveViewService (service/)                │
//!     │         │                                   │
//!     └────► SessionRegistry ── Mailbox ────────────┘
//!                 (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod stream;
pub mod view;
