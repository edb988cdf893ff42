//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::SessionRegistry;
use crate::persistence::TodoStore;
use crate::service::{LiveViewService, TodoService};
use crate::stream::StreamSettings;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Todo service for reads and mutations.
    pub todos: Arc<TodoService>,
    /// Live-view emission and stream registration.
    pub live_view: LiveViewService,
    /// Timing settings for open streams.
    pub stream: StreamSettings,
}

impl AppState {
    /// Wires the services around `store`.
    ///
    /// Exactly one [`SessionRegistry`] is created here and shared by the
    /// stream endpoint and every mutation handler. Streams close when
    /// `shutdown` is cancelled.
    #[must_use]
    pub fn new(
        store: Arc<dyn TodoStore>,
        mailbox_capacity: usize,
        stream: StreamSettings,
        shutdown: CancellationToken,
    ) -> Self {
        let registry = Arc::new(SessionRegistry::new(mailbox_capacity));
        Self {
            todos: Arc::new(TodoService::new(store)),
            live_view: LiveViewService::new(registry, shutdown),
            stream,
        }
    }
}
