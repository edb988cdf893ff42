//! todo-live server entry point.
//!
//! Starts the Axum HTTP server with the page routes and the live stream
//! endpoint.

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use todo_live::api;
use todo_live::app_state::AppState;
use todo_live::config::{AppConfig, LogFormat};
use todo_live::persistence::{MemoryTodoStore, PgTodoStore, TodoStore};
use todo_live::stream::StreamSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting todo-live");

    // Build persistence layer
    let store: Arc<dyn TodoStore> = if config.persistence_enabled {
        let store = PgTodoStore::connect(&config)
            .await
            .context("connecting to postgres")?;
        Arc::new(store)
    } else {
        tracing::warn!("persistence disabled, todos are kept in memory");
        Arc::new(MemoryTodoStore::new())
    };

    // Build application state
    let shutdown = CancellationToken::new();
    let app_state = AppState::new(
        store,
        config.mailbox_capacity,
        StreamSettings::from(&config),
        shutdown.clone(),
    );

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM and cancels `shutdown`, which closes every
/// open live stream so the server can drain.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, closing live streams");
    shutdown.cancel();
}
