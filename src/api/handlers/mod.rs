//! HTTP endpoint handlers organized by resource.

pub mod system;
pub mod todos;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(todos::routes())
        .merge(system::routes())
}
