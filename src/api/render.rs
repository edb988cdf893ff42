//! Glue between mutation handlers and the live-view push core.

use axum::http::{StatusCode, Uri};
use serde::Serialize;

use super::signals::DATASTAR_QUERY_PARAM;
use crate::domain::SessionId;
use crate::service::LiveViewService;

/// Canonical location of a request: its path and query without the
/// `datastar` transport parameter. Remaining parameters keep their order.
#[must_use]
pub fn canonical_location(uri: &Uri) -> String {
    let params: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(DATASTAR_QUERY_PARAM))
        .collect();

    if params.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), params.join("&"))
    }
}

/// Pushes `fragment` to the session's open stream and acknowledges the
/// request with `204 No Content`.
///
/// The browser receives the update through its stream only; the response
/// itself never carries markup.
pub fn render_view<T: Serialize + ?Sized>(
    live: &LiveViewService,
    session: &SessionId,
    uri: &Uri,
    fragment: String,
    signals: Option<&T>,
) -> StatusCode {
    let location = canonical_location(uri);
    tracing::debug!(%session, %location, "pushing view");
    live.replace_view(session, fragment, location, signals);
    StatusCode::NO_CONTENT
}
