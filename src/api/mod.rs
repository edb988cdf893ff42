//! HTTP layer: route handlers, signal DTOs, session cookies, and router
//! composition.
//!
//! Page routes answer plain navigations with full HTML and Datastar
//! requests with `204 No Content`; view updates travel over `/endpoint`.

pub mod dto;
pub mod handlers;
pub mod render;
pub mod session;
pub mod signals;

use axum::Router;
use axum::routing::get;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::stream::handler::stream_handler;

/// OpenAPI document for the JSON endpoints.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(handlers::system::health_handler),
    components(schemas(handlers::system::HealthResponse)),
    tags((name = "System", description = "Service health"))
)]
pub struct ApiDoc;

/// Builds the complete router: pages, mutations, the live stream, and
/// system endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .merge(handlers::routes())
        .route("/endpoint", get(stream_handler));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::header::{CONTENT_TYPE, COOKIE};
    use axum::http::{Request, StatusCode};
    use futures_util::StreamExt;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::{LiveEvent, SessionId};
    use crate::persistence::MemoryTodoStore;
    use crate::stream::StreamSettings;

    fn make_state() -> AppState {
        AppState::new(
            Arc::new(MemoryTodoStore::new()),
            16,
            StreamSettings::default(),
            CancellationToken::new(),
        )
    }

    #[test]
    fn openapi_lists_health() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/health"));
    }

    #[tokio::test]
    async fn stream_without_session_redirects() {
        let Ok(request) = Request::builder().uri("/endpoint").body(Body::empty()) else {
            panic!("valid request");
        };
        let Ok(response) = build_router().with_state(make_state()).oneshot(request).await else {
            panic!("router is infallible");
        };
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn stream_delivers_frames_and_cleans_up_on_disconnect() {
        let state = make_state();
        let session = SessionId::from("s1");
        let Ok(request) = Request::builder()
            .uri("/endpoint")
            .header(COOKIE, "session=s1")
            .body(Body::empty())
        else {
            panic!("valid request");
        };
        let Ok(response) = build_router()
            .with_state(state.clone())
            .oneshot(request)
            .await
        else {
            panic!("router is infallible");
        };

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("text/event-stream")
        );
        assert!(state.live_view.registry().contains(&session));

        let Ok(event) = LiveEvent::signals_only(&serde_json::json!({"x": 1})) else {
            panic!("serializable signals");
        };
        assert!(state.live_view.emit(&session, event).is_queued());

        let mut body = response.into_body().into_data_stream();
        let chunk = tokio::time::timeout(Duration::from_secs(1), body.next()).await;
        let Ok(Some(Ok(chunk))) = chunk else {
            panic!("expected a frame");
        };
        let text = String::from_utf8_lossy(&chunk);
        assert!(text.contains("event: datastar-patch-signals"));
        assert!(text.contains("data: signals {\"x\":1}"));

        drop(body);
        let removed = tokio::time::timeout(Duration::from_secs(1), async {
            while state.live_view.registry().contains(&session) {
                tokio::task::yield_now().await;
            }
        })
        .await;
        assert!(removed.is_ok(), "registration should be released");
    }
}
