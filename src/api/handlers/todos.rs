//! Todo handlers: list, forms, and mutations.
//!
//! Plain browser navigations receive a full HTML page. Datastar requests
//! are acknowledged with `204 No Content`; the refreshed view travels over
//! the session's live stream instead.

use axum::Router;
use axum::body::Bytes;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum_extra::extract::CookieJar;

use crate::api::dto::{EditFormSignals, FilterSignals, NewFormSignals, TodoInput};
use crate::api::render::render_view;
use crate::api::session::{Session, ensure_session, session_from_jar};
use crate::api::signals::{DatastarQuery, body_signals, is_datastar_request};
use crate::app_state::AppState;
use crate::domain::{SessionId, ShowFilter};
use crate::error::AppError;
use crate::view;

const TITLE: &str = "Todo App";

/// `GET /` — Todo list.
///
/// A hard refresh renders the full page with open todos and issues a
/// session cookie when missing. A Datastar request pushes the list
/// selected by the `show` signal.
///
/// # Errors
///
/// Returns [`AppError`] on store failure or malformed signals.
pub async fn list_todos(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<DatastarQuery>,
) -> Result<Response, AppError> {
    if !is_datastar_request(&headers) {
        let show = ShowFilter::Open;
        let todos = state.todos.list(show).await?;
        let (jar, _) = ensure_session(jar);
        let page = view::layout(TITLE, &view::todo_list(&todos, show));
        return Ok((jar, Html(page)).into_response());
    }

    let Some(session) = session_from_jar(&jar) else {
        return Ok(Redirect::to("/").into_response());
    };
    let signals: FilterSignals = query.signals()?;
    let show = ShowFilter::from_signal(signals.show.as_deref());
    Ok(push_list(&state, &session, &uri, show).await?.into_response())
}

/// `GET /todos/new` — New-todo form, pushed with cleared form signals.
pub async fn new_todo(
    State(state): State<AppState>,
    Session(session): Session,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
) -> Response {
    if !is_datastar_request(&headers) {
        return Html(view::layout(TITLE, &view::todo_new())).into_response();
    }
    render_view(
        &state.live_view,
        &session,
        &uri,
        view::todo_new(),
        Some(&NewFormSignals::default()),
    )
    .into_response()
}

/// `GET /todos/{id}/edit` — Edit form, pushed with the todo's values as
/// signals.
///
/// # Errors
///
/// Returns [`AppError::InvalidTodoId`] or [`AppError::TodoNotFound`] when
/// the todo cannot be resolved.
pub async fn edit_todo(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<String>,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, AppError> {
    let todo = state.todos.get(parse_todo_id(&id)?).await?;
    if !is_datastar_request(&headers) {
        return Ok(Html(view::layout(TITLE, &view::todo_edit(&todo))).into_response());
    }

    let signals = EditFormSignals {
        id: Some(todo.id),
        name: Some(todo.name.clone()),
        description: Some(todo.description.clone()),
    };
    Ok(render_view(
        &state.live_view,
        &session,
        &uri,
        view::todo_edit(&todo),
        Some(&signals),
    )
    .into_response())
}

/// `POST /todos` — Create a todo, clear the form, push the list.
///
/// # Errors
///
/// Returns [`AppError::InvalidRequest`] if the name is blank or the body
/// is malformed.
pub async fn create_todo(
    State(state): State<AppState>,
    Session(session): Session,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let input: TodoInput = body_signals(&body)?;
    state.todos.create(input.name, input.description).await?;

    state
        .live_view
        .emit_signals(&session, &NewFormSignals::default());
    push_list(&state, &session, &uri, ShowFilter::from_signal(input.show.as_deref())).await
}

/// `PUT /todos/{id}` — Update a todo, clear the form, push the list.
///
/// # Errors
///
/// Returns [`AppError::InvalidRequest`] if the name is blank and
/// [`AppError::TodoNotFound`] if the todo does not exist.
pub async fn update_todo(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let id = parse_todo_id(&id)?;
    let input: TodoInput = body_signals(&body)?;
    state.todos.update(id, input.name, input.description).await?;

    state
        .live_view
        .emit_signals(&session, &EditFormSignals::default());
    push_list(&state, &session, &uri, ShowFilter::from_signal(input.show.as_deref())).await
}

/// `POST /todos/{id}/completed` — Mark a todo done, push the list.
///
/// # Errors
///
/// Returns [`AppError::TodoNotFound`] if the todo does not exist.
pub async fn complete_todo(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let id = parse_todo_id(&id)?;
    let signals: FilterSignals = body_signals(&body)?;
    state.todos.complete(id).await?;
    push_list(&state, &session, &uri, ShowFilter::from_signal(signals.show.as_deref())).await
}

/// `DELETE /todos/{id}` — Delete a todo, push the list.
///
/// # Errors
///
/// Returns [`AppError::TodoNotFound`] if the todo does not exist.
pub async fn delete_todo(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<DatastarQuery>,
) -> Result<StatusCode, AppError> {
    let id = parse_todo_id(&id)?;
    let signals: FilterSignals = query.signals()?;
    state.todos.delete(id).await?;
    push_list(&state, &session, &uri, ShowFilter::from_signal(signals.show.as_deref())).await
}

/// `GET /todos/{id}` — Locations pushed after a mutation resolve back to
/// the list on reload.
pub async fn todo_location() -> Redirect {
    Redirect::to("/")
}

/// Todo routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_todos))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/new", get(new_todo))
        .route(
            "/todos/{id}",
            get(todo_location).put(update_todo).delete(delete_todo),
        )
        .route("/todos/{id}/edit", get(edit_todo))
        .route("/todos/{id}/completed", post(complete_todo))
}

/// Renders the list selected by `show` and pushes it to the session.
async fn push_list(
    state: &AppState,
    session: &SessionId,
    uri: &Uri,
    show: ShowFilter,
) -> Result<StatusCode, AppError> {
    let todos = state.todos.list(show).await?;
    Ok(render_view::<()>(
        &state.live_view,
        session,
        uri,
        view::todo_list(&todos, show),
        None,
    ))
}

fn parse_todo_id(raw: &str) -> Result<i32, AppError> {
    raw.parse()
        .map_err(|_| AppError::InvalidTodoId(raw.to_string()))
}
