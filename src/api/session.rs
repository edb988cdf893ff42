//! Session cookie extraction and issuance.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::domain::{SESSION_COOKIE, SessionId};

/// Extractor for the caller's session.
///
/// Requests without a `session` cookie are redirected to `/` with
/// `303 See Other`, where a session is issued.
#[derive(Debug, Clone)]
pub struct Session(pub SessionId);

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        session_from_jar(&jar)
            .map(Self)
            .ok_or_else(|| Redirect::to("/"))
    }
}

/// Reads the session identifier from `jar`, ignoring empty values.
#[must_use]
pub fn session_from_jar(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .map(Cookie::value)
        .filter(|value| !value.is_empty())
        .map(SessionId::from)
}

/// Returns the session in `jar`, issuing a new session cookie if there is
/// none.
#[must_use]
pub fn ensure_session(jar: CookieJar) -> (CookieJar, SessionId) {
    if let Some(session) = session_from_jar(&jar) {
        return (jar, session);
    }
    let session = SessionId::generate();
    let cookie = Cookie::build((SESSION_COOKIE, session.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    tracing::debug!(%session, "issued session cookie");
    (jar.add(cookie), session)
}
