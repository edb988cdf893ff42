//! Reading Datastar requests and the signals they carry.
//!
//! Datastar sends the client's signals as a JSON object: in the
//! `datastar` query parameter for `GET` and `DELETE`, in the request body
//! otherwise.

use axum::http::HeaderMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Header set by the Datastar client on every request it issues.
pub const DATASTAR_REQUEST_HEADER: &str = "datastar-request";

/// Query parameter carrying signals on `GET` and `DELETE` requests.
pub const DATASTAR_QUERY_PARAM: &str = "datastar";

/// Returns `true` if the request was issued by the Datastar client rather
/// than by a plain browser navigation.
#[must_use]
pub fn is_datastar_request(headers: &HeaderMap) -> bool {
    headers
        .get(DATASTAR_REQUEST_HEADER)
        .and_then(|value| value.to_str().ok())
        == Some("true")
}

/// Query string of a Datastar `GET`/`DELETE` request.
#[derive(Debug, Default, Deserialize)]
pub struct DatastarQuery {
    /// JSON-encoded signals.
    pub datastar: Option<String>,
}

impl DatastarQuery {
    /// Decodes the signals; a missing parameter yields `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] if the parameter is not valid
    /// JSON for `T`.
    pub fn signals<T: DeserializeOwned + Default>(&self) -> Result<T, AppError> {
        body_signals(self.datastar.as_deref().unwrap_or_default().as_bytes())
    }
}

/// Decodes signals sent as a request body; an empty body yields
/// `T::default()`.
///
/// # Errors
///
/// Returns [`AppError::InvalidRequest`] if the body is not valid JSON for
/// `T`.
pub fn body_signals<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|error| AppError::InvalidRequest(format!("malformed signals: {error}")))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::api::dto::{FilterSignals, TodoInput};

    #[test]
    fn detects_datastar_header() {
        let mut headers = HeaderMap::new();
        assert!(!is_datastar_request(&headers));
        if let Ok(value) = "true".parse() {
            headers.insert(DATASTAR_REQUEST_HEADER, value);
        }
        assert!(is_datastar_request(&headers));
    }

    #[test]
    fn missing_query_signals_default() {
        let query = DatastarQuery::default();
        let signals: Result<FilterSignals, _> = query.signals();
        assert!(matches!(signals, Ok(FilterSignals { show: None })));
    }

    #[test]
    fn query_signals_decode() {
        let query = DatastarQuery {
            datastar: Some(r#"{"show":"done","other":1}"#.to_string()),
        };
        let signals: Result<FilterSignals, _> = query.signals();
        assert_eq!(signals.ok().and_then(|s| s.show).as_deref(), Some("done"));
    }

    #[test]
    fn body_signals_decode_form() {
        let input: Result<TodoInput, _> = body_signals(br#"{"name":"milk","description":"2l"}"#);
        let Ok(input) = input else {
            panic!("expected valid input");
        };
        assert_eq!(input.name, "milk");
        assert_eq!(input.description, "2l");
    }

    #[test]
    fn malformed_body_is_invalid_request() {
        let input: Result<TodoInput, _> = body_signals(b"{not json");
        assert!(matches!(input, Err(AppError::InvalidRequest(_))));
    }
}
