//! Type-safe browser session identifier.
//!
//! [`SessionId`] wraps the opaque value of the `session` cookie. The push
//! core never interprets it; it is only the key of the
//! [`super::SessionRegistry`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the cookie carrying the session identifier.
pub const SESSION_COOKIE: &str = "session";

/// Opaque identifier naming one browser session.
///
/// Supplied by the session cookie. Two streams opened with the same
/// identifier replace each other in the registry (last registration wins).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps an existing identifier, typically a cookie value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random identifier (UUID v4) for cookie issuance.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
