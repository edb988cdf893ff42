//! Todo records and list filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    /// Store-generated identifier.
    pub id: i32,
    /// Short title; never empty.
    pub name: String,
    /// Free-form details.
    pub description: String,
    /// Whether the todo has been completed.
    pub done: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last edit.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp, set once the todo is marked done.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Fields supplied when creating a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    /// Short title; never empty.
    pub name: String,
    /// Free-form details.
    pub description: String,
}

/// Store-level list filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoFilter {
    /// `Some(flag)` keeps only todos whose `done` equals `flag`.
    pub done: Option<bool>,
}

impl TodoFilter {
    /// Returns `true` if `todo` passes the filter.
    #[must_use]
    pub fn matches(&self, todo: &Todo) -> bool {
        self.done.is_none_or(|done| todo.done == done)
    }
}

/// Value of the client-side `show` signal selecting which todos to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowFilter {
    /// Every todo.
    All,
    /// Completed todos only.
    Done,
    /// Open todos only (the default for a fresh page load).
    #[default]
    Open,
}

impl ShowFilter {
    /// Parses a `show` signal value; unknown values fall back to
    /// [`ShowFilter::All`].
    #[must_use]
    pub fn from_signal(value: Option<&str>) -> Self {
        match value {
            Some("done") => Self::Done,
            Some("open") => Self::Open,
            _ => Self::All,
        }
    }

    /// Signal value for this filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Done => "done",
            Self::Open => "open",
        }
    }
}

impl From<ShowFilter> for TodoFilter {
    fn from(show: ShowFilter) -> Self {
        match show {
            ShowFilter::All => Self { done: None },
            ShowFilter::Done => Self { done: Some(true) },
            ShowFilter::Open => Self { done: Some(false) },
        }
    }
}
