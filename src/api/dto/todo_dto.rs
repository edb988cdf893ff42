//! Signal payloads exchanged with the todo views.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Signals selecting which todos the list shows.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FilterSignals {
    /// `"all"`, `"done"` or `"open"`; anything else shows all.
    #[serde(default)]
    pub show: Option<String>,
}

/// Form signals submitted when creating or updating a todo.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TodoInput {
    /// Todo title; must not be blank.
    #[serde(default)]
    pub name: String,
    /// Free-form details.
    #[serde(default)]
    pub description: String,
    /// Current list filter, reused when the list is re-rendered.
    #[serde(default)]
    pub show: Option<String>,
}

/// Signals of the new-todo form. The default value clears the form.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct NewFormSignals {
    /// Bound to the name input.
    pub name: Option<String>,
    /// Bound to the description input.
    pub description: Option<String>,
}

/// Signals of the edit form. The default value clears the form.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct EditFormSignals {
    /// ID of the todo being edited.
    pub id: Option<i32>,
    /// Bound to the name input.
    pub name: Option<String>,
    /// Bound to the description input.
    pub description: Option<String>,
}
