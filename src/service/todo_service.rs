//! Todo service: validates input and orchestrates store mutations.

use std::sync::Arc;

use crate::domain::{NewTodo, ShowFilter, Todo};
use crate::error::AppError;
use crate::persistence::TodoStore;

/// Orchestration layer for todo reads and mutations.
///
/// Stateless coordinator over a [`TodoStore`]. Rendering and live-view
/// emission happen in the handlers after a mutation succeeds.
#[derive(Debug, Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    /// Creates a new `TodoService`.
    #[must_use]
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Lists todos selected by `show`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage failure.
    pub async fn list(&self, show: ShowFilter) -> Result<Vec<Todo>, AppError> {
        self.store.list(show.into()).await
    }

    /// Fetches one todo.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TodoNotFound`] if the todo does not exist.
    pub async fn get(&self, id: i32) -> Result<Todo, AppError> {
        self.store.get_by_id(id).await
    }

    /// Creates a todo.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] if `name` is blank.
    pub async fn create(&self, name: String, description: String) -> Result<Todo, AppError> {
        let name = validate_name(name)?;
        let todo = self.store.insert(NewTodo { name, description }).await?;
        tracing::info!(id = todo.id, "todo created");
        Ok(todo)
    }

    /// Replaces the name and description of a todo.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] if `name` is blank and
    /// [`AppError::TodoNotFound`] if the todo does not exist.
    pub async fn update(
        &self,
        id: i32,
        name: String,
        description: String,
    ) -> Result<Todo, AppError> {
        let name = validate_name(name)?;
        let mut todo = self.store.get_by_id(id).await?;
        todo.name = name;
        todo.description = description;
        let todo = self.store.update(&todo).await?;
        tracing::info!(id, "todo updated");
        Ok(todo)
    }

    /// Marks a todo as done.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TodoNotFound`] if the todo does not exist.
    pub async fn complete(&self, id: i32) -> Result<(), AppError> {
        self.store.set_completed(id).await?;
        tracing::info!(id, "todo completed");
        Ok(())
    }

    /// Deletes a todo.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TodoNotFound`] if the todo does not exist.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.store.delete(id).await?;
        tracing::info!(id, "todo deleted");
        Ok(())
    }
}

fn validate_name(name: String) -> Result<String, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidRequest("name is required".to_string()));
    }
    Ok(name)
}
