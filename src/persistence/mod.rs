//! Persistence layer: the todo store.
//!
//! [`TodoStore`] is the request/response data-access boundary used by the
//! mutation handlers. [`postgres::PgTodoStore`] is the production
//! implementation backed by `sqlx::PgPool`; [`memory::MemoryTodoStore`]
//! keeps everything in process and backs tests and persistence-less runs.

pub mod memory;
pub mod postgres;

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::{NewTodo, Todo, TodoFilter};
use crate::error::AppError;

pub use memory::MemoryTodoStore;
pub use postgres::PgTodoStore;

/// Storage of todo records.
#[async_trait]
pub trait TodoStore: Debug + Send + Sync {
    /// Lists todos matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage failure.
    async fn list(&self, filter: TodoFilter) -> Result<Vec<Todo>, AppError>;

    /// Inserts a todo and returns it with its generated fields.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage failure.
    async fn insert(&self, todo: NewTodo) -> Result<Todo, AppError>;

    /// Fetches one todo.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TodoNotFound`] if no todo has the given ID.
    async fn get_by_id(&self, id: i32) -> Result<Todo, AppError>;

    /// Saves the name and description of `todo`, returning the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TodoNotFound`] if the todo no longer exists.
    async fn update(&self, todo: &Todo) -> Result<Todo, AppError>;

    /// Marks a todo as done.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TodoNotFound`] if no todo has the given ID.
    async fn set_completed(&self, id: i32) -> Result<(), AppError>;

    /// Deletes a todo.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TodoNotFound`] if no todo has the given ID.
    async fn delete(&self, id: i32) -> Result<(), AppError>;
}
