//! PostgreSQL implementation of the todo store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::TodoStore;
use crate::config::AppConfig;
use crate::domain::{NewTodo, Todo, TodoFilter};
use crate::error::AppError;

const TODO_COLUMNS: &str = "id, name, description, done, created_at, updated_at, completed_at";

type TodoRow = (
    i32,
    String,
    String,
    bool,
    DateTime<Utc>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

fn from_row(
    (id, name, description, done, created_at, updated_at, completed_at): TodoRow,
) -> Todo {
    Todo {
        id,
        name,
        description,
        done,
        created_at,
        updated_at,
        completed_at,
    }
}

/// PostgreSQL-backed todo store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using the database settings of `config` and applies the
    /// embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the database is unreachable and
    /// [`AppError::Migration`] if a migration fails.
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn list(&self, filter: TodoFilter) -> Result<Vec<Todo>, AppError> {
        let rows = sqlx::query_as::<_, TodoRow>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos \
             WHERE done = COALESCE($1, done) ORDER BY created_at, id"
        ))
        .bind(filter.done)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, AppError> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            "INSERT INTO todos (name, description) VALUES ($1, $2) RETURNING {TODO_COLUMNS}"
        ))
        .bind(todo.name)
        .bind(todo.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(from_row(row))
    }

    async fn get_by_id(&self, id: i32) -> Result<Todo, AppError> {
        sqlx::query_as::<_, TodoRow>(&format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(from_row)
            .ok_or(AppError::TodoNotFound(id))
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, AppError> {
        sqlx::query_as::<_, TodoRow>(&format!(
            "UPDATE todos SET name = $1, description = $2, updated_at = NOW() \
             WHERE id = $3 RETURNING {TODO_COLUMNS}"
        ))
        .bind(&todo.name)
        .bind(&todo.description)
        .bind(todo.id)
        .fetch_optional(&self.pool)
        .await?
        .map(from_row)
        .ok_or(AppError::TodoNotFound(todo.id))
    }

    async fn set_completed(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE todos SET done = TRUE, completed_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::TodoNotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::TodoNotFound(id));
        }
        Ok(())
    }
}
