//! In-process todo store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::TodoStore;
use crate::domain::{NewTodo, Todo, TodoFilter};
use crate::error::AppError;

#[derive(Debug, Default)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, Todo>,
}

/// Todo store kept in memory; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    table: RwLock<Table>,
}

impl MemoryTodoStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list(&self, filter: TodoFilter) -> Result<Vec<Todo>, AppError> {
        let table = self.table.read().await;
        let mut todos: Vec<Todo> = table
            .rows
            .values()
            .filter(|todo| filter.matches(todo))
            .cloned()
            .collect();
        todos.sort_by_key(|todo| (todo.created_at, todo.id));
        Ok(todos)
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, AppError> {
        let mut table = self.table.write().await;
        table.next_id = table
            .next_id
            .checked_add(1)
            .ok_or_else(|| AppError::Internal("todo id space exhausted".to_string()))?;
        let now = Utc::now();
        let stored = Todo {
            id: table.next_id,
            name: todo.name,
            description: todo.description,
            done: false,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: i32) -> Result<Todo, AppError> {
        self.table
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(AppError::TodoNotFound(id))
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, AppError> {
        let mut table = self.table.write().await;
        let stored = table
            .rows
            .get_mut(&todo.id)
            .ok_or(AppError::TodoNotFound(todo.id))?;
        stored.name.clone_from(&todo.name);
        stored.description.clone_from(&todo.description);
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn set_completed(&self, id: i32) -> Result<(), AppError> {
        let mut table = self.table.write().await;
        let stored = table.rows.get_mut(&id).ok_or(AppError::TodoNotFound(id))?;
        stored.done = true;
        stored.completed_at = Some(Utc::now());
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.table
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::TodoNotFound(id))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn new_todo(name: &str) -> NewTodo {
        NewTodo {
            name: name.to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = MemoryTodoStore::new();
        let Ok(a) = store.insert(new_todo("a")).await else {
            panic!("insert failed");
        };
        let Ok(b) = store.insert(new_todo("b")).await else {
            panic!("insert failed");
        };
        assert!(b.id > a.id);
        assert!(!a.done);
    }

    #[tokio::test]
    async fn list_applies_filter() {
        let store = MemoryTodoStore::new();
        let Ok(a) = store.insert(new_todo("a")).await else {
            panic!("insert failed");
        };
        let _ = store.insert(new_todo("b")).await;
        assert!(store.set_completed(a.id).await.is_ok());

        let done = store.list(TodoFilter { done: Some(true) }).await;
        let open = store.list(TodoFilter { done: Some(false) }).await;
        let all = store.list(TodoFilter::default()).await;
        assert_eq!(done.map(|t| t.len()).ok(), Some(1));
        assert_eq!(open.map(|t| t.len()).ok(), Some(1));
        assert_eq!(all.map(|t| t.len()).ok(), Some(2));
    }

    #[tokio::test]
    async fn update_changes_text_only() {
        let store = MemoryTodoStore::new();
        let Ok(mut todo) = store.insert(new_todo("a")).await else {
            panic!("insert failed");
        };
        todo.name = "renamed".to_string();
        todo.done = true;
        let Ok(stored) = store.update(&todo).await else {
            panic!("update failed");
        };
        assert_eq!(stored.name, "renamed");
        assert!(!stored.done);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = MemoryTodoStore::new();
        assert!(matches!(
            store.get_by_id(9).await,
            Err(AppError::TodoNotFound(9))
        ));
        assert!(matches!(
            store.set_completed(9).await,
            Err(AppError::TodoNotFound(9))
        ));
        assert!(matches!(store.delete(9).await, Err(AppError::TodoNotFound(9))));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let store = MemoryTodoStore::new();
        let Ok(todo) = store.insert(new_todo("a")).await else {
            panic!("insert failed");
        };
        assert!(store.delete(todo.id).await.is_ok());
        assert!(store.get_by_id(todo.id).await.is_err());
    }
}
