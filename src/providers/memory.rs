use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domains::todo::TodoItem;
use crate::error::{Result, TodoServiceError};
use crate::interfaces::store::TodoStore;

#[derive(Default)]
struct Table {
    rows: BTreeMap<i32, String>,
    last_id: i32,
}

/// Process-local store. IDs auto-increment from 1 and are never reused.
#[derive(Default)]
pub struct InMemoryTodoStore {
    table: RwLock<Table>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn list_items(&self) -> Result<Vec<TodoItem>> {
        let guard = self.table.read().await;
        Ok(guard
            .rows
            .iter()
            .map(|(id, description)| TodoItem {
                id: *id,
                item_description: description.clone(),
            })
            .collect())
    }

    async fn add_item(&self, description: &str) -> Result<()> {
        let mut guard = self.table.write().await;
        let id = guard
            .last_id
            .checked_add(1)
            .ok_or_else(|| TodoServiceError::Store("ID space exhausted".to_string()))?;
        guard.last_id = id;
        guard.rows.insert(id, description.to_string());
        Ok(())
    }

    async fn update_item(&self, id: i32, description: &str) -> Result<()> {
        let mut guard = self.table.write().await;
        match guard.rows.get_mut(&id) {
            Some(existing) => {
                *existing = description.to_string();
                Ok(())
            }
            None => Err(TodoServiceError::NotFound(id)),
        }
    }

    async fn delete_item(&self, id: i32) -> Result<()> {
        let mut guard = self.table.write().await;
        guard
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(TodoServiceError::NotFound(id))
    }
}
