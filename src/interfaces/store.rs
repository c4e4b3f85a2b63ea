use async_trait::async_trait;

use crate::domains::todo::TodoItem;
use crate::error::Result;

/// Backing storage for to-do items. Each call maps to a single statement.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn list_items(&self) -> Result<Vec<TodoItem>>;

    async fn add_item(&self, description: &str) -> Result<()>;

    /// Fails with `NotFound` when no row has `id`.
    async fn update_item(&self, id: i32, description: &str) -> Result<()>;

    /// Fails with `NotFound` when no row has `id`.
    async fn delete_item(&self, id: i32) -> Result<()>;
}
