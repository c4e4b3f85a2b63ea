use std::sync::Arc;

use diesel::prelude::*;

use crate::config::{BackendConfig, Config};
use crate::domains::todo::TodoItem;
use crate::error::Result;
use crate::interfaces::store::TodoStore;

pub mod memory;
pub mod mysql;
pub mod schema;
pub mod sqlite;

pub use memory::InMemoryTodoStore;
pub use mysql::MysqlTodoStore;
pub use sqlite::SqliteTodoStore;

#[derive(Queryable, Selectable)]
#[diesel(table_name = schema::todo_items)]
struct TodoRow {
    id: i32,
    item_description: String,
}

fn map_row(row: TodoRow) -> TodoItem {
    TodoItem {
        id: row.id,
        item_description: row.item_description,
    }
}

/// Opens the store selected by `config.backend`.
pub async fn open_store(config: &Config) -> Result<Arc<dyn TodoStore>> {
    let store: Arc<dyn TodoStore> = match &config.backend {
        BackendConfig::Mysql(database) => Arc::new(MysqlTodoStore::new(database, config.pool)),
        BackendConfig::Sqlite { path } => Arc::new(SqliteTodoStore::new(path, config.pool).await?),
        BackendConfig::Memory => Arc::new(InMemoryTodoStore::new()),
    };
    Ok(store)
}
