use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AsyncMysqlConnection, RunQueryDsl};

use crate::config::{DatabaseConfig, PoolConfig};
use crate::domains::todo::TodoItem;
use crate::error::{Result, TodoServiceError};
use crate::interfaces::store::TodoStore;
use crate::providers::schema::todo_items;
use crate::providers::{map_row, TodoRow};

type MysqlPool = Pool<AsyncMysqlConnection>;
type MysqlPooledConn<'a> = PooledConnection<'a, AsyncMysqlConnection>;

/// Store over an existing MySQL `todoItems` table.
///
/// The pool opens connections on demand, so construction never touches the
/// server. Once `max_size` connections are checked out, callers wait up to the
/// configured timeout for one to be returned.
pub struct MysqlTodoStore {
    pool: MysqlPool,
}

impl MysqlTodoStore {
    pub fn new(database: &DatabaseConfig, pool_config: PoolConfig) -> Self {
        let manager = AsyncDieselConnectionManager::<AsyncMysqlConnection>::new(database.url());
        let pool = Pool::builder()
            .max_size(pool_config.max_size)
            .connection_timeout(pool_config.connection_timeout())
            .build_unchecked(manager);
        tracing::info!(
            host = %database.host,
            database = %database.name,
            max_size = pool_config.max_size,
            "configured mysql pool"
        );
        Self { pool }
    }

    async fn conn(&self) -> Result<MysqlPooledConn<'_>> {
        self.pool
            .get()
            .await
            .map_err(|e| TodoServiceError::Store(e.to_string()))
    }
}

#[async_trait]
impl TodoStore for MysqlTodoStore {
    async fn list_items(&self) -> Result<Vec<TodoItem>> {
        let mut conn = self.conn().await?;
        let rows: Vec<TodoRow> = todo_items::table
            .select(TodoRow::as_select())
            .order(todo_items::id.asc())
            .load(&mut conn)
            .await
            .map_err(|e| TodoServiceError::Store(e.to_string()))?;
        Ok(rows.into_iter().map(map_row).collect())
    }

    async fn add_item(&self, description: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        diesel::insert_into(todo_items::table)
            .values(todo_items::item_description.eq(description))
            .execute(&mut conn)
            .await
            .map_err(|e| TodoServiceError::Store(e.to_string()))?;
        Ok(())
    }

    async fn update_item(&self, id: i32, description: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        let count = diesel::update(todo_items::table.filter(todo_items::id.eq(id)))
            .set(todo_items::item_description.eq(description))
            .execute(&mut conn)
            .await
            .map_err(|e| TodoServiceError::Store(e.to_string()))?;
        if count == 0 {
            return Err(TodoServiceError::NotFound(id));
        }
        Ok(())
    }

    async fn delete_item(&self, id: i32) -> Result<()> {
        let mut conn = self.conn().await?;
        let count = diesel::delete(todo_items::table.filter(todo_items::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(|e| TodoServiceError::Store(e.to_string()))?;
        if count == 0 {
            return Err(TodoServiceError::NotFound(id));
        }
        Ok(())
    }
}
