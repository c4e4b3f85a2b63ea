use std::path::Path;

use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel::{ConnectionError, ConnectionResult};
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, RunQueryDsl, SimpleAsyncConnection};
use futures::future::{BoxFuture, FutureExt};

use crate::config::PoolConfig;
use crate::domains::todo::TodoItem;
use crate::error::{Result, TodoServiceError};
use crate::interfaces::store::TodoStore;
use crate::providers::schema::todo_items;
use crate::providers::{map_row, TodoRow};

// Overlapping writers wait on the file lock instead of failing with SQLITE_BUSY.
const CONNECTION_PRAGMAS: &str = "PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;";

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS todoItems (
    ID INTEGER PRIMARY KEY AUTOINCREMENT,
    itemDescription TEXT NOT NULL
)";

type SqliteAsyncConn = SyncConnectionWrapper<SqliteConnection>;
type SqlitePool = Pool<SqliteAsyncConn>;
type SqlitePooledConn<'a> = PooledConnection<'a, SqliteAsyncConn>;

/// File-backed store for local runs. Creates `todoItems` on first open.
pub struct SqliteTodoStore {
    pool: SqlitePool,
}

impl SqliteTodoStore {
    pub async fn new(sqlite_path: impl AsRef<str>, pool_config: PoolConfig) -> Result<Self> {
        let sqlite_path = sqlite_path.as_ref();
        ensure_parent_dir(sqlite_path)?;
        ensure_table(sqlite_path).await?;

        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup = Box::new(establish_connection);
        let manager = AsyncDieselConnectionManager::<SqliteAsyncConn>::new_with_config(
            sqlite_path,
            manager_config,
        );
        let pool: SqlitePool = Pool::builder()
            .max_size(pool_config.max_size)
            .connection_timeout(pool_config.connection_timeout())
            .build(manager)
            .await
            .map_err(|e| TodoServiceError::Store(e.to_string()))?;
        Ok(Self { pool })
    }

    async fn conn(&self) -> Result<SqlitePooledConn<'_>> {
        self.pool
            .get()
            .await
            .map_err(|e| TodoServiceError::Store(e.to_string()))
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
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

fn establish_connection(url: &str) -> BoxFuture<'_, ConnectionResult<SqliteAsyncConn>> {
    async move {
        let mut conn = SqliteAsyncConn::establish(url).await?;
        conn.batch_execute(CONNECTION_PRAGMAS)
            .await
            .map_err(ConnectionError::CouldntSetupConfiguration)?;
        Ok(conn)
    }
    .boxed()
}

fn ensure_parent_dir(path: &str) -> Result<()> {
    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| TodoServiceError::Store(e.to_string()))?;
    }
    Ok(())
}

async fn ensure_table(database_url: &str) -> Result<()> {
    let database_url = database_url.to_string();
    tokio::task::spawn_blocking(move || {
        let mut conn = SqliteConnection::establish(&database_url)
            .map_err(|e| TodoServiceError::Store(e.to_string()))?;
        conn.batch_execute(CONNECTION_PRAGMAS)
            .map_err(|e| TodoServiceError::Store(e.to_string()))?;
        conn.batch_execute(CREATE_TABLE_SQL)
            .map_err(|e| TodoServiceError::Store(e.to_string()))?;
        Ok::<_, TodoServiceError>(())
    })
    .await
    .map_err(|e| TodoServiceError::Runtime(e.to_string()))??;
    Ok(())
}
