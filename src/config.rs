use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TodoServiceError};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_POOL_MAX_SIZE: u32 = 10;
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_POOL_TIMEOUT_SECS: u64 = 3600;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseConfig {
    /// Builds a config from optional settings. The host falls back to `localhost`;
    /// a missing user or database name is rejected.
    pub fn from_parts(
        host: Option<String>,
        port: u16,
        user: Option<String>,
        password: Option<String>,
        name: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            host: host
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
            port,
            user: required("DB_USER", user)?,
            password: password.unwrap_or_default(),
            name: required("DB_NAME", name)?,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            self.name
        )
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PoolConfig {
    pub max_size: u32,
    pub connection_timeout_secs: u64,
}

impl PoolConfig {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs.max(1))
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_POOL_MAX_SIZE,
            connection_timeout_secs: DEFAULT_POOL_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum BackendConfig {
    Mysql(DatabaseConfig),
    Sqlite { path: String },
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: BackendConfig,
    pub pool: PoolConfig,
}

impl Config {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required(key: &str, value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| TodoServiceError::Config(format!("{key} is required")))
}
