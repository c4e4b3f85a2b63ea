use clap::{Parser, ValueEnum};
use todo_service::config::{
    BackendConfig, Config, DatabaseConfig, PoolConfig, DEFAULT_POOL_MAX_SIZE,
    DEFAULT_POOL_TIMEOUT_SECS, DEFAULT_PORT,
};
use todo_service::daemon;
use todo_service::error::Result;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    Mysql,
    Sqlite,
    Memory,
}

#[derive(Parser, Debug)]
#[command(name = "todo-serviced")]
#[command(about = "HTTP service for the todoItems table")]
struct Cli {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    #[arg(long, env = "TODO_BACKEND", value_enum, default_value_t = Backend::Mysql)]
    backend: Backend,

    #[arg(long, env = "DB_HOST")]
    db_host: Option<String>,

    #[arg(long, env = "DB_PORT", default_value_t = 3306)]
    db_port: u16,

    #[arg(long, env = "DB_USER")]
    db_user: Option<String>,

    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    db_password: Option<String>,

    #[arg(long, env = "DB_NAME")]
    db_name: Option<String>,

    #[arg(long, env = "TODO_SQLITE_PATH", default_value = "./data/todo.db")]
    sqlite_path: String,

    #[arg(long, env = "DB_POOL_MAX_SIZE", default_value_t = DEFAULT_POOL_MAX_SIZE)]
    pool_max_size: u32,

    #[arg(long, env = "DB_POOL_TIMEOUT_SECS", default_value_t = DEFAULT_POOL_TIMEOUT_SECS)]
    pool_timeout_secs: u64,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let backend = match self.backend {
            Backend::Mysql => BackendConfig::Mysql(DatabaseConfig::from_parts(
                self.db_host,
                self.db_port,
                self.db_user,
                self.db_password,
                self.db_name,
            )?),
            Backend::Sqlite => BackendConfig::Sqlite {
                path: self.sqlite_path,
            },
            Backend::Memory => BackendConfig::Memory,
        };
        Ok(Config {
            host: self.host,
            port: self.port,
            backend,
            pool: PoolConfig {
                max_size: self.pool_max_size.max(1),
                connection_timeout_secs: self.pool_timeout_secs,
            },
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,todo_service=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let config = Cli::parse().into_config()?;

    daemon::run_with_shutdown(&config, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        futures::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
