use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoServiceError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("item {0} not found")]
    NotFound(i32),
    #[error("store error: {0}")]
    Store(String),
    #[error("runtime error: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, TodoServiceError>;
