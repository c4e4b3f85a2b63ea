pub mod config;
pub mod daemon;
pub mod domains;
pub mod error;
pub mod interfaces;
pub mod providers;

pub use crate::config::Config;
pub use crate::domains::todo::TodoItem;
pub use crate::error::{Result, TodoServiceError};
pub use crate::interfaces::store::TodoStore;
