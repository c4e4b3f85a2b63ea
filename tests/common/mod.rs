#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use todo_service::daemon::{build_router, AppState};
use todo_service::error::{Result, TodoServiceError};
use todo_service::interfaces::store::TodoStore;
use todo_service::providers::InMemoryTodoStore;
use todo_service::TodoItem;

/// Store whose every call fails the way an unreachable database does.
pub struct FailingStore;

#[async_trait]
impl TodoStore for FailingStore {
    async fn list_items(&self) -> Result<Vec<TodoItem>> {
        Err(TodoServiceError::Store("connection refused".to_string()))
    }

    async fn add_item(&self, _description: &str) -> Result<()> {
        Err(TodoServiceError::Store("connection refused".to_string()))
    }

    async fn update_item(&self, _id: i32, _description: &str) -> Result<()> {
        Err(TodoServiceError::Store("connection refused".to_string()))
    }

    async fn delete_item(&self, _id: i32) -> Result<()> {
        Err(TodoServiceError::Store("connection refused".to_string()))
    }
}

pub fn memory_app() -> Router {
    build_router(AppState::new(Arc::new(InMemoryTodoStore::new())))
}

pub fn failing_app() -> Router {
    build_router(AppState::new(Arc::new(FailingStore)))
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
