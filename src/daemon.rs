use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{Result, TodoServiceError};
use crate::interfaces::store::TodoStore;
use crate::providers::open_store;

const DATABASE_ERROR: &str = "Database error";
const TEXT_REQUIRED: &str = "Text is required";
const ID_AND_DESCRIPTION_REQUIRED: &str = "ID and description required";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize, Default)]
struct AddItemRequest {
    text: Option<String>,
}

impl AddItemRequest {
    fn validate(self) -> Result<String> {
        self.text
            .filter(|text| !text.is_empty())
            .ok_or_else(|| TodoServiceError::Validation(TEXT_REQUIRED.to_string()))
    }
}

/// Clients send the identifier as a JSON integer, an integral float, or a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemId {
    Number(i64),
    Float(f64),
    Text(String),
}

impl ItemId {
    fn resolve(&self) -> Option<i32> {
        let id = match self {
            Self::Number(n) => i32::try_from(*n).ok(),
            Self::Float(f) => {
                let in_range = (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(f);
                (f.fract() == 0.0 && in_range).then_some(*f as i32)
            }
            Self::Text(text) => text.trim().parse().ok(),
        };
        id.filter(|id| *id != 0)
    }
}

#[derive(Deserialize, Default)]
struct EditItemRequest {
    #[serde(rename = "ID")]
    id: Option<ItemId>,
    #[serde(rename = "itemDescription")]
    item_description: Option<String>,
}

impl EditItemRequest {
    fn validate(self) -> Result<(i32, String)> {
        let id = self.id.as_ref().and_then(ItemId::resolve);
        let description = self.item_description.filter(|d| !d.is_empty());
        match (id, description) {
            (Some(id), Some(description)) => Ok((id, description)),
            _ => Err(TodoServiceError::Validation(
                ID_AND_DESCRIPTION_REQUIRED.to_string(),
            )),
        }
    }
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for TodoServiceError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            TodoServiceError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, DATABASE_ERROR.to_string()),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_items))
        .route("/add-item", post(add_item))
        .route("/edit-item", put(edit_item))
        .route("/delete-item/:id", delete(delete_item))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn list_items(State(state): State<AppState>) -> Response {
    match state.store.list_items().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "error fetching items");
            err.into_response()
        }
    }
}

async fn add_item(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddItemRequest>, JsonRejection>,
) -> Response {
    let text = match body_or_default(payload).validate() {
        Ok(text) => text,
        Err(err) => return err.into_response(),
    };

    match state.store.add_item(&text).await {
        Ok(()) => message(StatusCode::CREATED, "Item added successfully"),
        Err(err) => {
            tracing::error!(error = %err, "error adding item");
            err.into_response()
        }
    }
}

async fn edit_item(
    State(state): State<AppState>,
    payload: std::result::Result<Json<EditItemRequest>, JsonRejection>,
) -> Response {
    let (id, description) = match body_or_default(payload).validate() {
        Ok(fields) => fields,
        Err(err) => return err.into_response(),
    };

    match state.store.update_item(id, &description).await {
        Ok(()) => message(StatusCode::OK, "Item updated successfully"),
        Err(TodoServiceError::NotFound(id)) => {
            tracing::debug!(id, "edit matched no item");
            message(StatusCode::OK, "Item updated successfully")
        }
        Err(err) => {
            tracing::error!(error = %err, id, "error updating item");
            err.into_response()
        }
    }
}

async fn delete_item(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    // A non-numeric id cannot match a row, so it is the same no-op as a missing one.
    let Ok(id) = raw_id.trim().parse::<i32>() else {
        tracing::debug!(id = %raw_id, "delete with non-numeric id");
        return message(StatusCode::OK, "Item deleted successfully");
    };

    match state.store.delete_item(id).await {
        Ok(()) => message(StatusCode::OK, "Item deleted successfully"),
        Err(TodoServiceError::NotFound(id)) => {
            tracing::debug!(id, "delete matched no item");
            message(StatusCode::OK, "Item deleted successfully")
        }
        Err(err) => {
            tracing::error!(error = %err, id, "error deleting item");
            err.into_response()
        }
    }
}

/// Unreadable or missing bodies validate as empty requests.
fn body_or_default<T: Default>(payload: std::result::Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected request body");
            T::default()
        }
    }
}

fn message(status: StatusCode, message: &'static str) -> Response {
    (status, Json(MessageResponse { message })).into_response()
}

pub async fn run_with_shutdown<F>(config: &Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let store = open_store(config).await?;
    let app = build_router(AppState::new(store));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TodoServiceError::Runtime(e.to_string()))?;
    tracing::info!(%addr, "server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| TodoServiceError::Runtime(e.to_string()))?;

    tracing::info!("server stopped");
    Ok(())
}
