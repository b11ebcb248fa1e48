//! Todo route handlers.
//!
//! Each handler performs one [`TodoService`] call on the blocking pool.

use super::AppState;
use super::error::ApiError;
use crate::models::{NewTodo, Stats, Todo, TodoId};
use crate::observability::{RequestContext, enter_request_context};
use crate::services::TodoService;
use crate::{Error, Result};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "todo-backend";

/// Runs a synchronous service call on the blocking pool, keeping the
/// current span and request context.
async fn blocking<T, F>(state: &AppState, call: F) -> std::result::Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&TodoService) -> Result<T> + Send + 'static,
{
    let service = state.service.clone();
    let span = tracing::Span::current();
    let context = RequestContext::current();

    tokio::task::spawn_blocking(move || {
        let _span = span.enter();
        let _context = context.map(enter_request_context);
        call(&service)
    })
    .await
    .map_err(|e| Error::operation("spawn_blocking", e))?
    .map_err(ApiError::from)
}

/// `GET {base}`
pub async fn list_todos(
    State(state): State<AppState>,
) -> std::result::Result<Json<Vec<Todo>>, ApiError> {
    blocking(&state, TodoService::list).await.map(Json)
}

/// `GET {base}/{id}`, 404 with an empty body if absent.
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> std::result::Result<Response, ApiError> {
    let id = TodoId::new(id);
    let todo = blocking(&state, move |service| service.get_by_id(id)).await?;
    Ok(todo.map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |todo| Json(todo).into_response(),
    ))
}

/// `POST {base}`
pub async fn create_todo(
    State(state): State<AppState>,
    Json(fields): Json<NewTodo>,
) -> std::result::Result<Json<Todo>, ApiError> {
    blocking(&state, move |service| service.create(fields))
        .await
        .map(Json)
}

/// `PUT {base}/{id}`
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(fields): Json<NewTodo>,
) -> std::result::Result<Json<Todo>, ApiError> {
    let id = TodoId::new(id);
    blocking(&state, move |service| service.update(id, fields))
        .await
        .map(Json)
}

/// `DELETE {base}/{id}`, succeeds for missing ids.
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> std::result::Result<StatusCode, ApiError> {
    let id = TodoId::new(id);
    blocking(&state, move |service| service.delete(id)).await?;
    Ok(StatusCode::OK)
}

/// `GET {base}/completed`
pub async fn list_completed(
    State(state): State<AppState>,
) -> std::result::Result<Json<Vec<Todo>>, ApiError> {
    blocking(&state, TodoService::list_completed)
        .await
        .map(Json)
}

/// `GET {base}/stats`
pub async fn stats(State(state): State<AppState>) -> std::result::Result<Json<Stats>, ApiError> {
    blocking(&state, TodoService::stats).await.map(Json)
}

/// `POST {base}/stats/reset`
pub async fn reset_stats(
    State(state): State<AppState>,
) -> std::result::Result<StatusCode, ApiError> {
    blocking(&state, TodoService::reset_stats).await?;
    Ok(StatusCode::OK)
}

/// `GET {base}/health`, answered without touching the stores.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "UP",
        "service": SERVICE_NAME,
    }))
}
