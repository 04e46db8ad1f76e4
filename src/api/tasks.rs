//! Task API endpoints.
//!
//! - GET /api/tasks - List tasks
//! - POST /api/tasks - Create task
//! - PATCH /api/tasks/:id - Partially update task
//! - DELETE /api/tasks/:id - Delete task

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};

use crate::task::{NewTask, Task, TaskId, TaskPatch};

use super::error::ApiError;
use super::routes::AppState;

/// Create task routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/:id", patch(update_task).delete(delete_task))
}

fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    raw.parse().map_err(|_| {
        tracing::warn!(id = %raw, "Rejected non-integer task id");
        ApiError::InvalidTaskId
    })
}

/// The `:id` segment must both decode and parse as an integer.
fn task_id(path: Result<Path<String>, PathRejection>) -> Result<TaskId, ApiError> {
    let Path(raw) = path.map_err(|err| {
        tracing::warn!(error = %err, "Rejected undecodable task id");
        ApiError::InvalidTaskId
    })?;
    parse_task_id(&raw)
}

fn invalid_body(err: impl std::fmt::Display) -> ApiError {
    tracing::warn!(error = %err, "Rejected task payload");
    ApiError::InvalidTaskData
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/tasks
async fn list_tasks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.store.list_tasks().await?;
    tracing::debug!(count = tasks.len(), "Listed tasks");
    Ok(Json(tasks))
}

/// POST /api/tasks
async fn create_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(input) = payload.map_err(invalid_body)?;
    input.validate().map_err(invalid_body)?;

    let task = state.store.create_task(input).await?;
    tracing::info!(id = task.id, title = %task.title, "Created task");
    Ok(Json(task))
}

/// PATCH /api/tasks/:id
async fn update_task(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = task_id(path)?;
    let Json(patch) = payload.map_err(invalid_body)?;
    patch.validate().map_err(invalid_body)?;

    let task = state.store.update_task(id, patch).await?;
    tracing::info!(id = task.id, completed = task.completed, "Updated task");
    Ok(Json(task))
}

/// DELETE /api/tasks/:id
async fn delete_task(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = task_id(path)?;
    state.store.delete_task(id).await?;
    tracing::info!(id, "Deleted task");
    Ok(StatusCode::NO_CONTENT)
}
