//! Task status polling and cancellation (spec.md §6: `GET/DELETE /tasks/{task_id}`).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use growthloop_tasks::{TaskBroker, TaskResultStore};
use growthloop_types::TaskId;

use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TaskStatusResponse {
    #[serde(flatten)]
    pub status: growthloop_tasks::TaskStatus,
    pub redirect_url: Option<String>,
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<TaskId>,
) -> Result<Json<TaskStatusResponse>> {
    let status = state
        .task_results
        .get_status(task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("task {task_id}")))?;
    let redirect_url = status.redirect_url();
    Ok(Json(TaskStatusResponse { status, redirect_url }))
}

pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<TaskId>,
) -> Result<Json<serde_json::Value>> {
    state.tasks.cancel(task_id).await?;
    Ok(Json(serde_json::json!({ "cancelled": true })))
}
