// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Task listing, side-by-side outputs and deletion.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use llm_leaderboard_core::TaskGroup;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::models::{success, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tasks", get(list_tasks))
        .route("/api/task/:task_id/outputs", get(task_outputs))
        .route("/api/task/:task_id", delete(delete_task))
        .route("/api/task-group/:group", delete(delete_task_group))
}

#[derive(Debug, Deserialize)]
pub struct TaskListParams {
    #[serde(default)]
    pub task_group: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OutputParams {
    /// Comma-separated model keys.
    #[serde(default)]
    pub models: Option<String>,
}

fn split_models(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TaskListParams>,
) -> ApiResult<Json<Value>> {
    let group = match params.task_group.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<TaskGroup>()?),
    };
    let tasks = state.store.tasks(group).await?;
    Ok(success(json!({ "count": tasks.len(), "tasks": tasks })))
}

async fn task_outputs(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
    Query(params): Query<OutputParams>,
) -> ApiResult<Json<Value>> {
    let task = state
        .store
        .task(&task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task not found: {}", task_id)))?;

    let models = split_models(params.models.as_deref());
    let outputs = state.store.task_outputs(&task_id, &models).await?;
    Ok(success(json!({ "task": task, "outputs": outputs })))
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let deleted = state.store.delete_task(&task_id).await?;
    info!(task_id = %task_id, "Task deleted via API");
    Ok(success(json!({
        "message": format!("Task {} deleted", task_id),
        "deleted": deleted,
    })))
}

async fn delete_task_group(
    State(state): State<Arc<AppState>>,
    Path(group): Path<String>,
) -> ApiResult<Json<Value>> {
    let group: TaskGroup = group.parse()?;
    let deleted = state.store.delete_task_group(group).await?;
    Ok(success(json!({
        "message": format!("Deleted {} tasks from group {}", deleted.tasks, group),
        "deleted": deleted,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_models() {
        assert_eq!(split_models(Some("a, b,,c ")), vec!["a", "b", "c"]);
        assert!(split_models(Some("")).is_empty());
        assert!(split_models(None).is_empty());
    }
}
