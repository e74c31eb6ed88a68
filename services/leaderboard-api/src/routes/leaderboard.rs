// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Leaderboard, catalog and comparison endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use llm_leaderboard_core::window::DEFAULT_GROUP_LIMIT;
use llm_leaderboard_core::{LeaderboardQuery, MetadataFilter, TaskGroup};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::models::{success, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard", get(leaderboard))
        .route("/api/models", get(models))
        .route("/api/providers", get(providers))
        .route("/api/task-groups", get(task_groups))
        .route("/api/comparison", get(comparison))
        .route("/api/model/:model_key", get(model_details))
        .route("/api/model/:model_key/comparison", get(model_comparison))
}

fn count_query(endpoint: &'static str) {
    metrics::counter!("leaderboard_queries_total", "endpoint" => endpoint).increment(1);
}

/// `limit_groups` parameter; absent means the default.
fn limit_groups(params: &HashMap<String, String>) -> ApiResult<usize> {
    match params.get("limit_groups").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => Ok(DEFAULT_GROUP_LIMIT),
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::bad_request(format!("Invalid limit_groups: {}", raw))),
    }
}

async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    count_query("leaderboard");
    let query = LeaderboardQuery::from_params(&params);
    let rows = state.store.leaderboard(&query).await?;

    debug!(rows = rows.len(), "Leaderboard served");
    Ok(success(json!({
        "count": rows.len(),
        "task_group": query.task_group,
        "sort_by": query.sort_by,
        "leaderboard": rows,
    })))
}

async fn models(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    count_query("models");
    let filter = MetadataFilter::from_params(&params);
    let models: Vec<_> = state.catalog.filter(&filter).collect();
    success(json!({ "count": models.len(), "models": models }))
}

async fn providers(State(state): State<Arc<AppState>>) -> Json<Value> {
    success(json!({ "providers": state.catalog.providers() }))
}

async fn task_groups() -> Json<Value> {
    let groups: Vec<&str> = TaskGroup::ALL.iter().map(|g| g.as_str()).collect();
    success(json!({ "task_groups": groups }))
}

async fn comparison(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    count_query("comparison");
    let limit = limit_groups(&params)?;
    let comparison = state.store.task_group_performance(None, limit).await?;
    Ok(success(json!({ "comparison": comparison })))
}

async fn model_details(
    State(state): State<Arc<AppState>>,
    Path(model_key): Path<String>,
) -> ApiResult<Json<Value>> {
    count_query("model");
    let details = state
        .store
        .model_details(&model_key)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Model not found: {}", model_key)))?;
    Ok(success(json!({ "model": details })))
}

async fn model_comparison(
    State(state): State<Arc<AppState>>,
    Path(model_key): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    count_query("model_comparison");
    let limit = limit_groups(&params)?;
    let comparison = state
        .store
        .task_group_performance(Some(&model_key), limit)
        .await?;
    Ok(success(json!({
        "target_model": model_key,
        "comparison": comparison,
    })))
}
