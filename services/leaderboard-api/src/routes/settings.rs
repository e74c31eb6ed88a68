// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-session view preferences.

use axum::{extract::State, routing::{get, post}, Json, Router};
use llm_leaderboard_core::ViewPreferences;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::middleware::ReqSession;
use crate::models::{success, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/settings", get(get_settings))
        .route("/api/settings/columns", post(save_columns))
        .route("/api/settings/filters", post(save_filters))
        .route("/api/settings/columns/reset", post(reset_columns))
        .route("/api/settings/filters/reset", post(reset_filters))
        .route("/api/settings/reset", post(reset_all))
}

#[derive(Debug, Deserialize)]
pub struct ColumnsBody {
    pub columns: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FiltersBody {
    pub filters: Vec<String>,
}

fn settings_body(prefs: &ViewPreferences) -> Json<Value> {
    success(json!({
        "settings": prefs,
        "columns": prefs.column_states(),
        "visible_columns": prefs.visible_columns(),
        "filters": prefs.filter_states(),
    }))
}

async fn get_settings(State(state): State<Arc<AppState>>, session: ReqSession) -> Json<Value> {
    settings_body(&state.preferences(&session))
}

async fn save_columns(
    State(state): State<Arc<AppState>>,
    session: ReqSession,
    Json(body): Json<ColumnsBody>,
) -> Json<Value> {
    let prefs = state.update_preferences(&session, |p| p.set_columns(body.columns));
    settings_body(&prefs)
}

async fn save_filters(
    State(state): State<Arc<AppState>>,
    session: ReqSession,
    Json(body): Json<FiltersBody>,
) -> Json<Value> {
    let prefs = state.update_preferences(&session, |p| p.set_filters(body.filters));
    settings_body(&prefs)
}

async fn reset_columns(State(state): State<Arc<AppState>>, session: ReqSession) -> Json<Value> {
    let prefs = state.update_preferences(&session, ViewPreferences::reset_columns);
    settings_body(&prefs)
}

async fn reset_filters(State(state): State<Arc<AppState>>, session: ReqSession) -> Json<Value> {
    let prefs = state.update_preferences(&session, ViewPreferences::reset_filters);
    settings_body(&prefs)
}

async fn reset_all(State(state): State<Arc<AppState>>, session: ReqSession) -> Json<Value> {
    let prefs = state.update_preferences(&session, |p| *p = ViewPreferences::default());
    settings_body(&prefs)
}
