// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP API for the LLM leaderboard.
//!
//! JSON endpoints for the aggregated leaderboard, task-group comparison,
//! task outputs, CSV and .xlsx imports, maintenance and per-session view settings.
//! Successful responses carry `"success": true`; errors use the
//! `{"error": {"code", "message"}, "meta": {"timestamp"}}` envelope.

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod sessions;

use axum::{extract::DefaultBodyLimit, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use models::AppState;

/// Build the application router.
pub fn app(state: Arc<AppState>) -> Router {
    let body_limit = state.config.upload.max_bytes;
    routes::routes()
        .layer(axum::middleware::from_fn(middleware::session_middleware))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
