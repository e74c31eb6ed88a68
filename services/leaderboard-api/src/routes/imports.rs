// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Spreadsheet import, import log and statistics.

use axum::{
    body::Bytes,
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use llm_leaderboard_core::ingest::{ensure_supported_extension, parse_import};
use llm_leaderboard_storage::ImportOptions;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::models::{success, AppState};

/// Source name used when the client does not supply one.
const DEFAULT_SOURCE: &str = "upload.csv";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/import", post(import))
        .route("/api/imports", get(imports))
        .route("/api/stats", get(stats))
}

#[derive(Debug, Deserialize)]
pub struct ImportParams {
    /// Uploaded file name; its extension is validated.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_record_scores")]
    pub record_scores: bool,
}

fn default_record_scores() -> bool {
    true
}

async fn import(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ImportParams>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let source = params
        .source
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SOURCE);
    ensure_supported_extension(source)?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request("Import body is empty"));
    }

    let batch = match parse_import(source, &body, &state.mapping, &state.catalog) {
        Ok(batch) => batch,
        Err(err) => {
            metrics::counter!("leaderboard_imports_total", "outcome" => "rejected").increment(1);
            warn!(source, error = %err, "Import rejected");
            return Err(err.into());
        }
    };

    if params.dry_run {
        metrics::counter!("leaderboard_imports_total", "outcome" => "dry_run").increment(1);
        return Ok(success(json!({ "report": batch.dry_run_report() })));
    }

    let options = ImportOptions {
        record_scores: params.record_scores,
    };
    let summary = state.store.import_batch(source, &batch, options).await?;

    metrics::counter!("leaderboard_imports_total", "outcome" => "imported").increment(1);
    metrics::counter!("leaderboard_import_rows_total").increment(summary.outputs_inserted as u64);
    info!(source, import_id = summary.import_id, "Import accepted via API");

    Ok(success(json!({
        "message": summary.notes(),
        "import": summary,
    })))
}

async fn imports(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let imports = state.store.imports().await?;
    Ok(success(json!({ "count": imports.len(), "imports": imports })))
}

async fn stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let stats = state.store.stats().await?;
    Ok(success(json!({ "stats": stats })))
}
