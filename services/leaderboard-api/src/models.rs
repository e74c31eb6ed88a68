// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared application state and response helpers.

use axum::Json;
use llm_leaderboard_core::ingest::ColumnMapping;
use llm_leaderboard_core::{ModelCatalog, ViewPreferences};
use llm_leaderboard_storage::LeaderboardStore;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::sessions::SessionStore;

/// State shared by every handler.
pub struct AppState {
    pub store: LeaderboardStore,
    pub catalog: ModelCatalog,
    /// Column mapping applied to CSV imports.
    pub mapping: ColumnMapping,
    /// View preferences keyed by session id.
    pub sessions: SessionStore,
    pub config: AppConfig,
    /// `None` when no Prometheus recorder is installed (tests).
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(store: LeaderboardStore, catalog: ModelCatalog, config: AppConfig) -> Self {
        let mapping = config
            .catalog
            .mapping_path
            .as_ref()
            .map(ColumnMapping::load_or_default)
            .unwrap_or_default();
        let sessions = SessionStore::new(config.sessions.max_entries, config.sessions.ttl());
        Self {
            store,
            catalog,
            mapping,
            sessions,
            config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Current preferences of a session, defaults when unseen.
    pub fn preferences(&self, session_id: &str) -> ViewPreferences {
        self.sessions.get(session_id)
    }

    /// Apply `update` to a session's preferences and return the result.
    pub fn update_preferences(
        &self,
        session_id: &str,
        update: impl FnOnce(&mut ViewPreferences),
    ) -> ViewPreferences {
        self.sessions.update(session_id, update)
    }
}

/// Success envelope: `{"success": true}` merged with `fields`.
pub fn success(fields: Value) -> Json<Value> {
    let mut body = json!({ "success": true });
    if let (Some(map), Value::Object(extra)) = (body.as_object_mut(), fields) {
        map.extend(extra);
    }
    Json(body)
}
