// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! The leaderboard data-access layer.
//!
//! [`LeaderboardStore`] owns a SQLite pool and the quality exclusion set.
//! Its methods are split by concern:
//!
//! - this module: connection, model catalog sync, catalog reads
//! - [`aggregate`]: leaderboard aggregation and task-group comparison
//! - [`import`]: writing import batches and the import log
//! - [`maintenance`]: deletion, reset and statistics

mod aggregate;
mod import;
mod maintenance;

pub use import::ImportOptions;
pub use maintenance::UNGROUPED;

use llm_leaderboard_core::{
    types::metric_values, MetadataFilter, MetricName, MetricValues, Model, ModelCatalog,
    ModelMeta, Output, QualityExclusions, Task, TaskGroup,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Row, Sqlite};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::schema::init_schema;
use crate::views::{ModelDetails, ModelTaskScore, OutputView};

/// Connection settings.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SQLite URL, e.g. `sqlite://data/results.db`.
    pub url: String,
    pub max_connections: u32,
    /// Wait for a locked database before failing.
    pub busy_timeout: Duration,
}

impl StoreConfig {
    /// Database file behind a `sqlite:` URL; `None` for in-memory URLs.
    pub fn file_path(&self) -> Option<&Path> {
        let rest = self
            .url
            .strip_prefix("sqlite://")
            .or_else(|| self.url.strip_prefix("sqlite:"))?;
        let path = rest.split('?').next().unwrap_or(rest);
        if path.is_empty() || path.starts_with(":memory:") {
            None
        } else {
            Some(Path::new(path))
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/results.db".to_string(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(30),
        }
    }
}

/// SQLite-backed leaderboard store.
#[derive(Debug, Clone)]
pub struct LeaderboardStore {
    pool: SqlitePool,
    exclusions: QualityExclusions,
}

impl LeaderboardStore {
    /// Open (creating if missing) a database file and apply the schema.
    pub async fn connect(config: &StoreConfig, exclusions: QualityExclusions) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        info!(url = %config.url, "Connected to leaderboard database");
        Self::from_pool(pool, exclusions).await
    }

    /// Private in-memory database. Every handle shares one connection.
    pub async fn in_memory(exclusions: QualityExclusions) -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::from_pool(pool, exclusions).await
    }

    /// Wrap an existing pool and apply the schema.
    pub async fn from_pool(pool: SqlitePool, exclusions: QualityExclusions) -> Result<Self> {
        init_schema(&pool).await?;
        Ok(Self { pool, exclusions })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn exclusions(&self) -> &QualityExclusions {
        &self.exclusions
    }

    /// Upsert every catalog model. Existing rows keep their id so outputs
    /// stay attached.
    pub async fn sync_models(&self, catalog: &ModelCatalog) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        for model in catalog.models() {
            let meta = serde_json::to_string(&model.meta)?;
            sqlx::query(
                r#"
                INSERT INTO models (model_key, name, meta) VALUES (?, ?, ?)
                ON CONFLICT (model_key) DO UPDATE SET name = excluded.name, meta = excluded.meta
                "#,
            )
            .bind(&model.model_key)
            .bind(&model.name)
            .bind(meta)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!(models = catalog.len(), "Model catalog synchronized");
        Ok(catalog.len())
    }

    /// Stored models matching `filter`, ordered by key.
    pub async fn models(&self, filter: &MetadataFilter) -> Result<Vec<Model>> {
        let rows = sqlx::query("SELECT model_key, name, meta FROM models ORDER BY model_key")
            .fetch_all(&self.pool)
            .await?;

        let models = rows
            .into_iter()
            .map(|row| {
                let model_key: String = row.get("model_key");
                let meta = ModelMeta::from_json_lossy(&model_key, row.get("meta"));
                Model {
                    name: row.get("name"),
                    model_key,
                    meta,
                }
            })
            .filter(|m| filter.matches(&m.meta))
            .collect();
        Ok(models)
    }

    /// Single stored model.
    pub async fn model(&self, model_key: &str) -> Result<Option<Model>> {
        let row = sqlx::query("SELECT model_key, name, meta FROM models WHERE model_key = ?")
            .bind(model_key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Model {
            model_key: row.get("model_key"),
            name: row.get("name"),
            meta: ModelMeta::from_json_lossy(model_key, row.get("meta")),
        }))
    }

    /// Tasks ordered by id, optionally restricted to one group.
    pub async fn tasks(&self, group: Option<TaskGroup>) -> Result<Vec<Task>> {
        let label = group.map(|g| g.as_str());
        let rows = sqlx::query(
            r#"
            SELECT task_id, task_name, prompt_text, task_group FROM tasks
            WHERE (? IS NULL OR task_group = ?)
            ORDER BY task_id
            "#,
        )
        .bind(label)
        .bind(label)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| task_from_row(&row)).collect())
    }

    pub async fn task(&self, task_id: &str) -> Result<Option<Task>> {
        let row = sqlx::query(
            "SELECT task_id, task_name, prompt_text, task_group FROM tasks WHERE task_id = ?",
        )
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(task_from_row))
    }

    /// Outputs of one task with their metrics, optionally limited to some
    /// models. An empty `model_keys` means every model.
    pub async fn task_outputs(&self, task_id: &str, model_keys: &[String]) -> Result<Vec<OutputView>> {
        let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            r#"
            SELECT o.id, o.task_id, o.model_key, o.output_text, o.tokens, o.length,
                   m.name AS model_name, m.meta AS model_meta
            FROM outputs o
            JOIN models m ON m.model_key = o.model_key
            WHERE o.task_id = "#,
        );
        query.push_bind(task_id);
        if !model_keys.is_empty() {
            query.push(" AND o.model_key IN (");
            let mut keys = query.separated(", ");
            for key in model_keys {
                keys.push_bind(key);
            }
            keys.push_unseparated(")");
        }
        query.push(" ORDER BY o.model_key");

        let rows = query.build().fetch_all(&self.pool).await?;
        let ids: Vec<i64> = rows.iter().map(|row| row.get("id")).collect();
        let mut metrics = self.metrics_for_outputs(&ids).await?;

        let views = rows
            .into_iter()
            .map(|row| {
                let output = output_from_row(&row);
                let model_meta = ModelMeta::from_json_lossy(&output.model_key, row.get("model_meta"));
                OutputView {
                    metrics: metrics.remove(&output.id).unwrap_or_else(|| metric_values([])),
                    model_name: row.get("model_name"),
                    model_meta,
                    output,
                }
            })
            .collect();
        Ok(views)
    }

    /// A model with one row per task it has an output for.
    pub async fn model_details(&self, model_key: &str) -> Result<Option<ModelDetails>> {
        let Some(model) = self.model(model_key).await? else {
            return Ok(None);
        };

        let rows = sqlx::query(
            r#"
            SELECT o.id, t.task_id, t.task_name, t.task_group, o.tokens
            FROM outputs o
            JOIN tasks t ON t.task_id = o.task_id
            WHERE o.model_key = ?
            ORDER BY t.task_id
            "#,
        )
        .bind(model_key)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = rows.iter().map(|row| row.get("id")).collect();
        let mut metrics = self.metrics_for_outputs(&ids).await?;

        let tasks = rows
            .into_iter()
            .map(|row| {
                let id: i64 = row.get("id");
                ModelTaskScore {
                    task_id: row.get("task_id"),
                    task_name: row.get("task_name"),
                    task_group: row.get("task_group"),
                    tokens: row.get("tokens"),
                    metrics: metrics.remove(&id).unwrap_or_else(|| metric_values([])),
                }
            })
            .collect();

        Ok(Some(ModelDetails { model, tasks }))
    }

    /// Metric facts of the given outputs, keyed by output id.
    async fn metrics_for_outputs(&self, output_ids: &[i64]) -> Result<HashMap<i64, MetricValues>> {
        if output_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT output_id, metric_name, metric_value FROM metrics WHERE output_id IN (",
        );
        let mut ids = query.separated(", ");
        for id in output_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(")");

        let rows = query.build().fetch_all(&self.pool).await?;
        let mut facts: HashMap<i64, Vec<(MetricName, f64)>> = HashMap::new();
        for row in rows {
            let name: String = row.get("metric_name");
            match name.parse::<MetricName>() {
                Ok(metric) => facts
                    .entry(row.get("output_id"))
                    .or_default()
                    .push((metric, row.get("metric_value"))),
                Err(_) => debug!(metric = %name, "Skipping unsupported stored metric"),
            }
        }

        Ok(facts
            .into_iter()
            .map(|(id, values)| (id, metric_values(values)))
            .collect())
    }

    /// Fail with `NotFound` unless the model exists.
    pub(crate) async fn require_model(&self, model_key: &str) -> Result<()> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM models WHERE model_key = ?")
            .bind(model_key)
            .fetch_optional(&self.pool)
            .await?;
        exists
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found("Model", model_key))
    }
}

fn task_from_row(row: &sqlx::sqlite::SqliteRow) -> Task {
    Task {
        task_id: row.get("task_id"),
        task_name: row.get("task_name"),
        prompt_text: row.get("prompt_text"),
        task_group: row.get("task_group"),
        created_at: None,
    }
}

fn output_from_row(row: &sqlx::sqlite::SqliteRow) -> Output {
    Output {
        id: row.get("id"),
        task_id: row.get("task_id"),
        model_key: row.get("model_key"),
        output_text: row.get("output_text"),
        tokens: row.get("tokens"),
        length: row.get("length"),
    }
}
