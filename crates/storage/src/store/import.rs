// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Writing import batches and the import log.

use chrono::{DateTime, Utc};
use llm_leaderboard_core::ingest::{ImportBatch, OutputRow};
use llm_leaderboard_core::scoring::metrics_for_output;
use llm_leaderboard_core::{ImportRecord, Task};
use sqlx::{FromRow, Sqlite, Transaction};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{info, instrument};

use super::LeaderboardStore;
use crate::error::Result;
use crate::views::ImportSummary;

/// How an import batch is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Write quality-score facts. When off, outputs are stored and any
    /// previous facts of re-imported outputs are still removed.
    pub record_scores: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { record_scores: true }
    }
}

#[derive(Debug, FromRow)]
struct ImportRow {
    id: i64,
    source_file: String,
    imported_at: DateTime<Utc>,
    notes: Option<String>,
}

impl From<ImportRow> for ImportRecord {
    fn from(row: ImportRow) -> Self {
        ImportRecord {
            id: row.id,
            source_file: row.source_file,
            imported_at: row.imported_at,
            notes: row.notes,
        }
    }
}

impl LeaderboardStore {
    /// Write a parsed batch in one transaction and log it.
    ///
    /// Every model referenced by the batch must already be synchronized.
    #[instrument(skip(self, batch), fields(tasks = batch.tasks.len(), outputs = batch.outputs.len()))]
    pub async fn import_batch(
        &self,
        source_file: &str,
        batch: &ImportBatch,
        options: ImportOptions,
    ) -> Result<ImportSummary> {
        let mut tx = self.pool.begin().await?;

        for task in &batch.tasks {
            upsert_task(&mut tx, task).await?;
        }

        let outputs = distinct_outputs(&batch.outputs);
        let mut metrics_inserted = 0;
        for row in &outputs {
            metrics_inserted += record_output(&mut tx, row, options).await?;
        }

        let mut summary = ImportSummary {
            import_id: 0,
            source_file: source_file.to_string(),
            tasks_inserted: batch.tasks.len(),
            outputs_inserted: outputs.len(),
            metrics_inserted,
            skipped_rows: batch.skipped_rows,
            warnings: batch.warnings.clone(),
        };
        summary.import_id = insert_import_record(&mut tx, source_file, &summary.notes()).await?;

        tx.commit().await?;

        info!(
            import_id = summary.import_id,
            source_file,
            tasks = summary.tasks_inserted,
            outputs = summary.outputs_inserted,
            metrics = summary.metrics_inserted,
            skipped = summary.skipped_rows,
            "Import completed"
        );
        Ok(summary)
    }

    /// Import log, newest first.
    pub async fn imports(&self) -> Result<Vec<ImportRecord>> {
        let rows: Vec<ImportRow> = sqlx::query_as(
            "SELECT id, source_file, imported_at, notes FROM imports ORDER BY imported_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ImportRecord::from).collect())
    }
}

/// One row per (task, model), keeping the last occurrence in its first
/// position. Only these rows reach the database.
fn distinct_outputs(rows: &[OutputRow]) -> Vec<&OutputRow> {
    let mut slots: HashMap<(&str, &str), usize> = HashMap::new();
    let mut distinct: Vec<&OutputRow> = Vec::with_capacity(rows.len());
    for row in rows {
        match slots.entry((row.task_id.as_str(), row.model_key.as_str())) {
            Entry::Occupied(slot) => distinct[*slot.get()] = row,
            Entry::Vacant(slot) => {
                slot.insert(distinct.len());
                distinct.push(row);
            }
        }
    }
    distinct
}

async fn upsert_task(tx: &mut Transaction<'_, Sqlite>, task: &Task) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO tasks (task_id, task_name, prompt_text, task_group) VALUES (?, ?, ?, ?)
        ON CONFLICT (task_id) DO UPDATE SET
            task_name = excluded.task_name,
            prompt_text = excluded.prompt_text,
            task_group = excluded.task_group
        "#,
    )
    .bind(&task.task_id)
    .bind(&task.task_name)
    .bind(&task.prompt_text)
    .bind(&task.task_group)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Upsert one output, replace its metric facts and return how many facts
/// were written. The output keeps its id across re-imports.
async fn record_output(
    tx: &mut Transaction<'_, Sqlite>,
    row: &OutputRow,
    options: ImportOptions,
) -> Result<usize> {
    let length = row.output_text.chars().count() as i64;
    let output_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO outputs (task_id, model_key, output_text, tokens, length) VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (task_id, model_key) DO UPDATE SET
            output_text = excluded.output_text,
            tokens = excluded.tokens,
            length = excluded.length
        RETURNING id
        "#,
    )
    .bind(&row.task_id)
    .bind(&row.model_key)
    .bind(&row.output_text)
    .bind(row.tokens)
    .bind(length)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query("DELETE FROM metrics WHERE output_id = ?")
        .bind(output_id)
        .execute(&mut **tx)
        .await?;

    if !options.record_scores {
        return Ok(0);
    }

    let facts = metrics_for_output(row.quality_score);
    for (metric, value) in &facts {
        sqlx::query("INSERT INTO metrics (output_id, metric_name, metric_value) VALUES (?, ?, ?)")
            .bind(output_id)
            .bind(metric.as_str())
            .bind(value)
            .execute(&mut **tx)
            .await?;
    }
    Ok(facts.len())
}

async fn insert_import_record(
    tx: &mut Transaction<'_, Sqlite>,
    source_file: &str,
    notes: &str,
) -> Result<i64> {
    let id = sqlx::query("INSERT INTO imports (source_file, imported_at, notes) VALUES (?, ?, ?)")
        .bind(source_file)
        .bind(Utc::now())
        .bind(notes)
        .execute(&mut **tx)
        .await?
        .last_insert_rowid();
    Ok(id)
}
