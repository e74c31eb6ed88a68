// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Deletion, reset and statistics.

use llm_leaderboard_core::TaskGroup;
use sqlx::{Row, Sqlite, Transaction};
use tracing::{info, warn};

use super::LeaderboardStore;
use crate::error::{Result, StorageError};
use crate::views::{DeletedCounts, Stats};

/// Label under which tasks without a group are counted.
pub const UNGROUPED: &str = "none";

impl LeaderboardStore {
    /// Delete one task together with its outputs and their metrics.
    pub async fn delete_task(&self, task_id: &str) -> Result<DeletedCounts> {
        let mut tx = self.pool.begin().await?;
        let counts = delete_tasks_where(&mut tx, "task_id = ?", task_id).await?;
        if counts.tasks == 0 {
            return Err(StorageError::not_found("Task", task_id));
        }
        tx.commit().await?;

        info!(task_id, outputs = counts.outputs, metrics = counts.metrics, "Task deleted");
        Ok(counts)
    }

    /// Delete every task of a group. An empty group deletes nothing.
    pub async fn delete_task_group(&self, group: TaskGroup) -> Result<DeletedCounts> {
        let mut tx = self.pool.begin().await?;
        let counts = delete_tasks_where(&mut tx, "task_group = ?", group.as_str()).await?;
        tx.commit().await?;

        info!(task_group = %group, tasks = counts.tasks, outputs = counts.outputs, "Task group deleted");
        Ok(counts)
    }

    /// Remove all tasks, outputs, metrics and import records. Models stay.
    pub async fn reset_tasks(&self) -> Result<DeletedCounts> {
        let mut tx = self.pool.begin().await?;
        let metrics = sqlx::query("DELETE FROM metrics").execute(&mut *tx).await?.rows_affected();
        let outputs = sqlx::query("DELETE FROM outputs").execute(&mut *tx).await?.rows_affected();
        let tasks = sqlx::query("DELETE FROM tasks").execute(&mut *tx).await?.rows_affected();
        let imports = sqlx::query("DELETE FROM imports").execute(&mut *tx).await?.rows_affected();
        tx.commit().await?;

        warn!(tasks, outputs, metrics, imports, "All task data reset");
        Ok(DeletedCounts {
            tasks,
            outputs,
            metrics,
            imports,
        })
    }

    pub async fn stats(&self) -> Result<Stats> {
        let counts = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM models) AS models,
                (SELECT COUNT(*) FROM tasks) AS tasks,
                (SELECT COUNT(*) FROM outputs) AS outputs,
                (SELECT COUNT(*) FROM metrics) AS metrics,
                (SELECT COUNT(*) FROM imports) AS imports
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let groups = sqlx::query(
            "SELECT COALESCE(task_group, ?) AS task_group, COUNT(*) AS tasks FROM tasks GROUP BY 1",
        )
        .bind(UNGROUPED)
        .fetch_all(&self.pool)
        .await?;

        Ok(Stats {
            models: counts.get("models"),
            tasks: counts.get("tasks"),
            outputs: counts.get("outputs"),
            metrics: counts.get("metrics"),
            imports: counts.get("imports"),
            task_groups: groups
                .into_iter()
                .map(|row| (row.get("task_group"), row.get("tasks")))
                .collect(),
        })
    }
}

/// Delete the tasks matching `predicate` (one bound parameter) along with
/// their dependents, children first.
async fn delete_tasks_where(
    tx: &mut Transaction<'_, Sqlite>,
    predicate: &str,
    value: &str,
) -> Result<DeletedCounts> {
    let metrics = sqlx::query(&format!(
        "DELETE FROM metrics WHERE output_id IN (SELECT o.id FROM outputs o \
         WHERE o.task_id IN (SELECT task_id FROM tasks WHERE {predicate}))"
    ))
    .bind(value)
    .execute(&mut **tx)
    .await?
    .rows_affected();

    let outputs = sqlx::query(&format!(
        "DELETE FROM outputs WHERE task_id IN (SELECT task_id FROM tasks WHERE {predicate})"
    ))
    .bind(value)
    .execute(&mut **tx)
    .await?
    .rows_affected();

    let tasks = sqlx::query(&format!("DELETE FROM tasks WHERE {predicate}"))
        .bind(value)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    Ok(DeletedCounts {
        tasks,
        outputs,
        metrics,
        imports: 0,
    })
}
