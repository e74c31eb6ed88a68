// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Relational schema.
//!
//! ```text
//! models 1───* outputs *───1 tasks
//!                 │
//!                 1
//!                 │
//!                 * metrics
//! imports (append-only log, unrelated)
//! ```
//!
//! Statements are idempotent; [`init_schema`] can run on every start.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;

/// DDL applied in order.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS models (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        model_key TEXT UNIQUE NOT NULL,
        name TEXT NOT NULL,
        meta TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        task_id TEXT PRIMARY KEY,
        task_name TEXT NOT NULL,
        prompt_text TEXT NOT NULL,
        task_group TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS outputs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        task_id TEXT NOT NULL REFERENCES tasks (task_id),
        model_key TEXT NOT NULL REFERENCES models (model_key),
        output_text TEXT NOT NULL,
        tokens INTEGER,
        length INTEGER,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (task_id, model_key)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS metrics (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        output_id INTEGER NOT NULL REFERENCES outputs (id),
        metric_name TEXT NOT NULL,
        metric_value REAL NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (output_id, metric_name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS imports (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        source_file TEXT NOT NULL,
        imported_at TEXT NOT NULL,
        notes TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_outputs_task_model ON outputs (task_id, model_key)",
    "CREATE INDEX IF NOT EXISTS idx_outputs_model ON outputs (model_key)",
    "CREATE INDEX IF NOT EXISTS idx_metrics_output ON metrics (output_id)",
    "CREATE INDEX IF NOT EXISTS idx_metrics_name ON metrics (metric_name)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_group ON tasks (task_group)",
];

/// Create every table and index that does not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    info!(statements = SCHEMA.len(), "Database schema initialized");
    Ok(())
}
