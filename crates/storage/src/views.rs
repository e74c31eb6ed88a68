// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Read models returned by the store.

use llm_leaderboard_core::{MetricValues, Model, ModelMeta, Output};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An output shown side by side with other models' outputs for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputView {
    #[serde(flatten)]
    pub output: Output,
    pub model_name: String,
    pub model_meta: ModelMeta,
    pub metrics: MetricValues,
}

/// One task's figures for a single model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTaskScore {
    pub task_id: String,
    pub task_name: String,
    pub task_group: Option<String>,
    pub tokens: Option<i64>,
    pub metrics: MetricValues,
}

/// A model with its per-task results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDetails {
    #[serde(flatten)]
    pub model: Model,
    pub tasks: Vec<ModelTaskScore>,
}

/// Result of a completed import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub import_id: i64,
    pub source_file: String,
    pub tasks_inserted: usize,
    pub outputs_inserted: usize,
    pub metrics_inserted: usize,
    pub skipped_rows: usize,
    pub warnings: Vec<String>,
}

impl ImportSummary {
    /// Free-text note stored in the import log.
    pub fn notes(&self) -> String {
        format!(
            "Imported {} tasks, {} outputs, {} metrics",
            self.tasks_inserted, self.outputs_inserted, self.metrics_inserted
        )
    }
}

/// Rows removed by a delete or reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedCounts {
    pub tasks: u64,
    pub outputs: u64,
    pub metrics: u64,
    pub imports: u64,
}

/// Table sizes and task distribution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub models: i64,
    pub tasks: i64,
    pub outputs: i64,
    pub metrics: i64,
    pub imports: i64,
    /// Tasks per group label; tasks without a group are under `"none"`.
    pub task_groups: BTreeMap<String, i64>,
}
