// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Leaderboard snapshot types.

use chrono::{DateTime, Utc};
use llm_leaderboard_core::{ComparisonWindow, LeaderboardQuery, LeaderboardRow, SortKey, TaskGroup};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The leaderboard and group comparison as they stood at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
    /// When the snapshot was taken.
    pub generated_at: DateTime<Utc>,
    /// Task group the aggregation was restricted to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_group: Option<TaskGroup>,
    /// Ordering of `rows`.
    pub sort_by: SortKey,
    /// Aggregated rows, already filtered and sorted.
    pub rows: Vec<LeaderboardRow>,
    /// Per-group comparison windows.
    #[serde(default)]
    pub comparison: BTreeMap<TaskGroup, ComparisonWindow>,
}

impl LeaderboardSnapshot {
    /// Create a snapshot for rows produced by `query`.
    pub fn new(
        query: &LeaderboardQuery,
        rows: Vec<LeaderboardRow>,
        comparison: BTreeMap<TaskGroup, ComparisonWindow>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            task_group: query.task_group,
            sort_by: query.sort_by,
            rows,
            comparison,
        }
    }

    /// Rows that have at least one scored task.
    pub fn ranked_rows(&self) -> impl Iterator<Item = &LeaderboardRow> {
        self.rows.iter().filter(|r| r.task_count > 0)
    }
}
