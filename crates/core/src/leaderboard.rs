// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Leaderboard rows and the in-memory pass that follows aggregation.
//!
//! The storage layer aggregates outputs per model (optionally restricted to
//! one task group). Everything that depends on model metadata happens here,
//! after aggregation: metadata filtering and null-safe ordering.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::filter::{param_str, MetadataFilter};
use crate::model::ModelMeta;
use crate::types::TaskGroup;

/// Aggregated figures for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub model_key: String,
    pub name: String,
    pub meta: ModelMeta,
    /// Distinct tasks with an output in scope.
    pub task_count: i64,
    pub avg_tokens: Option<f64>,
    /// Average output length in characters.
    pub avg_length: Option<f64>,
    /// Excludes tasks in the quality exclusion set.
    pub avg_quality_score: Option<f64>,
    pub avg_rouge_l: Option<f64>,
    pub avg_bert_score: Option<f64>,
}

impl LeaderboardRow {
    /// Value of the given sort column; `None` sorts last.
    pub fn sort_value(&self, key: SortKey) -> Option<f64> {
        match key {
            SortKey::AvgQualityScore => self.avg_quality_score,
            SortKey::AvgRougeL => self.avg_rouge_l,
            SortKey::AvgBertScore => self.avg_bert_score,
            SortKey::AvgTokens => self.avg_tokens,
            SortKey::TaskCount => Some(self.task_count as f64),
        }
    }
}

/// Allow-listed sort columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    AvgQualityScore,
    AvgRougeL,
    AvgBertScore,
    AvgTokens,
    TaskCount,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::AvgQualityScore,
        SortKey::AvgRougeL,
        SortKey::AvgBertScore,
        SortKey::AvgTokens,
        SortKey::TaskCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AvgQualityScore => "avg_quality_score",
            Self::AvgRougeL => "avg_rouge_l",
            Self::AvgBertScore => "avg_bert_score",
            Self::AvgTokens => "avg_tokens",
            Self::TaskCount => "task_count",
        }
    }

    /// Parse a requested column, falling back to the default for anything
    /// outside the allow-list.
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            debug!(sort_by = raw, "Unknown sort key, using avg_quality_score");
            SortKey::default()
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| format!("unsupported sort key: {}", s))
    }
}

/// Everything needed to produce a leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardQuery {
    /// Restricts aggregation to outputs of this group. Applied in SQL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_group: Option<TaskGroup>,
    #[serde(default)]
    pub sort_by: SortKey,
    /// Applied in memory after aggregation.
    #[serde(default)]
    pub filter: MetadataFilter,
}

impl LeaderboardQuery {
    /// Build a query from request parameters.
    ///
    /// An unknown task group is ignored like any other malformed filter.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let task_group = param_str(params, "task_group").and_then(|raw| match raw.parse() {
            Ok(group) => Some(group),
            Err(_) => {
                debug!(task_group = %raw, "Ignoring unknown task group filter");
                None
            }
        });
        let sort_by = param_str(params, "sort_by")
            .map(|raw| SortKey::parse_or_default(&raw))
            .unwrap_or_default();

        Self {
            task_group,
            sort_by,
            filter: MetadataFilter::from_params(params),
        }
    }
}

/// Descending comparison with `None` (and NaN) always last.
pub fn compare_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    let a = a.filter(|v| !v.is_nan());
    let b = b.filter(|v| !v.is_nan());
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort rows by `key`, descending and null-safe. Ties keep input order.
pub fn sort_rows(rows: &mut [LeaderboardRow], key: SortKey) {
    rows.sort_by(|a, b| compare_desc(a.sort_value(key), b.sort_value(key)));
}

/// Apply the metadata filter pass and the requested ordering to
/// aggregated rows.
pub fn finalize_rows(rows: Vec<LeaderboardRow>, query: &LeaderboardQuery) -> Vec<LeaderboardRow> {
    let total = rows.len();
    let mut kept: Vec<LeaderboardRow> = rows
        .into_iter()
        .filter(|row| query.filter.matches(&row.meta))
        .collect();
    sort_rows(&mut kept, query.sort_by);

    debug!(
        total,
        kept = kept.len(),
        sort_by = %query.sort_by,
        "Leaderboard rows finalized"
    );
    kept
}
