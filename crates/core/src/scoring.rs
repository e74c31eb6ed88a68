// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quality-score rules: the accepted range and the set of tasks left out of
//! quality averages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

use crate::types::MetricName;

/// Lowest accepted quality score.
pub const QUALITY_MIN: f64 = 0.0;
/// Highest accepted quality score.
pub const QUALITY_MAX: f64 = 10.0;

/// Task ids excluded from quality-score averages by default.
///
/// The deep research task is unsupported by most models; their zero scores
/// would drag capable models down in every quality comparison.
pub const DEFAULT_EXCLUDED_TASKS: &[&str] = &["research_018"];

/// Tasks whose quality scores are ignored when averaging.
///
/// Other metrics of these tasks still count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityExclusions {
    task_ids: BTreeSet<String>,
}

impl QualityExclusions {
    /// Exclusion set from explicit task ids.
    pub fn new<I, S>(task_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            task_ids: task_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Exclusion set that keeps every task.
    pub fn none() -> Self {
        Self {
            task_ids: BTreeSet::new(),
        }
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.task_ids.contains(task_id)
    }

    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    /// Excluded ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.task_ids.iter().map(String::as_str)
    }
}

impl Default for QualityExclusions {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_TASKS.iter().copied())
    }
}

/// Validate a human quality score and round it to one decimal.
///
/// Out-of-range or non-finite scores are dropped with a warning.
pub fn normalize_quality_score(score: f64) -> Option<f64> {
    if !score.is_finite() || !(QUALITY_MIN..=QUALITY_MAX).contains(&score) {
        warn!(score, "Quality score out of range (0-10), skipping");
        return None;
    }
    Some((score * 10.0).round() / 10.0)
}

/// Metric facts to write for one imported output.
///
/// Only the human quality score is recorded; no synthetic metrics are
/// generated.
pub fn metrics_for_output(quality_score: Option<f64>) -> Vec<(MetricName, f64)> {
    quality_score
        .and_then(normalize_quality_score)
        .map(|score| vec![(MetricName::QualityScore, score)])
        .unwrap_or_default()
}
