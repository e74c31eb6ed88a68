// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Relational entities of the leaderboard: tasks, outputs, metric facts
//! and import records.
//!
//! The schema is a star around [`Output`]: every output references one
//! [`Task`] and one [`crate::model::Model`], and owns zero or more
//! [`MetricFact`]s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Fixed category label partitioning tasks for grouped comparison.
///
/// The declaration order is significant: comparison views walk the groups
/// in exactly this order, and `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskGroup {
    /// Language tasks (country names, pangrams, haiku).
    LanguageTasks,
    /// Logic puzzles.
    LogicalReasoning,
    /// Questions answered from a supplied context.
    ContextUnderstanding,
    /// HTML, JavaScript and Python simulations.
    Programming,
    /// SVG drawing and animation.
    SvgGeneration,
    /// Deep research tasks.
    Research,
}

impl TaskGroup {
    /// Every group in declared order.
    pub const ALL: [TaskGroup; 6] = [
        TaskGroup::LanguageTasks,
        TaskGroup::LogicalReasoning,
        TaskGroup::ContextUnderstanding,
        TaskGroup::Programming,
        TaskGroup::SvgGeneration,
        TaskGroup::Research,
    ];

    /// Storage label of the group.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LanguageTasks => "language_tasks",
            Self::LogicalReasoning => "logical_reasoning",
            Self::ContextUnderstanding => "context_understanding",
            Self::Programming => "programming",
            Self::SvgGeneration => "svg_generation",
            Self::Research => "research",
        }
    }
}

impl fmt::Display for TaskGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskGroup {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|group| group.as_str() == label)
            .ok_or_else(|| CoreError::UnknownTaskGroup(label.to_string()))
    }
}

/// Names of the metrics a metric fact may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    /// Human evaluation, 0-10. The only authoritative metric.
    QualityScore,
    RougeL,
    BertScore,
    ExactMatch,
    Accuracy,
    F1Score,
    SemanticSimilarity,
}

impl MetricName {
    /// Every supported metric.
    pub const ALL: [MetricName; 7] = [
        MetricName::QualityScore,
        MetricName::RougeL,
        MetricName::BertScore,
        MetricName::ExactMatch,
        MetricName::Accuracy,
        MetricName::F1Score,
        MetricName::SemanticSimilarity,
    ];

    /// Metrics averaged by the leaderboard aggregation.
    pub const TRACKED: [MetricName; 3] = [
        MetricName::QualityScore,
        MetricName::RougeL,
        MetricName::BertScore,
    ];

    /// Storage label of the metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QualityScore => "quality_score",
            Self::RougeL => "rouge_l",
            Self::BertScore => "bert_score",
            Self::ExactMatch => "exact_match",
            Self::Accuracy => "accuracy",
            Self::F1Score => "f1_score",
            Self::SemanticSimilarity => "semantic_similarity",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|metric| metric.as_str() == s.trim())
            .ok_or_else(|| CoreError::UnknownMetric(s.trim().to_string()))
    }
}

/// An evaluation task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub task_name: String,
    pub prompt_text: String,
    /// Stored as free text; rows written by this crate always carry a
    /// valid [`TaskGroup`] label.
    pub task_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Parsed task group, if the stored label is one of the declared groups.
    pub fn group(&self) -> Option<TaskGroup> {
        self.task_group.as_deref().and_then(|g| g.parse().ok())
    }
}

/// A single model's response to a single task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    pub id: i64,
    pub task_id: String,
    pub model_key: String,
    pub output_text: String,
    pub tokens: Option<i64>,
    /// Character length of `output_text`.
    pub length: Option<i64>,
}

/// One named numeric measurement attached to an output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricFact {
    pub output_id: i64,
    pub metric_name: MetricName,
    pub metric_value: f64,
}

/// Metric values keyed by metric name, with every supported metric present.
///
/// Missing facts are `None` so that consumers see a stable shape.
pub type MetricValues = BTreeMap<MetricName, Option<f64>>;

/// Build a [`MetricValues`] map from the facts that exist.
pub fn metric_values<I>(facts: I) -> MetricValues
where
    I: IntoIterator<Item = (MetricName, f64)>,
{
    let mut values: MetricValues = MetricName::ALL.iter().map(|m| (*m, None)).collect();
    for (name, value) in facts {
        values.insert(name, Some(value));
    }
    values
}

/// Append-only audit entry for an import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub id: i64,
    pub source_file: String,
    pub imported_at: DateTime<Utc>,
    pub notes: Option<String>,
}
