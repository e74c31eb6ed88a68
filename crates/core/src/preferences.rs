// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-session view preferences: which leaderboard columns and which
//! filters a viewer has enabled.

use serde::{Deserialize, Serialize};

/// A toggleable column or filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewOption {
    pub key: &'static str,
    pub label: &'static str,
    pub enabled_by_default: bool,
    pub order: u8,
}

const fn opt(key: &'static str, label: &'static str, enabled_by_default: bool, order: u8) -> ViewOption {
    ViewOption {
        key,
        label,
        enabled_by_default,
        order,
    }
}

/// Leaderboard columns in display order.
pub const LEADERBOARD_COLUMNS: &[ViewOption] = &[
    opt("rank", "Rank", true, 1),
    opt("model", "Model", true, 2),
    opt("provider", "Provider", true, 3),
    opt("open_source", "Open Source", true, 4),
    opt("tags", "Tags", false, 5),
    opt("tasks", "Tasks", false, 6),
    opt("avg_tokens", "Avg Tokens", false, 7),
    opt("quality_score", "Quality Score", true, 8),
    opt("rouge_l", "ROUGE-L", false, 9),
    opt("bert_score", "BERTScore", false, 10),
    opt("reasoning", "Reasoning", true, 11),
    opt("parameters", "Parameters", true, 12),
    opt("context_window", "Context", true, 13),
    opt("image_input", "Image Input", true, 14),
    opt("release_date", "Release Date", false, 15),
    opt("input_price", "Input Price", false, 16),
    opt("output_price", "Output Price", false, 17),
    opt("actions", "Actions", true, 18),
];

/// Columns that cannot be switched off.
pub const REQUIRED_COLUMNS: &[&str] = &["rank", "model", "actions"];

/// Leaderboard filters in display order.
pub const FILTER_SETTINGS: &[ViewOption] = &[
    opt("provider", "Provider", true, 1),
    opt("open_source", "Open Source", true, 2),
    opt("reasoning", "Reasoning", false, 3),
    opt("image_input", "Image Input", false, 4),
    opt("task_group", "Task Group", true, 5),
    opt("language", "Language", false, 6),
    opt("tag", "Tag", false, 7),
    opt("parameters", "Parameters Range", false, 8),
    opt("context_window", "Context Window Range", false, 9),
    opt("release_date", "Release Date Range", false, 10),
];

/// A view option together with its state for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionState {
    pub key: &'static str,
    pub label: &'static str,
    pub order: u8,
    pub enabled: bool,
}

/// What one viewer has enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPreferences {
    pub enabled_columns: Vec<String>,
    pub enabled_filters: Vec<String>,
}

impl Default for ViewPreferences {
    fn default() -> Self {
        Self {
            enabled_columns: default_keys(LEADERBOARD_COLUMNS),
            enabled_filters: default_keys(FILTER_SETTINGS),
        }
    }
}

fn default_keys(options: &[ViewOption]) -> Vec<String> {
    options
        .iter()
        .filter(|o| o.enabled_by_default)
        .map(|o| o.key.to_string())
        .collect()
}

/// Keep known keys in their submitted order, drop duplicates and unknowns.
fn sanitize(keys: Vec<String>, options: &[ViewOption]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(keys.len());
    for key in keys {
        if options.iter().any(|o| o.key == key) && !kept.contains(&key) {
            kept.push(key);
        }
    }
    kept
}

impl ViewPreferences {
    /// Replace the enabled columns. Required columns are always appended
    /// if missing.
    pub fn set_columns(&mut self, columns: Vec<String>) {
        let mut columns = sanitize(columns, LEADERBOARD_COLUMNS);
        for required in REQUIRED_COLUMNS {
            if !columns.iter().any(|c| c == required) {
                columns.push(required.to_string());
            }
        }
        self.enabled_columns = columns;
    }

    pub fn set_filters(&mut self, filters: Vec<String>) {
        self.enabled_filters = sanitize(filters, FILTER_SETTINGS);
    }

    pub fn reset_columns(&mut self) {
        self.enabled_columns = default_keys(LEADERBOARD_COLUMNS);
    }

    pub fn reset_filters(&mut self) {
        self.enabled_filters = default_keys(FILTER_SETTINGS);
    }

    /// Enabled columns with labels, in display order.
    pub fn visible_columns(&self) -> Vec<ViewOption> {
        LEADERBOARD_COLUMNS
            .iter()
            .filter(|o| self.enabled_columns.iter().any(|c| c == o.key))
            .copied()
            .collect()
    }

    /// Every column with its state for this session.
    pub fn column_states(&self) -> Vec<OptionState> {
        states(LEADERBOARD_COLUMNS, &self.enabled_columns)
    }

    /// Every filter with its state for this session.
    pub fn filter_states(&self) -> Vec<OptionState> {
        states(FILTER_SETTINGS, &self.enabled_filters)
    }
}

fn states(options: &[ViewOption], enabled: &[String]) -> Vec<OptionState> {
    options
        .iter()
        .map(|o| OptionState {
            key: o.key,
            label: o.label,
            order: o.order,
            enabled: enabled.iter().any(|e| e == o.key),
        })
        .collect()
}
