// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Comparison windowing.
//!
//! Given models ranked by score within a task group, select a small
//! neighborhood for side-by-side display:
//!
//! ```text
//! no target           -> top 5
//! target at index i   -> up to 8 entries: 3 before, 4 after,
//!                        shortfall on one side moved to the other
//! target not ranked   -> group omitted
//! ```
//!
//! Everything here is pure; identical inputs give identical windows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::leaderboard::compare_desc;
use crate::types::TaskGroup;

/// Entries returned when no target is requested.
pub const TOP_WITHOUT_TARGET: usize = 5;
/// Neighbors shown around a target (window size minus one).
pub const NEIGHBORS: usize = 7;
/// Nominal neighbors ranked above the target.
pub const NOMINAL_BEFORE: usize = 3;
/// Nominal neighbors ranked below the target.
pub const NOMINAL_AFTER: usize = 4;
/// Default number of task groups in a comparison.
pub const DEFAULT_GROUP_LIMIT: usize = 5;

/// One model's standing within a task group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub model_key: String,
    pub name: String,
    pub avg_score: f64,
    /// Outputs backing the score.
    pub task_count: i64,
}

impl RankedEntry {
    /// Build an entry from raw aggregate values, coercing missing or
    /// malformed numbers to zero.
    pub fn from_aggregate(
        model_key: impl Into<String>,
        name: impl Into<String>,
        avg_score: Option<f64>,
        task_count: Option<i64>,
    ) -> Self {
        Self {
            model_key: model_key.into(),
            name: name.into(),
            avg_score: avg_score.filter(|v| v.is_finite()).unwrap_or(0.0),
            task_count: task_count.unwrap_or(0).max(0),
        }
    }
}

/// Neighborhood selected from one group's ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonWindow {
    pub models: Vec<RankedEntry>,
    pub target_model: Option<RankedEntry>,
    /// Position of the target inside `models`.
    pub target_index: Option<usize>,
}

/// Window bounds as computed by [`window_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    /// First index (inclusive) in the ranked list.
    pub start: usize,
    /// Last index (exclusive) in the ranked list.
    pub end: usize,
    /// Target position relative to `start`.
    pub target_offset: usize,
}

/// Compute the window around `target_index` in a list of `len` entries.
///
/// Starts from 3 before / 4 after. If that yields fewer than 7 neighbors,
/// the side that ran short hands its remainder to the other side, bounded
/// by the list.
pub fn window_bounds(len: usize, target_index: usize) -> WindowBounds {
    debug_assert!(target_index < len);
    let available_after = len - target_index - 1;

    let mut before = NOMINAL_BEFORE.min(target_index);
    let mut after = NOMINAL_AFTER.min(available_after);

    if before + after < NEIGHBORS {
        if before < NOMINAL_BEFORE {
            after = (NEIGHBORS - before).min(available_after);
        } else if after < NOMINAL_AFTER {
            before = (NEIGHBORS - after).min(target_index);
        }
    }

    let start = target_index - before;
    WindowBounds {
        start,
        end: target_index + after + 1,
        target_offset: target_index - start,
    }
}

/// Select the comparison window from a ranking sorted by descending score.
///
/// Returns `None` when the ranking is empty or the target is not in it.
pub fn select_window(ranked: &[RankedEntry], target: Option<&str>) -> Option<ComparisonWindow> {
    if ranked.is_empty() {
        return None;
    }

    let Some(target_key) = target else {
        return Some(ComparisonWindow {
            models: ranked.iter().take(TOP_WITHOUT_TARGET).cloned().collect(),
            target_model: None,
            target_index: None,
        });
    };

    let index = ranked.iter().position(|e| e.model_key == target_key)?;
    let bounds = window_bounds(ranked.len(), index);

    Some(ComparisonWindow {
        models: ranked[bounds.start..bounds.end].to_vec(),
        target_model: Some(ranked[index].clone()),
        target_index: Some(bounds.target_offset),
    })
}

/// Order entries by descending score. Equal scores keep input order.
pub fn rank_entries(entries: &mut [RankedEntry]) {
    entries.sort_by(|a, b| compare_desc(Some(a.avg_score), Some(b.avg_score)));
}

/// Build comparison windows for the first `limit_groups` declared task
/// groups.
///
/// Groups without data, or whose ranking lacks the target, are omitted.
/// Omitted groups are not replaced by later ones.
pub fn compare_groups(
    mut entries_by_group: BTreeMap<TaskGroup, Vec<RankedEntry>>,
    target: Option<&str>,
    limit_groups: usize,
) -> BTreeMap<TaskGroup, ComparisonWindow> {
    let mut comparison = BTreeMap::new();

    for group in TaskGroup::ALL.iter().take(limit_groups) {
        let Some(mut entries) = entries_by_group.remove(group) else {
            debug!(task_group = %group, "No ranked entries for group, omitting");
            continue;
        };
        rank_entries(&mut entries);

        match select_window(&entries, target) {
            Some(window) => {
                comparison.insert(*group, window);
            }
            None => {
                debug!(
                    task_group = %group,
                    target = ?target,
                    ranked = entries.len(),
                    "Target not ranked in group, omitting"
                );
            }
        }
    }

    comparison
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking(n: usize) -> Vec<RankedEntry> {
        (0..n)
            .map(|i| RankedEntry {
                model_key: format!("m{i}"),
                name: format!("Model {i}"),
                avg_score: 10.0 - i as f64 * 0.1,
                task_count: 3,
            })
            .collect()
    }

    fn keys(window: &ComparisonWindow) -> Vec<&str> {
        window.models.iter().map(|e| e.model_key.as_str()).collect()
    }

    #[test]
    fn test_no_target_returns_top_five() {
        let ranked = ranking(9);
        let window = select_window(&ranked, None).unwrap();
        assert_eq!(keys(&window), vec!["m0", "m1", "m2", "m3", "m4"]);
        assert_eq!(window.target_model, None);
        assert_eq!(window.target_index, None);
    }

    #[test]
    fn test_target_in_middle() {
        let ranked = ranking(20);
        let window = select_window(&ranked, Some("m10")).unwrap();
        assert_eq!(window.models.len(), 8);
        assert_eq!(window.models.first().unwrap().model_key, "m7");
        assert_eq!(window.models.last().unwrap().model_key, "m14");
        assert_eq!(window.target_index, Some(3));
        assert_eq!(window.target_model.unwrap().model_key, "m10");
    }

    #[test]
    fn test_target_at_head_shifts_to_following() {
        let ranked = ranking(20);
        let window = select_window(&ranked, Some("m0")).unwrap();
        assert_eq!(keys(&window), vec!["m0", "m1", "m2", "m3", "m4", "m5", "m6", "m7"]);
        assert_eq!(window.target_index, Some(0));
    }

    #[test]
    fn test_target_at_tail_shifts_to_preceding() {
        let ranked = ranking(20);
        let window = select_window(&ranked, Some("m19")).unwrap();
        assert_eq!(window.models.len(), 8);
        assert_eq!(window.models.first().unwrap().model_key, "m12");
        assert_eq!(window.target_index, Some(7));
    }

    #[test]
    fn test_near_head_takes_extra_after() {
        let bounds = window_bounds(20, 1);
        assert_eq!((bounds.start, bounds.end, bounds.target_offset), (0, 8, 1));
    }

    #[test]
    fn test_near_tail_takes_extra_before() {
        let bounds = window_bounds(20, 17);
        assert_eq!((bounds.start, bounds.end, bounds.target_offset), (12, 20, 5));
    }

    #[test]
    fn test_short_list_returns_everything() {
        let ranked = ranking(5);
        for (i, entry) in ranked.iter().enumerate() {
            let window = select_window(&ranked, Some(&entry.model_key)).unwrap();
            assert_eq!(window.models.len(), 5);
            assert_eq!(window.target_index, Some(i));
        }
    }

    #[test]
    fn test_every_position_of_long_list_yields_eight() {
        let ranked = ranking(12);
        for (i, entry) in ranked.iter().enumerate() {
            let window = select_window(&ranked, Some(&entry.model_key)).unwrap();
            assert_eq!(window.models.len(), 8, "target index {i}");
            let offset = window.target_index.unwrap();
            assert_eq!(window.models[offset].model_key, entry.model_key);
        }
    }

    #[test]
    fn test_missing_target_or_empty_ranking() {
        assert_eq!(select_window(&ranking(10), Some("nope")), None);
        assert_eq!(select_window(&[], None), None);
    }

    #[test]
    fn test_from_aggregate_coerces_missing_values() {
        let entry = RankedEntry::from_aggregate("m", "M", None, None);
        assert_eq!(entry.avg_score, 0.0);
        assert_eq!(entry.task_count, 0);

        let entry = RankedEntry::from_aggregate("m", "M", Some(f64::INFINITY), Some(-2));
        assert_eq!(entry.avg_score, 0.0);
        assert_eq!(entry.task_count, 0);
    }

    #[test]
    fn test_compare_groups_respects_declared_order_and_limit() {
        let mut by_group = BTreeMap::new();
        by_group.insert(TaskGroup::Research, ranking(3));
        by_group.insert(TaskGroup::LanguageTasks, ranking(3));
        by_group.insert(TaskGroup::Programming, ranking(30));

        let comparison = compare_groups(by_group, None, 2);
        assert_eq!(
            comparison.keys().copied().collect::<Vec<_>>(),
            vec![TaskGroup::LanguageTasks]
        );
    }

    #[test]
    fn test_compare_groups_omits_groups_without_target() {
        let mut by_group = BTreeMap::new();
        by_group.insert(TaskGroup::LanguageTasks, ranking(4));
        by_group.insert(TaskGroup::LogicalReasoning, ranking(10));

        let comparison = compare_groups(by_group, Some("m7"), DEFAULT_GROUP_LIMIT);
        assert_eq!(comparison.len(), 1);
        assert!(comparison.contains_key(&TaskGroup::LogicalReasoning));
    }

    #[test]
    fn test_compare_groups_ranks_unsorted_input() {
        let mut entries = ranking(3);
        entries.reverse();
        let mut by_group = BTreeMap::new();
        by_group.insert(TaskGroup::Programming, entries);

        let comparison = compare_groups(by_group, None, DEFAULT_GROUP_LIMIT);
        let window = &comparison[&TaskGroup::Programming];
        assert_eq!(keys(window), vec!["m0", "m1", "m2"]);
    }

    #[test]
    fn test_windowing_is_idempotent() {
        let ranked = ranking(15);
        let first = select_window(&ranked, Some("m6"));
        let second = select_window(&ranked, Some("m6"));
        assert_eq!(first, second);
    }
}
