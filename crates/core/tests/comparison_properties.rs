//! End-to-end checks of the filter evaluator and comparison windowing
//! through the public API.

use std::collections::BTreeMap;

use llm_leaderboard_core::filter::RangeFilter;
use llm_leaderboard_core::window::{compare_groups, select_window, DEFAULT_GROUP_LIMIT};
use llm_leaderboard_core::{
    Magnitude, MetadataFilter, ModelCatalog, ModelMeta, RankedEntry, TaskGroup,
};

fn ranked(n: usize) -> Vec<RankedEntry> {
    (0..n)
        .map(|i| RankedEntry::from_aggregate(format!("llm-{i:03}"), format!("Model {i}"), Some(100.0 - i as f64), Some(4)))
        .collect()
}

#[test]
fn window_of_twenty_around_index_ten() {
    let list = ranked(20);
    let window = select_window(&list, Some("llm-010")).unwrap();

    let keys: Vec<_> = window.models.iter().map(|e| e.model_key.clone()).collect();
    let expected: Vec<_> = (7..=14).map(|i| format!("llm-{i:03}")).collect();
    assert_eq!(keys, expected);
    assert_eq!(window.target_index, Some(3));
}

#[test]
fn window_at_ends_redistributes() {
    let list = ranked(10);

    let head = select_window(&list, Some("llm-000")).unwrap();
    assert_eq!(head.models.len(), 8);
    assert_eq!(head.target_index, Some(0));

    let tail = select_window(&list, Some("llm-009")).unwrap();
    assert_eq!(tail.models.len(), 8);
    assert_eq!(tail.target_index, Some(7));
    assert_eq!(tail.models[0].model_key, "llm-002");
}

#[test]
fn window_of_short_list_is_whole_list() {
    let list = ranked(6);
    let window = select_window(&list, Some("llm-004")).unwrap();
    assert_eq!(window.models, list);
    assert_eq!(window.target_index, Some(4));
}

#[test]
fn comparison_skips_groups_lacking_the_target() {
    let mut groups = BTreeMap::new();
    groups.insert(TaskGroup::LanguageTasks, ranked(9));
    groups.insert(TaskGroup::LogicalReasoning, ranked(2));
    groups.insert(TaskGroup::Programming, Vec::new());

    let comparison = compare_groups(groups, Some("llm-005"), DEFAULT_GROUP_LIMIT);
    assert_eq!(comparison.keys().copied().collect::<Vec<_>>(), vec![TaskGroup::LanguageTasks]);

    let keys: Vec<_> = comparison[&TaskGroup::LanguageTasks]
        .models
        .iter()
        .map(|e| e.model_key.clone())
        .collect();
    let expected: Vec<_> = (1..=8).map(|i| format!("llm-{i:03}")).collect();
    assert_eq!(keys, expected);

    let payload = serde_json::to_value(&comparison).unwrap();
    assert_eq!(payload["language_tasks"]["target_index"], 4);
    assert_eq!(payload["language_tasks"]["target_model"]["model_key"], "llm-005");
}

#[test]
fn empty_filter_is_identity_over_catalog() {
    let catalog = ModelCatalog::from_toml_str(include_str!("../../../config/models.toml")).unwrap();
    let filter = MetadataFilter::default();
    assert_eq!(catalog.filter(&filter).count(), catalog.len());
}

#[test]
fn range_boundaries_are_inclusive_for_suffixed_values() {
    let meta = ModelMeta {
        parameters: Some(Magnitude::Text("355B".into())),
        context_window: Some(Magnitude::Integer(128)),
        ..Default::default()
    };
    let filter = MetadataFilter {
        parameters: RangeFilter::between(355, 1000),
        context_window: RangeFilter::between(64, 128),
        ..Default::default()
    };
    assert!(filter.matches(&meta));
}
