use std::collections::BTreeMap;

use llm_leaderboard_core::{LeaderboardQuery, LeaderboardRow, ModelMeta, SortKey, TaskGroup};
use llm_leaderboard_reports::{io, LeaderboardSnapshot};

fn sample() -> LeaderboardSnapshot {
    let query = LeaderboardQuery {
        task_group: Some(TaskGroup::Research),
        sort_by: SortKey::TaskCount,
        ..Default::default()
    };
    let row = LeaderboardRow {
        model_key: "llm-001".into(),
        name: "First".into(),
        meta: ModelMeta::default(),
        task_count: 3,
        avg_tokens: Some(512.0),
        avg_length: Some(2048.0),
        avg_quality_score: Some(8.25),
        avg_rouge_l: None,
        avg_bert_score: None,
    };
    LeaderboardSnapshot::new(&query, vec![row], BTreeMap::new())
}

#[test]
fn writes_all_report_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested");
    let paths = io::write_all_outputs(&sample(), &out).unwrap();

    assert!(paths.snapshot.ends_with(io::SNAPSHOT_FILE));
    assert!(paths.summary.exists());
    assert!(paths.comparison.exists());

    let summary = std::fs::read_to_string(&paths.summary).unwrap();
    assert!(summary.contains("Task group: research"));
    assert!(summary.contains("Sorted by: task_count"));
}

#[test]
fn snapshot_survives_a_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(io::SNAPSHOT_FILE);
    let snapshot = sample();

    io::write_snapshot_json(&snapshot, &path).unwrap();
    assert_eq!(io::read_snapshot_json(&path).unwrap(), snapshot);
}

#[test]
fn reading_garbage_is_invalid_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = io::read_snapshot_json(&path).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}
