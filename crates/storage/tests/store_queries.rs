//! Store behavior against an in-memory SQLite database.

use std::collections::HashMap;

use llm_leaderboard_core::ingest::{parse_csv, ColumnMapping};
use llm_leaderboard_core::{
    LeaderboardQuery, MetadataFilter, MetricName, ModelCatalog, QualityExclusions, SortKey,
    TaskGroup,
};
use llm_leaderboard_storage::{ImportOptions, LeaderboardStore, StorageError};

const CATALOG: &str = r#"
[models.alpha]
name = "Alpha"
provider = "OpenAI"
parameters = "200B"
open_source = false

[models.beta]
name = "Beta"
provider = "Meta"
parameters = 70
open_source = true

[models.gamma]
name = "Gamma"
provider = "Meta"
open_source = true
"#;

const RESULTS: &str = "\
task_id,task_name,prompt_text,task_group,model_key,output_text,tokens,quality_score
t1,Task 1,Prompt 1,language_tasks,alpha,Alpha on t1,10,8
t2,Task 2,Prompt 2,language_tasks,alpha,Alpha on t2,20,6
research_018,Deep research,Prompt 3,research,alpha,Alpha research,30,1
t1,Task 1,Prompt 1,language_tasks,beta,Beta on t1,40,5
t3,Task 3,Prompt 4,logical_reasoning,beta,Beta on t3,,12
";

async fn seeded_store() -> (LeaderboardStore, ModelCatalog) {
    let catalog = ModelCatalog::from_toml_str(CATALOG).unwrap();
    let store = LeaderboardStore::in_memory(QualityExclusions::default()).await.unwrap();
    store.sync_models(&catalog).await.unwrap();

    let batch = parse_csv(RESULTS, &ColumnMapping::default(), &catalog).unwrap();
    store
        .import_batch("results.csv", &batch, ImportOptions::default())
        .await
        .unwrap();
    (store, catalog)
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[tokio::test]
async fn excluded_task_only_leaves_quality_average() {
    let (store, _) = seeded_store().await;
    let rows = store.leaderboard(&LeaderboardQuery::default()).await.unwrap();

    let alpha = rows.iter().find(|r| r.model_key == "alpha").unwrap();
    assert_eq!(alpha.task_count, 3);
    assert_eq!(alpha.avg_quality_score, Some(7.0));
    assert_eq!(alpha.avg_tokens, Some(20.0));
}

#[tokio::test]
async fn model_without_outputs_is_listed_with_zero_tasks() {
    let (store, _) = seeded_store().await;
    let rows = store.leaderboard(&LeaderboardQuery::default()).await.unwrap();

    let gamma = rows.iter().find(|r| r.model_key == "gamma").unwrap();
    assert_eq!(gamma.task_count, 0);
    assert_eq!(gamma.avg_quality_score, None);
    assert_eq!(gamma.avg_tokens, None);
    assert_eq!(rows.last().unwrap().model_key, "gamma");
}

#[tokio::test]
async fn out_of_range_scores_are_not_written() {
    let (store, _) = seeded_store().await;
    let rows = store.leaderboard(&LeaderboardQuery::default()).await.unwrap();

    let beta = rows.iter().find(|r| r.model_key == "beta").unwrap();
    assert_eq!(beta.task_count, 2);
    assert_eq!(beta.avg_quality_score, Some(5.0));
    assert_eq!(beta.avg_tokens, Some(40.0));
}

#[tokio::test]
async fn task_group_scopes_the_aggregation() {
    let (store, _) = seeded_store().await;
    let query = LeaderboardQuery {
        task_group: Some(TaskGroup::LogicalReasoning),
        ..Default::default()
    };
    let rows = store.leaderboard(&query).await.unwrap();

    assert_eq!(rows.len(), 3);
    let alpha = rows.iter().find(|r| r.model_key == "alpha").unwrap();
    assert_eq!(alpha.task_count, 0);
    let beta = rows.iter().find(|r| r.model_key == "beta").unwrap();
    assert_eq!(beta.task_count, 1);
    assert_eq!(beta.avg_quality_score, None);
}

#[tokio::test]
async fn metadata_filters_run_after_aggregation() {
    let (store, _) = seeded_store().await;
    let query = LeaderboardQuery::from_params(&params(&[("provider", "Meta"), ("sort_by", "task_count")]));
    assert_eq!(query.sort_by, SortKey::TaskCount);

    let rows = store.leaderboard(&query).await.unwrap();
    let keys: Vec<_> = rows.iter().map(|r| r.model_key.as_str()).collect();
    assert_eq!(keys, vec!["beta", "gamma"]);
}

#[tokio::test]
async fn reimport_keeps_one_fact_per_metric() {
    let (store, catalog) = seeded_store().await;
    let batch = parse_csv(RESULTS, &ColumnMapping::default(), &catalog).unwrap();
    store
        .import_batch("results.csv", &batch, ImportOptions::default())
        .await
        .unwrap();

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.outputs, 5);
    assert_eq!(stats.metrics, 4);
    assert_eq!(stats.imports, 2);

    let outputs = store.task_outputs("t1", &[]).await.unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].output.model_key, "alpha");
    assert_eq!(outputs[0].metrics[&MetricName::QualityScore], Some(8.0));
    assert_eq!(outputs[0].metrics[&MetricName::RougeL], None);
}

#[tokio::test]
async fn import_without_scores_clears_previous_facts() {
    let (store, catalog) = seeded_store().await;
    let batch = parse_csv(RESULTS, &ColumnMapping::default(), &catalog).unwrap();
    let summary = store
        .import_batch("results.csv", &batch, ImportOptions { record_scores: false })
        .await
        .unwrap();

    assert_eq!(summary.metrics_inserted, 0);
    assert_eq!(store.stats().await.unwrap().metrics, 0);
}

#[tokio::test]
async fn import_summary_is_logged() {
    let (store, _) = seeded_store().await;
    let imports = store.imports().await.unwrap();

    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].source_file, "results.csv");
    assert_eq!(imports[0].notes.as_deref(), Some("Imported 4 tasks, 5 outputs, 4 metrics"));
}

#[tokio::test]
async fn repeated_pairs_count_once() {
    let catalog = ModelCatalog::from_toml_str(CATALOG).unwrap();
    let store = LeaderboardStore::in_memory(QualityExclusions::default()).await.unwrap();
    store.sync_models(&catalog).await.unwrap();

    let csv = "\
task_id,task_name,prompt_text,task_group,model_key,output_text,tokens,quality_score
t1,Task 1,Prompt 1,programming,alpha,first,5,4
t1,Task 1,Prompt 1,programming,alpha,second,6,9
";
    let batch = parse_csv(csv, &ColumnMapping::default(), &catalog).unwrap();
    let summary = store
        .import_batch("dupes.csv", &batch, ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.outputs_inserted, 1);
    assert_eq!(summary.metrics_inserted, 1);
    assert!(summary.warnings.iter().any(|w| w.contains("Duplicate")));

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.outputs, 1);
    assert_eq!(stats.metrics, 1);

    let outputs = store.task_outputs("t1", &[]).await.unwrap();
    assert_eq!(outputs[0].output.output_text, "second");
    assert_eq!(outputs[0].metrics[&MetricName::QualityScore], Some(9.0));

    let imports = store.imports().await.unwrap();
    assert_eq!(imports[0].notes.as_deref(), Some("Imported 1 tasks, 1 outputs, 1 metrics"));
}

#[tokio::test]
async fn hand_built_batch_with_repeats_counts_written_rows() {
    let catalog = ModelCatalog::from_toml_str(CATALOG).unwrap();
    let store = LeaderboardStore::in_memory(QualityExclusions::default()).await.unwrap();
    store.sync_models(&catalog).await.unwrap();

    let mut batch = parse_csv(RESULTS, &ColumnMapping::default(), &catalog).unwrap();
    let mut repeat = batch.outputs[0].clone();
    repeat.quality_score = Some(3.0);
    batch.outputs.push(repeat);

    let summary = store
        .import_batch("results.csv", &batch, ImportOptions::default())
        .await
        .unwrap();
    assert_eq!(summary.outputs_inserted, 5);
    assert_eq!(summary.metrics_inserted, 4);

    let outputs = store.task_outputs("t1", &["alpha".to_string()]).await.unwrap();
    assert_eq!(outputs[0].metrics[&MetricName::QualityScore], Some(3.0));
}

#[tokio::test]
async fn task_outputs_can_be_limited_to_models() {
    let (store, _) = seeded_store().await;
    let outputs = store.task_outputs("t1", &["beta".to_string()]).await.unwrap();

    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].model_name, "Beta");
    assert_eq!(outputs[0].output.length, Some(10));
}

#[tokio::test]
async fn model_details_list_every_task() {
    let (store, _) = seeded_store().await;
    let details = store.model_details("alpha").await.unwrap().unwrap();

    let tasks: Vec<_> = details.tasks.iter().map(|t| t.task_id.as_str()).collect();
    assert_eq!(tasks, vec!["research_018", "t1", "t2"]);
    assert!(store.model_details("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn group_comparison_centers_on_target() {
    let (store, _) = seeded_store().await;
    let comparison = store.task_group_performance(Some("beta"), 5).await.unwrap();

    let groups: Vec<_> = comparison.keys().copied().collect();
    assert_eq!(groups, vec![TaskGroup::LanguageTasks, TaskGroup::LogicalReasoning]);

    let language = &comparison[&TaskGroup::LanguageTasks];
    assert_eq!(language.models[0].model_key, "alpha");
    assert_eq!(language.models[0].avg_score, 7.0);
    assert_eq!(language.target_index, Some(1));

    let logic = &comparison[&TaskGroup::LogicalReasoning];
    assert_eq!(logic.models[0].avg_score, 0.0);
}

#[tokio::test]
async fn group_comparison_skips_excluded_only_groups() {
    let (store, _) = seeded_store().await;
    let comparison = store.task_group_performance(None, 6).await.unwrap();

    assert!(!comparison.contains_key(&TaskGroup::Research));
    assert_eq!(comparison[&TaskGroup::LanguageTasks].target_index, None);
}

#[tokio::test]
async fn comparison_for_unknown_model_is_not_found() {
    let (store, _) = seeded_store().await;
    let err = store.task_group_performance(Some("nope"), 5).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { entity: "Model", .. }));
}

#[tokio::test]
async fn delete_task_removes_dependents() {
    let (store, _) = seeded_store().await;
    let deleted = store.delete_task("t1").await.unwrap();

    assert_eq!(deleted.tasks, 1);
    assert_eq!(deleted.outputs, 2);
    assert_eq!(deleted.metrics, 2);
    assert!(store.task("t1").await.unwrap().is_none());

    let err = store.delete_task("t1").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn delete_group_and_reset() {
    let (store, _) = seeded_store().await;

    let deleted = store.delete_task_group(TaskGroup::Research).await.unwrap();
    assert_eq!(deleted.tasks, 1);
    assert_eq!(store.tasks(Some(TaskGroup::Research)).await.unwrap().len(), 0);
    assert_eq!(store.tasks(None).await.unwrap().len(), 3);

    let reset = store.reset_tasks().await.unwrap();
    assert_eq!(reset.tasks, 3);
    assert_eq!(reset.imports, 1);

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.models, 3);
    assert_eq!(stats.tasks, 0);
    assert!(stats.task_groups.is_empty());
}

#[tokio::test]
async fn stats_count_tasks_per_group() {
    let (store, _) = seeded_store().await;
    let stats = store.stats().await.unwrap();

    assert_eq!(stats.tasks, 4);
    assert_eq!(stats.task_groups["language_tasks"], 2);
    assert_eq!(stats.task_groups["research"], 1);
}

#[tokio::test]
async fn stored_models_support_metadata_filters() {
    let (store, _) = seeded_store().await;
    let filter = MetadataFilter::from_params(&params(&[("open_source", "true")]));
    let models = store.models(&filter).await.unwrap();

    let keys: Vec<_> = models.iter().map(|m| m.model_key.as_str()).collect();
    assert_eq!(keys, vec!["beta", "gamma"]);
}
