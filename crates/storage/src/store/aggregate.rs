// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Leaderboard aggregation and per-group rankings.

use llm_leaderboard_core::leaderboard::finalize_rows;
use llm_leaderboard_core::window::compare_groups;
use llm_leaderboard_core::{
    ComparisonWindow, LeaderboardQuery, LeaderboardRow, ModelMeta, QualityExclusions,
    RankedEntry, TaskGroup,
};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use super::LeaderboardStore;
use crate::error::Result;

/// One metrics row per output, so joins never multiply averages.
const PER_OUTPUT_METRICS: &str = r#"
    per_output AS (
        SELECT s.id, s.task_id, s.model_key, s.tokens, s.length,
               MAX(CASE WHEN me.metric_name = 'quality_score' THEN me.metric_value END) AS quality_score,
               MAX(CASE WHEN me.metric_name = 'rouge_l' THEN me.metric_value END) AS rouge_l,
               MAX(CASE WHEN me.metric_name = 'bert_score' THEN me.metric_value END) AS bert_score
        FROM scoped s
        LEFT JOIN metrics me ON me.output_id = s.id
        GROUP BY s.id
    )
"#;

#[derive(Debug, FromRow)]
struct AggregateRecord {
    model_key: String,
    name: String,
    meta: String,
    task_count: i64,
    avg_tokens: Option<f64>,
    avg_length: Option<f64>,
    avg_quality_score: Option<f64>,
    avg_rouge_l: Option<f64>,
    avg_bert_score: Option<f64>,
}

impl From<AggregateRecord> for LeaderboardRow {
    fn from(record: AggregateRecord) -> Self {
        let meta = ModelMeta::from_json_lossy(&record.model_key, &record.meta);
        LeaderboardRow {
            model_key: record.model_key,
            name: record.name,
            meta,
            task_count: record.task_count,
            avg_tokens: record.avg_tokens,
            avg_length: record.avg_length,
            avg_quality_score: record.avg_quality_score,
            avg_rouge_l: record.avg_rouge_l,
            avg_bert_score: record.avg_bert_score,
        }
    }
}

#[derive(Debug, FromRow)]
struct GroupScoreRecord {
    task_group: String,
    model_key: String,
    name: String,
    avg_score: Option<f64>,
    task_count: Option<i64>,
}

/// Push `<column> NOT IN (...)` for the excluded tasks, or a tautology when
/// nothing is excluded.
fn push_not_excluded(query: &mut QueryBuilder<'_, Sqlite>, column: &str, exclusions: &QualityExclusions) {
    if exclusions.is_empty() {
        query.push("1 = 1");
        return;
    }
    query.push(column).push(" NOT IN (");
    let mut ids = query.separated(", ");
    for task_id in exclusions.iter() {
        ids.push_bind(task_id.to_string());
    }
    ids.push_unseparated(")");
}

impl LeaderboardStore {
    /// Aggregate every stored model, then filter and sort in memory.
    ///
    /// Models without outputs in scope appear with `task_count == 0` and
    /// no averages. Excluded tasks only drop out of the quality average.
    #[instrument(skip(self), fields(task_group = ?query.task_group, sort_by = %query.sort_by))]
    pub async fn leaderboard(&self, query: &LeaderboardQuery) -> Result<Vec<LeaderboardRow>> {
        let group = query.task_group.map(|g| g.as_str().to_string());

        let mut sql: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            r#"
            WITH scoped AS (
                SELECT o.id, o.task_id, o.model_key, o.tokens, o.length
                FROM outputs o
                JOIN tasks t ON t.task_id = o.task_id
                WHERE "#,
        );
        match group {
            Some(label) => {
                sql.push("t.task_group = ").push_bind(label);
            }
            None => {
                sql.push("1 = 1");
            }
        }
        sql.push("\n            ),");
        sql.push(PER_OUTPUT_METRICS);
        sql.push(
            r#"
            SELECT m.model_key, m.name, m.meta,
                   COUNT(DISTINCT p.task_id) AS task_count,
                   AVG(p.tokens) AS avg_tokens,
                   AVG(p.length) AS avg_length,
                   AVG(CASE WHEN "#,
        );
        push_not_excluded(&mut sql, "p.task_id", &self.exclusions);
        sql.push(
            r#" THEN p.quality_score END) AS avg_quality_score,
                   AVG(p.rouge_l) AS avg_rouge_l,
                   AVG(p.bert_score) AS avg_bert_score
            FROM models m
            LEFT JOIN per_output p ON p.model_key = m.model_key
            GROUP BY m.model_key, m.name, m.meta
            ORDER BY m.model_key
            "#,
        );

        let records: Vec<AggregateRecord> = sql.build_query_as().fetch_all(&self.pool).await?;
        debug!(models = records.len(), "Aggregated leaderboard rows");

        let rows = records.into_iter().map(LeaderboardRow::from).collect();
        Ok(finalize_rows(rows, query))
    }

    /// Ranked entries per task group: average quality score with missing
    /// scores counted as zero, excluded tasks left out.
    pub async fn group_rankings(&self) -> Result<BTreeMap<TaskGroup, Vec<RankedEntry>>> {
        let mut sql: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            r#"
            SELECT t.task_group AS task_group, m.model_key AS model_key, m.name AS name,
                   AVG(COALESCE(q.metric_value, 0)) AS avg_score,
                   COUNT(DISTINCT o.task_id) AS task_count
            FROM outputs o
            JOIN tasks t ON t.task_id = o.task_id
            JOIN models m ON m.model_key = o.model_key
            LEFT JOIN metrics q ON q.output_id = o.id AND q.metric_name = 'quality_score'
            WHERE t.task_group IS NOT NULL AND "#,
        );
        push_not_excluded(&mut sql, "o.task_id", &self.exclusions);
        sql.push(
            r#"
            GROUP BY t.task_group, m.model_key, m.name
            ORDER BY t.task_group, avg_score DESC, m.model_key
            "#,
        );

        let records: Vec<GroupScoreRecord> = sql.build_query_as().fetch_all(&self.pool).await?;

        let mut rankings: BTreeMap<TaskGroup, Vec<RankedEntry>> = BTreeMap::new();
        for record in records {
            let Ok(group) = record.task_group.parse::<TaskGroup>() else {
                debug!(task_group = %record.task_group, "Skipping undeclared task group");
                continue;
            };
            rankings.entry(group).or_default().push(RankedEntry::from_aggregate(
                record.model_key,
                record.name,
                record.avg_score,
                record.task_count,
            ));
        }
        Ok(rankings)
    }

    /// Comparison windows for the first `limit_groups` declared groups.
    ///
    /// With a target, the model must exist; groups where it has no output
    /// are omitted.
    #[instrument(skip(self))]
    pub async fn task_group_performance(
        &self,
        target: Option<&str>,
        limit_groups: usize,
    ) -> Result<BTreeMap<TaskGroup, ComparisonWindow>> {
        if let Some(model_key) = target {
            self.require_model(model_key).await?;
        }
        let rankings = self.group_rankings().await?;
        Ok(compare_groups(rankings, target, limit_groups))
    }
}
