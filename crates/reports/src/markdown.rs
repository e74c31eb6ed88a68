// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Markdown rendering of leaderboard snapshots.

use std::fmt::{self, Display};

use llm_leaderboard_core::{ComparisonWindow, LeaderboardRow, TaskGroup};

use crate::snapshot::LeaderboardSnapshot;

/// Placeholder for missing averages.
const MISSING: &str = "-";

fn score(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{:.2}", v))
}

fn tokens(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{:.0}", v))
}

struct Summary<'a>(&'a LeaderboardSnapshot);

impl Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;
        writeln!(f, "# Leaderboard Summary")?;
        writeln!(f)?;
        writeln!(f, "Generated: {}", snapshot.generated_at.to_rfc3339())?;
        if let Some(group) = snapshot.task_group {
            writeln!(f, "Task group: {}", group)?;
        }
        writeln!(f, "Sorted by: {}", snapshot.sort_by)?;
        writeln!(f)?;
        writeln!(f, "## Results")?;
        writeln!(f)?;
        writeln!(
            f,
            "| Rank | Model | Provider | Tasks | Quality | ROUGE-L | BERTScore | Avg Tokens |"
        )?;
        writeln!(
            f,
            "|------|-------|----------|-------|---------|---------|-----------|------------|"
        )?;

        for (rank, row) in snapshot.rows.iter().enumerate() {
            write_row(f, rank + 1, row)?;
        }

        writeln!(f)?;
        writeln!(f, "---")?;
        writeln!(
            f,
            "Total models: {} ({} with results)",
            snapshot.rows.len(),
            snapshot.ranked_rows().count()
        )
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, rank: usize, row: &LeaderboardRow) -> fmt::Result {
    writeln!(
        f,
        "| {} | {} | {} | {} | {} | {} | {} | {} |",
        rank,
        row.name,
        row.meta.provider.as_deref().unwrap_or(MISSING),
        row.task_count,
        score(row.avg_quality_score),
        score(row.avg_rouge_l),
        score(row.avg_bert_score),
        tokens(row.avg_tokens),
    )
}

struct Comparison<'a>(&'a LeaderboardSnapshot);

impl Display for Comparison<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;
        writeln!(f, "# Task Group Comparison")?;
        writeln!(f)?;
        writeln!(f, "Generated: {}", snapshot.generated_at.to_rfc3339())?;
        writeln!(f)?;

        if snapshot.comparison.is_empty() {
            return writeln!(f, "No task group has ranked results.");
        }

        for (group, window) in &snapshot.comparison {
            write_window(f, *group, window)?;
        }
        Ok(())
    }
}

fn write_window(f: &mut fmt::Formatter<'_>, group: TaskGroup, window: &ComparisonWindow) -> fmt::Result {
    writeln!(f, "## {}", group)?;
    writeln!(f)?;
    if let Some(target) = &window.target_model {
        writeln!(f, "Target: **{}** ({:.2})", target.name, target.avg_score)?;
        writeln!(f)?;
    }
    writeln!(f, "| # | Model | Avg Quality | Tasks |")?;
    writeln!(f, "|---|-------|-------------|-------|")?;
    for (idx, entry) in window.models.iter().enumerate() {
        let name = if window.target_index == Some(idx) {
            format!("**{}**", entry.name)
        } else {
            entry.name.clone()
        };
        writeln!(f, "| {} | {} | {:.2} | {} |", idx + 1, name, entry.avg_score, entry.task_count)?;
    }
    writeln!(f)
}

/// Generate the markdown leaderboard table.
pub fn generate_summary(snapshot: &LeaderboardSnapshot) -> String {
    Summary(snapshot).to_string()
}

/// Generate the per-group comparison report. The target model, when
/// present, is shown in bold.
pub fn generate_comparison_report(snapshot: &LeaderboardSnapshot) -> String {
    Comparison(snapshot).to_string()
}
