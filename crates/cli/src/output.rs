// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Human-readable terminal output.

use std::collections::BTreeMap;
use std::fmt::Write;

use colored::Colorize;
use llm_leaderboard_core::ingest::DryRunReport;
use llm_leaderboard_core::{ComparisonWindow, LeaderboardRow, SortKey, Task, TaskGroup};
use llm_leaderboard_storage::{DeletedCounts, ImportSummary, Stats};

/// Longest model name shown before truncation.
const NAME_WIDTH: usize = 28;

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}

fn number(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", precision, v))
}

/// Declared task groups, comma separated.
pub fn group_list() -> String {
    TaskGroup::ALL
        .iter()
        .map(|g| g.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_leaderboard(rows: &[LeaderboardRow], sort_by: SortKey) -> String {
    if rows.is_empty() {
        return "No models found.".dimmed().to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!(
            "{:>4}  {:<width$}  {:<12}  {:>5}  {:>7}  {:>7}  {:>7}  {:>8}",
            "#",
            "Model",
            "Provider",
            "Tasks",
            "Quality",
            "ROUGE-L",
            "BERT",
            "Tokens",
            width = NAME_WIDTH
        )
        .bold()
    );
    for (idx, row) in rows.iter().enumerate() {
        let quality = number(row.avg_quality_score, 2);
        let quality = match row.avg_quality_score {
            Some(v) if v >= 8.0 => quality.green(),
            Some(v) if v < 5.0 => quality.red(),
            Some(_) => quality.yellow(),
            None => quality.dimmed(),
        };
        let _ = writeln!(
            out,
            "{:>4}  {:<width$}  {:<12}  {:>5}  {:>7}  {:>7}  {:>7}  {:>8}",
            idx + 1,
            truncate(&row.name, NAME_WIDTH),
            truncate(row.meta.provider.as_deref().unwrap_or("-"), 12),
            row.task_count,
            quality,
            number(row.avg_rouge_l, 2),
            number(row.avg_bert_score, 2),
            number(row.avg_tokens, 0),
            width = NAME_WIDTH
        );
    }
    let _ = write!(out, "{}", format!("{} models, sorted by {}", rows.len(), sort_by).dimmed());
    out
}

pub fn format_comparison(comparison: &BTreeMap<TaskGroup, ComparisonWindow>) -> String {
    if comparison.is_empty() {
        return "No task group has ranked results.".dimmed().to_string();
    }

    let mut out = String::new();
    for (group, window) in comparison {
        let _ = writeln!(out, "{}", group.as_str().cyan().bold());
        for (idx, entry) in window.models.iter().enumerate() {
            let line = format!(
                "  {:>2}. {:<width$} {:>6.2}  ({} tasks)",
                idx + 1,
                truncate(&entry.name, NAME_WIDTH),
                entry.avg_score,
                entry.task_count,
                width = NAME_WIDTH
            );
            if window.target_index == Some(idx) {
                let _ = writeln!(out, "{}", line.bold().green());
            } else {
                let _ = writeln!(out, "{}", line);
            }
        }
    }
    out.trim_end().to_string()
}

pub fn format_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".dimmed().to_string();
    }
    let mut out = String::new();
    for task in tasks {
        let _ = writeln!(
            out,
            "{:<24} {:<22} {}",
            task.task_id.bold(),
            task.task_group.as_deref().unwrap_or("-"),
            task.task_name
        );
    }
    let _ = write!(out, "{}", format!("{} tasks", tasks.len()).dimmed());
    out
}

pub fn format_import(summary: &ImportSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "✓".green(), summary.notes());
    if summary.skipped_rows > 0 {
        let _ = writeln!(out, "  Skipped rows: {}", summary.skipped_rows.to_string().yellow());
    }
    for warning in &summary.warnings {
        let _ = writeln!(out, "  {} {}", "warning:".yellow(), warning);
    }
    out.trim_end().to_string()
}

pub fn format_dry_run(report: &DryRunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Dry run, nothing written".bold());
    let _ = writeln!(out, "  Tasks:   {}", report.tasks_count);
    let _ = writeln!(out, "  Outputs: {}", report.outputs_count);
    let _ = writeln!(out, "  Skipped: {}", report.skipped_rows);
    for task in &report.tasks_preview {
        let _ = writeln!(out, "  task   {} ({})", task.task_id, task.task_name);
    }
    for output in &report.outputs_preview {
        let _ = writeln!(
            out,
            "  output {} / {} score={}",
            output.task_id,
            output.model_key,
            number(output.quality_score, 1)
        );
    }
    for warning in &report.warnings {
        let _ = writeln!(out, "  {} {}", "warning:".yellow(), warning);
    }
    out.trim_end().to_string()
}

pub fn format_deleted(deleted: &DeletedCounts) -> String {
    format!(
        "{} tasks, {} outputs, {} metrics, {} imports",
        deleted.tasks, deleted.outputs, deleted.metrics, deleted.imports
    )
}

pub fn format_stats(stats: &Stats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Database".bold());
    let _ = writeln!(out, "  Models:  {}", stats.models);
    let _ = writeln!(out, "  Tasks:   {}", stats.tasks);
    let _ = writeln!(out, "  Outputs: {}", stats.outputs);
    let _ = writeln!(out, "  Metrics: {}", stats.metrics);
    let _ = writeln!(out, "  Imports: {}", stats.imports);
    if !stats.task_groups.is_empty() {
        let _ = writeln!(out, "{}", "Tasks per group".bold());
        for (group, count) in &stats.task_groups {
            let _ = writeln!(out, "  {:<22} {}", group, count);
        }
    }
    out.trim_end().to_string()
}
