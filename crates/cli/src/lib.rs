// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI for the LLM leaderboard.
//!
//! This crate provides the `leaderboard` command-line tool: importing
//! evaluation results, printing the leaderboard and group comparisons,
//! maintenance of stored tasks, and writing report files.

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod output;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use llm_leaderboard_core::ingest::{ensure_supported_extension, parse_import, ColumnMapping};
use llm_leaderboard_core::scoring::DEFAULT_EXCLUDED_TASKS;
use llm_leaderboard_core::window::DEFAULT_GROUP_LIMIT;
use llm_leaderboard_core::{LeaderboardQuery, ModelCatalog, QualityExclusions, TaskGroup};
use llm_leaderboard_reports::{io as report_io, LeaderboardSnapshot};
use llm_leaderboard_storage::{ImportOptions, LeaderboardStore, StoreConfig};
use tracing::info;

/// LLM leaderboard CLI.
#[derive(Parser, Debug)]
#[command(name = "leaderboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite database URL.
    #[arg(long, global = true, env = "LEADERBOARD_DATABASE_URL", default_value = "sqlite://data/results.db")]
    pub database: String,

    /// Model catalog file.
    #[arg(long, global = true, env = "LEADERBOARD_CATALOG", default_value = "config/models.toml")]
    pub catalog: PathBuf,

    /// Task ids left out of quality averages. Repeat for several.
    #[arg(long = "exclude-task", global = true, value_name = "TASK_ID")]
    pub excluded_tasks: Vec<String>,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database schema and synchronize the model catalog.
    Init,

    /// Import evaluation results from a CSV or .xlsx file.
    Import {
        /// `.csv` or `.xlsx` file with one row per (task, model) output.
        file: PathBuf,

        /// JSON column mapping (field -> column name).
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Validate and preview without writing.
        #[arg(long)]
        dry_run: bool,

        /// Store outputs without quality-score facts.
        #[arg(long)]
        no_scores: bool,
    },

    /// Print the aggregated leaderboard.
    Leaderboard {
        /// Restrict aggregation to one task group.
        #[arg(short, long)]
        task_group: Option<String>,

        /// Sort column (avg_quality_score, avg_rouge_l, avg_bert_score,
        /// avg_tokens, task_count).
        #[arg(short, long)]
        sort_by: Option<String>,

        /// Metadata filter as key=value, e.g. provider=OpenAI or
        /// min_parameters=70. Repeat for several.
        #[arg(short, long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,
    },

    /// Compare models per task group.
    Compare {
        /// Model to center each group's window on. Without it the top
        /// models of each group are shown.
        model: Option<String>,

        /// Number of task groups to consider.
        #[arg(short, long, default_value_t = DEFAULT_GROUP_LIMIT)]
        limit_groups: usize,
    },

    /// List or delete tasks.
    Tasks {
        #[command(subcommand)]
        action: TasksCommand,
    },

    /// Delete every task, output, metric and import record. Models stay.
    Reset {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },

    /// Show table counts and tasks per group.
    Stats,

    /// Write leaderboard.json, summary.md and comparison.md.
    Report {
        /// Output directory.
        #[arg(short, long, default_value = report_io::OUTPUT_DIR)]
        output: PathBuf,

        /// Restrict aggregation to one task group.
        #[arg(short, long)]
        task_group: Option<String>,

        /// Model to center the comparison on.
        #[arg(short, long)]
        model: Option<String>,
    },
}

/// Task maintenance commands.
#[derive(Subcommand, Debug)]
pub enum TasksCommand {
    /// List tasks, optionally of one group.
    List {
        #[arg(short, long)]
        task_group: Option<String>,
    },
    /// Delete one task with its outputs and metrics.
    Delete { task_id: String },
    /// Delete every task of a group.
    DeleteGroup { task_group: String },
}

impl Cli {
    fn exclusions(&self) -> QualityExclusions {
        if self.excluded_tasks.is_empty() {
            QualityExclusions::new(DEFAULT_EXCLUDED_TASKS.iter().copied())
        } else {
            QualityExclusions::new(self.excluded_tasks.iter().cloned())
        }
    }

    fn store_config(&self) -> StoreConfig {
        StoreConfig {
            url: self.database.clone(),
            ..Default::default()
        }
    }
}

/// Split `key=value` filter arguments into request-style parameters.
pub fn parse_filter_pairs(pairs: &[String]) -> Result<HashMap<String, String>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => bail!("invalid filter '{}', expected KEY=VALUE", pair),
        })
        .collect()
}

fn parse_group(raw: &str) -> Result<TaskGroup> {
    raw.parse::<TaskGroup>()
        .with_context(|| format!("known task groups: {}", output::group_list()))
}

async fn open_store(cli: &Cli) -> Result<LeaderboardStore> {
    let config = cli.store_config();
    if let Some(parent) = config.file_path().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }
    }
    LeaderboardStore::connect(&config, cli.exclusions())
        .await
        .with_context(|| format!("opening database {}", cli.database))
}

fn load_catalog(cli: &Cli) -> Result<ModelCatalog> {
    ModelCatalog::load(&cli.catalog)
        .with_context(|| format!("loading model catalog {}", cli.catalog.display()))
}

/// Run the CLI with parsed arguments.
pub async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Init => {
            let catalog = load_catalog(&cli)?;
            let store = open_store(&cli).await?;
            let synced = store.sync_models(&catalog).await?;
            println!("{} Database ready, {} models synchronized", "✓".green(), synced);
        }

        Commands::Import {
            file,
            mapping,
            dry_run,
            no_scores,
        } => {
            let file_name = file.display().to_string();
            ensure_supported_extension(&file_name)?;
            let content = fs::read(file).with_context(|| format!("reading {}", file_name))?;
            let mapping = match mapping {
                Some(path) => ColumnMapping::from_json_str(
                    &fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
                )?,
                None => ColumnMapping::default(),
            };
            let catalog = load_catalog(&cli)?;
            let batch = parse_import(&file_name, &content, &mapping, &catalog)?;

            if *dry_run {
                let report = batch.dry_run_report();
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!("{}", output::format_dry_run(&report));
                }
                return Ok(());
            }

            let store = open_store(&cli).await?;
            store.sync_models(&catalog).await?;
            let options = ImportOptions {
                record_scores: !no_scores,
            };
            let summary = store.import_batch(&file_name, &batch, options).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", output::format_import(&summary));
            }
        }

        Commands::Leaderboard {
            task_group,
            sort_by,
            filters,
        } => {
            let mut params = parse_filter_pairs(filters)?;
            if let Some(group) = task_group {
                parse_group(group)?;
                params.insert("task_group".into(), group.clone());
            }
            if let Some(sort_by) = sort_by {
                params.insert("sort_by".into(), sort_by.clone());
            }
            let query = LeaderboardQuery::from_params(&params);

            let store = open_store(&cli).await?;
            let rows = store.leaderboard(&query).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{}", output::format_leaderboard(&rows, query.sort_by));
            }
        }

        Commands::Compare { model, limit_groups } => {
            let store = open_store(&cli).await?;
            let comparison = store
                .task_group_performance(model.as_deref(), *limit_groups)
                .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
            } else {
                println!("{}", output::format_comparison(&comparison));
            }
        }

        Commands::Tasks { action } => {
            let store = open_store(&cli).await?;
            match action {
                TasksCommand::List { task_group } => {
                    let group = task_group.as_deref().map(parse_group).transpose()?;
                    let tasks = store.tasks(group).await?;
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&tasks)?);
                    } else {
                        println!("{}", output::format_tasks(&tasks));
                    }
                }
                TasksCommand::Delete { task_id } => {
                    let deleted = store.delete_task(task_id).await?;
                    println!("{} {}", "Deleted".yellow(), output::format_deleted(&deleted));
                }
                TasksCommand::DeleteGroup { task_group } => {
                    let deleted = store.delete_task_group(parse_group(task_group)?).await?;
                    println!("{} {}", "Deleted".yellow(), output::format_deleted(&deleted));
                }
            }
        }

        Commands::Reset { yes } => {
            if !yes {
                bail!("refusing to reset without --yes");
            }
            let store = open_store(&cli).await?;
            let deleted = store.reset_tasks().await?;
            println!("{} {}", "Reset:".red().bold(), output::format_deleted(&deleted));
        }

        Commands::Stats => {
            let store = open_store(&cli).await?;
            let stats = store.stats().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", output::format_stats(&stats));
            }
        }

        Commands::Report {
            output: dir,
            task_group,
            model,
        } => {
            let query = LeaderboardQuery {
                task_group: task_group.as_deref().map(parse_group).transpose()?,
                ..Default::default()
            };
            let store = open_store(&cli).await?;
            let rows = store.leaderboard(&query).await?;
            let comparison = store
                .task_group_performance(model.as_deref(), DEFAULT_GROUP_LIMIT)
                .await?;

            let snapshot = LeaderboardSnapshot::new(&query, rows, comparison);
            let paths = report_io::write_all_outputs(&snapshot, dir)
                .with_context(|| format!("writing reports to {}", dir.display()))?;

            info!(dir = %dir.display(), "Report generated");
            println!("{} Reports written:", "✓".green());
            for path in [&paths.snapshot, &paths.summary, &paths.comparison] {
                println!("  - {}", path.display());
            }
        }
    }

    Ok(())
}
