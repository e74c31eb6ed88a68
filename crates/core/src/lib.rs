// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core domain of the LLM leaderboard.
//!
//! This crate holds everything that does not touch storage or HTTP:
//!
//! - [`types`] - tasks, outputs, metric facts, import records, task groups
//! - [`model`] - models and their typed metadata record
//! - [`catalog`] - the configured model catalog
//! - [`filter`] - the metadata filter evaluator
//! - [`leaderboard`] - aggregate rows, sort keys, the post-aggregation pass
//! - [`window`] - comparison windowing around a target model
//! - [`scoring`] - quality-score range and exclusion set
//! - [`ingest`] - CSV and `.xlsx` parsing and validation for imports
//! - [`preferences`] - per-session view preferences
//!
//! All computations here are pure and safe to call from concurrent request
//! handlers.

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod leaderboard;
pub mod model;
pub mod preferences;
pub mod scoring;
pub mod types;
pub mod window;

pub use catalog::ModelCatalog;
pub use error::{CoreError, Result};
pub use filter::{MetadataFilter, RangeFilter};
pub use leaderboard::{LeaderboardQuery, LeaderboardRow, SortKey};
pub use model::{Magnitude, Model, ModelMeta, PriceTier};
pub use preferences::ViewPreferences;
pub use scoring::QualityExclusions;
pub use types::{ImportRecord, MetricFact, MetricName, MetricValues, Output, Task, TaskGroup};
pub use window::{ComparisonWindow, RankedEntry};
