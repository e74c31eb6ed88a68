// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! # LLM Leaderboard Storage
//!
//! SQLite persistence for models, tasks, outputs, metric facts and the
//! import log, plus the aggregation queries behind the leaderboard and the
//! per-group comparison.
//!
//! ```no_run
//! use llm_leaderboard_core::{LeaderboardQuery, QualityExclusions};
//! use llm_leaderboard_storage::{LeaderboardStore, StoreConfig};
//!
//! # async fn run() -> llm_leaderboard_storage::Result<()> {
//! let store = LeaderboardStore::connect(&StoreConfig::default(), QualityExclusions::default()).await?;
//! let rows = store.leaderboard(&LeaderboardQuery::default()).await?;
//! # let _ = rows;
//! # Ok(())
//! # }
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod error;
pub mod schema;
pub mod store;
pub mod views;

pub use error::{Result, StorageError};
pub use store::{ImportOptions, LeaderboardStore, StoreConfig};
pub use views::{DeletedCounts, ImportSummary, ModelDetails, ModelTaskScore, OutputView, Stats};
