// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Leaderboard reports.
//!
//! Snapshots of the aggregated leaderboard and the per-group comparison,
//! written to disk as JSON and markdown.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use llm_leaderboard_core::LeaderboardQuery;
//! use llm_leaderboard_reports::{io, LeaderboardSnapshot};
//!
//! let snapshot = LeaderboardSnapshot::new(&LeaderboardQuery::default(), Vec::new(), BTreeMap::new());
//! let paths = io::write_all_outputs(&snapshot, io::OUTPUT_DIR)?;
//! println!("{}", paths.summary.display());
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`snapshot`] - The `LeaderboardSnapshot` struct
//! - [`io`] - Reading and writing report files
//! - [`markdown`] - Markdown report generation

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod io;
pub mod markdown;
pub mod snapshot;

pub use io::ReportPaths;
pub use snapshot::LeaderboardSnapshot;
