// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Reading and writing report files.
//!
//! A report directory holds:
//!
//! - `leaderboard.json` - the full snapshot
//! - `summary.md` - the leaderboard table
//! - `comparison.md` - per-group comparison windows

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::markdown;
use crate::snapshot::LeaderboardSnapshot;

/// Default output directory path.
pub const OUTPUT_DIR: &str = "reports";

/// Snapshot file name.
pub const SNAPSHOT_FILE: &str = "leaderboard.json";

/// Summary file name.
pub const SUMMARY_FILE: &str = "summary.md";

/// Comparison file name.
pub const COMPARISON_FILE: &str = "comparison.md";

/// Files produced by [`write_all_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub snapshot: PathBuf,
    pub summary: PathBuf,
    pub comparison: PathBuf,
}

impl ReportPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            snapshot: dir.join(SNAPSHOT_FILE),
            summary: dir.join(SUMMARY_FILE),
            comparison: dir.join(COMPARISON_FILE),
        }
    }
}

/// Write a snapshot as pretty JSON.
pub fn write_snapshot_json(snapshot: &LeaderboardSnapshot, path: impl AsRef<Path>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(snapshot).map_err(io::Error::other)?;
    fs::write(path, json)
}

/// Read a snapshot written by [`write_snapshot_json`].
pub fn read_snapshot_json(path: impl AsRef<Path>) -> io::Result<LeaderboardSnapshot> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write every report file into `dir`, creating it if needed.
pub fn write_all_outputs(snapshot: &LeaderboardSnapshot, dir: impl AsRef<Path>) -> io::Result<ReportPaths> {
    fs::create_dir_all(dir.as_ref())?;
    let paths = ReportPaths::in_dir(dir);

    write_snapshot_json(snapshot, &paths.snapshot)?;
    fs::write(&paths.summary, markdown::generate_summary(snapshot))?;
    fs::write(&paths.comparison, markdown::generate_comparison_report(snapshot))?;

    info!(
        dir = %paths.snapshot.parent().unwrap_or(Path::new(".")).display(),
        models = snapshot.rows.len(),
        groups = snapshot.comparison.len(),
        "Reports written"
    );
    Ok(paths)
}
