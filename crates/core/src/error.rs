// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the leaderboard core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the core crate.
///
/// Filter parsing and windowing never fail; they degrade silently and log.
/// These variants cover inputs that must be rejected outright.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Task group label outside the declared enumeration
    #[error("Unknown task group: {0}")]
    UnknownTaskGroup(String),

    /// Metric name outside the supported set
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Catalog or mapping file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model catalog is not valid TOML or misses required fields
    #[error("Invalid model catalog: {0}")]
    Catalog(#[from] toml::de::Error),

    /// Column mapping is not valid JSON
    #[error("Invalid column mapping: {0}")]
    Mapping(#[from] serde_json::Error),

    /// Import file cannot be parsed at all
    #[error("Unsupported import file: {0}")]
    UnsupportedFile(String),

    /// Import file lacks columns the mapping requires
    #[error("Column validation failed: {}", .0.join("; "))]
    MissingColumns(Vec<String>),

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook could not be opened or has no readable worksheet
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
