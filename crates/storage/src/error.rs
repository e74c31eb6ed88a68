// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Storage error types.

use llm_leaderboard_core::CoreError;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database driver or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested row does not exist
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Metadata could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Domain validation error
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StorageError {
    pub(crate) fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        StorageError::NotFound {
            entity,
            key: key.into(),
        }
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
