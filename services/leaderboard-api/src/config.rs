// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Service configuration.
//!
//! Layers, later wins:
//!
//! 1. built-in defaults
//! 2. `config/leaderboard.toml` (optional)
//! 3. `LEADERBOARD__SECTION__KEY` environment variables, e.g.
//!    `LEADERBOARD__SERVER__PORT=9000`

use config::{Config, ConfigError, Environment, File};
use llm_leaderboard_core::scoring::DEFAULT_EXCLUDED_TASKS;
use llm_leaderboard_core::QualityExclusions;
use llm_leaderboard_storage::StoreConfig;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default config file, without extension.
pub const CONFIG_FILE: &str = "config/leaderboard";

/// Default upload limit for imports (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Default cap on stored view sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Default idle lifetime of a view session (one day).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub scoring: ScoringConfig,
    pub logging: LoggingConfig,
    pub upload: UploadConfig,
    pub sessions: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Model catalog TOML.
    pub path: PathBuf,
    /// Column mapping JSON used by imports; identity when absent.
    #[serde(default)]
    pub mapping_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Task ids left out of quality averages.
    pub excluded_tasks: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`.
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub max_entries: usize,
    pub ttl_secs: u64,
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl AppConfig {
    /// Load from the default file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load with `file` (no extension) as the optional file layer.
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("LEADERBOARD")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("scoring.excluded_tasks")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let excluded: Vec<String> = DEFAULT_EXCLUDED_TASKS.iter().map(|s| s.to_string()).collect();
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite://data/results.db")?
            .set_default("database.max_connections", 5)?
            .set_default("catalog.path", "config/models.toml")?
            .set_default("scoring.excluded_tasks", excluded)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("upload.max_bytes", DEFAULT_MAX_UPLOAD_BYTES as u64)?
            .set_default("sessions.max_entries", DEFAULT_MAX_SESSIONS as u64)?
            .set_default("sessions.ttl_secs", DEFAULT_SESSION_TTL_SECS)
    }

    /// Built-in defaults only.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            ..Default::default()
        }
    }

    pub fn exclusions(&self) -> QualityExclusions {
        QualityExclusions::new(self.scoring.excluded_tasks.iter().cloned())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.format.eq_ignore_ascii_case("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::defaults().unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.upload.max_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(config.exclusions().contains("research_018"));
        assert!(config.catalog.mapping_path.is_none());
        assert_eq!(config.sessions.max_entries, DEFAULT_MAX_SESSIONS);
        assert_eq!(config.sessions.ttl().as_secs(), DEFAULT_SESSION_TTL_SECS);
        assert!(!config.json_logs());
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from("does/not/exist").unwrap();
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.logging.level, "info");
    }
}
