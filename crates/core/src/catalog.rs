// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Model catalog loaded from configuration.
//!
//! The catalog is the source of truth for which models exist. It is a TOML
//! file with one table per model key:
//!
//! ```toml
//! [models.llm-002]
//! name = "GPT-4o"
//! provider = "OpenAI"
//! parameters = 200
//! context_window = 128
//! open_source = false
//! languages = ["en", "hu"]
//! release_date = "2025-02-01"
//! ```

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::filter::MetadataFilter;
use crate::model::{Model, ModelMeta};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    models: BTreeMap<String, CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    #[serde(flatten)]
    meta: ModelMeta,
}

/// Models known to the leaderboard, ordered by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelCatalog {
    models: Vec<Model>,
}

impl ModelCatalog {
    /// Catalog from already-built models. Later duplicates replace earlier
    /// ones.
    pub fn from_models(models: impl IntoIterator<Item = Model>) -> Self {
        let by_key: BTreeMap<String, Model> = models
            .into_iter()
            .map(|m| (m.model_key.clone(), m))
            .collect();
        Self {
            models: by_key.into_values().collect(),
        }
    }

    /// Parse a TOML catalog.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(raw)?;
        Ok(Self::from_models(file.models.into_iter().map(
            |(model_key, entry)| Model {
                model_key,
                name: entry.name,
                meta: entry.meta,
            },
        )))
    }

    /// Load a TOML catalog from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&raw)?;
        tracing::info!(path = %path.display(), models = catalog.len(), "Model catalog loaded");
        Ok(catalog)
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn get(&self, model_key: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.model_key == model_key)
    }

    pub fn contains(&self, model_key: &str) -> bool {
        self.get(model_key).is_some()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Distinct providers, sorted.
    pub fn providers(&self) -> Vec<String> {
        self.models
            .iter()
            .filter_map(|m| m.meta.provider.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Models whose metadata satisfies `filter`.
    pub fn filter<'a>(&'a self, filter: &'a MetadataFilter) -> impl Iterator<Item = &'a Model> + 'a {
        self.models.iter().filter(move |m| filter.matches(&m.meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Magnitude;

    const CATALOG: &str = r#"
        [models.llm-002]
        name = "GPT-4o"
        provider = "OpenAI"
        parameters = 200
        context_window = "128K"
        open_source = false
        image_input = true
        languages = ["en", "hu"]
        tags = ["general", "multimodal"]
        release_date = "2025-02-01"
        input_price = [{ threshold = "all", price = "$2.50" }]

        [models.llm-001]
        name = "Qwen3 Max Preview"
        provider = "Alibaba Cloud"
        parameters = 1000
        open_source = false
        homepage = "https://qwen.ai"

        [models.llm-008]
        name = "Qwen3-Next-80B-A3B-Thinking"
        provider = "Alibaba Cloud"
        open_source = true
    "#;

    #[test]
    fn test_parse_catalog_orders_by_key() {
        let catalog = ModelCatalog::from_toml_str(CATALOG).unwrap();
        let keys: Vec<_> = catalog.models().iter().map(|m| m.model_key.as_str()).collect();
        assert_eq!(keys, vec!["llm-001", "llm-002", "llm-008"]);

        let gpt = catalog.get("llm-002").unwrap();
        assert_eq!(gpt.name, "GPT-4o");
        assert_eq!(gpt.meta.context_window, Some(Magnitude::Text("128K".into())));
        assert_eq!(gpt.meta.input_price[0].price, "$2.50");
    }

    #[test]
    fn test_unknown_keys_are_preserved() {
        let catalog = ModelCatalog::from_toml_str(CATALOG).unwrap();
        let qwen = catalog.get("llm-001").unwrap();
        assert_eq!(
            qwen.meta.extra.get("homepage"),
            Some(&serde_json::json!("https://qwen.ai"))
        );
    }

    #[test]
    fn test_providers_are_unique_and_sorted() {
        let catalog = ModelCatalog::from_toml_str(CATALOG).unwrap();
        assert_eq!(catalog.providers(), vec!["Alibaba Cloud", "OpenAI"]);
    }

    #[test]
    fn test_filter_models() {
        let catalog = ModelCatalog::from_toml_str(CATALOG).unwrap();
        let filter = MetadataFilter {
            open_source: Some(true),
            ..Default::default()
        };
        let keys: Vec<_> = catalog.filter(&filter).map(|m| m.model_key.as_str()).collect();
        assert_eq!(keys, vec!["llm-008"]);
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let err = ModelCatalog::from_toml_str("[models.x]\nprovider = \"p\"\n").unwrap_err();
        assert!(matches!(err, CoreError::Catalog(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ModelCatalog::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
