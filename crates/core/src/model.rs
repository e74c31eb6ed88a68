// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Evaluated models and their metadata record.
//!
//! Metadata is stored as a JSON blob next to each model. Known keys are
//! typed fields on [`ModelMeta`]; anything else lands in
//! [`ModelMeta::extra`] so new catalog keys survive a round trip.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date format used for `release_date`.
pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A model under evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Unique identity key (e.g. `llm-001`).
    pub model_key: String,
    /// Display name.
    pub name: String,
    /// Metadata record.
    pub meta: ModelMeta,
}

/// One pricing tier (e.g. `≤128K` → `$1.20`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    pub threshold: String,
    pub price: String,
}

/// A numeric metadata value that may be stored as a number or as a
/// suffixed string such as `"1000B"` or `"128K"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Magnitude {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Magnitude {
    /// Floor used when a value cannot be interpreted.
    pub const FLOOR: i64 = 0;

    /// Normalize to an integer, stripping a trailing magnitude marker.
    ///
    /// Unparseable text yields [`Magnitude::FLOOR`].
    pub fn normalize(&self) -> i64 {
        match self {
            Magnitude::Integer(n) => *n,
            Magnitude::Float(f) if f.is_finite() => f.trunc() as i64,
            Magnitude::Float(_) => Self::FLOOR,
            Magnitude::Text(s) => parse_suffixed(s).unwrap_or(Self::FLOOR),
        }
    }
}

impl From<i64> for Magnitude {
    fn from(n: i64) -> Self {
        Magnitude::Integer(n)
    }
}

fn parse_suffixed(raw: &str) -> Option<i64> {
    let digits = raw
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .trim();
    if let Ok(n) = digits.parse::<i64>() {
        return Some(n);
    }
    digits
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

/// Typed metadata record of a model.
///
/// Every field is optional so that partially described models still load;
/// the filter evaluator decides how a missing field compares.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<String>,
    /// Parameter count in billions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Magnitude>,
    /// Context window in thousands of tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<Magnitude>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_source: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_input: Option<bool>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub input_price: Vec<PriceTier>,
    #[serde(default)]
    pub output_price: Vec<PriceTier>,
    /// Keys this version does not know about.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ModelMeta {
    /// Normalized parameter count; missing values are the floor.
    pub fn parameters_value(&self) -> i64 {
        self.parameters
            .as_ref()
            .map_or(Magnitude::FLOOR, Magnitude::normalize)
    }

    /// Normalized context window; missing values are the floor.
    pub fn context_window_value(&self) -> i64 {
        self.context_window
            .as_ref()
            .map_or(Magnitude::FLOOR, Magnitude::normalize)
    }

    /// Parsed release date, if present and well formed.
    pub fn release_date_value(&self) -> Option<NaiveDate> {
        self.release_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), RELEASE_DATE_FORMAT).ok())
    }

    /// Parse a stored metadata blob.
    ///
    /// A malformed blob yields default metadata instead of an error, so one
    /// bad row never hides the rest of the leaderboard.
    pub fn from_json_lossy(model_key: &str, raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(meta) => meta,
            Err(err) => {
                tracing::warn!(model_key, error = %err, "Malformed model metadata, using defaults");
                ModelMeta::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_magnitude_normalizes_suffixed_strings() {
        assert_eq!(Magnitude::Text("1000B".into()).normalize(), 1000);
        assert_eq!(Magnitude::Text("128K".into()).normalize(), 128);
        assert_eq!(Magnitude::Text(" 36b ".into()).normalize(), 36);
        assert_eq!(Magnitude::Text("1.5B".into()).normalize(), 1);
        assert_eq!(Magnitude::Integer(671).normalize(), 671);
    }

    #[test]
    fn test_magnitude_unparseable_is_floor() {
        assert_eq!(Magnitude::Text("unknown".into()).normalize(), Magnitude::FLOOR);
        assert_eq!(Magnitude::Text(String::new()).normalize(), Magnitude::FLOOR);
        assert_eq!(Magnitude::Float(f64::NAN).normalize(), Magnitude::FLOOR);
    }

    #[test]
    fn test_meta_accepts_numbers_and_strings() {
        let meta: ModelMeta = serde_json::from_value(json!({
            "provider": "OpenAI",
            "parameters": 200,
            "context_window": "128K",
            "open_source": false,
            "tags": ["general", "multimodal"],
        }))
        .unwrap();

        assert_eq!(meta.parameters_value(), 200);
        assert_eq!(meta.context_window_value(), 128);
        assert_eq!(meta.open_source, Some(false));
        assert!(meta.languages.is_empty());
    }

    #[test]
    fn test_meta_keeps_unknown_keys() {
        let raw = json!({"provider": "Z.ai", "license": "MIT"});
        let meta: ModelMeta = serde_json::from_value(raw).unwrap();
        assert_eq!(meta.extra.get("license"), Some(&json!("MIT")));

        let back = serde_json::to_value(&meta).unwrap();
        assert_eq!(back["license"], json!("MIT"));
    }

    #[test]
    fn test_release_date_parsing() {
        let meta = ModelMeta {
            release_date: Some("2025-07-28".into()),
            ..Default::default()
        };
        assert_eq!(
            meta.release_date_value(),
            NaiveDate::from_ymd_opt(2025, 7, 28)
        );

        let bad = ModelMeta {
            release_date: Some("soon".into()),
            ..Default::default()
        };
        assert_eq!(bad.release_date_value(), None);
    }

    #[test]
    fn test_from_json_lossy_falls_back_to_default() {
        let meta = ModelMeta::from_json_lossy("llm-x", "{not json");
        assert_eq!(meta, ModelMeta::default());
    }
}
