// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Metadata filter evaluator.
//!
//! A [`MetadataFilter`] is a conjunction of optional predicates over a
//! [`ModelMeta`]. Absent predicates always pass, so the default filter
//! matches every model.
//!
//! Filters are usually built from raw request parameters with
//! [`MetadataFilter::from_params`]. Parsing never fails: empty values are
//! treated as absent and malformed bounds are dropped individually.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::model::{ModelMeta, RELEASE_DATE_FORMAT};

/// Inclusive range predicate. Either bound may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeFilter<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

impl<T: PartialOrd + Copy> RangeFilter<T> {
    /// Range with both bounds set.
    pub fn between(min: T, max: T) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// True when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether `value` lies within the bounds (inclusive).
    pub fn contains(&self, value: T) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    /// Like [`contains`](Self::contains) for a value that may be missing.
    ///
    /// A missing value sorts below every bound: it fails a lower bound and
    /// passes an upper bound.
    pub fn contains_opt(&self, value: Option<T>) -> bool {
        match value {
            Some(v) => self.contains(v),
            None => self.min.is_none(),
        }
    }
}

/// Conjunction of metadata predicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_source: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_input: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub parameters: RangeFilter<i64>,
    #[serde(default)]
    pub context_window: RangeFilter<i64>,
    #[serde(default)]
    pub release_date: RangeFilter<NaiveDate>,
}

impl MetadataFilter {
    /// Build a filter from query-string style parameters.
    ///
    /// Recognised keys: `provider`, `open_source`, `reasoning`,
    /// `image_input`, `tag`, `language`, `min_parameters`,
    /// `max_parameters`, `min_context`, `max_context`, `min_date`,
    /// `max_date`. Unknown keys are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            provider: param_str(params, "provider"),
            open_source: param_bool(params, "open_source"),
            reasoning: param_bool(params, "reasoning"),
            image_input: param_bool(params, "image_input"),
            tag: param_str(params, "tag"),
            language: param_str(params, "language"),
            parameters: RangeFilter {
                min: param_i64(params, "min_parameters"),
                max: param_i64(params, "max_parameters"),
            },
            context_window: RangeFilter {
                min: param_i64(params, "min_context"),
                max: param_i64(params, "max_context"),
            },
            release_date: RangeFilter {
                min: param_date(params, "min_date"),
                max: param_date(params, "max_date"),
            },
        }
    }

    /// True when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.provider.is_none()
            && self.open_source.is_none()
            && self.reasoning.is_none()
            && self.image_input.is_none()
            && self.tag.is_none()
            && self.language.is_none()
            && self.parameters.is_unbounded()
            && self.context_window.is_unbounded()
            && self.release_date.is_unbounded()
    }

    /// Whether `meta` satisfies every supplied predicate.
    pub fn matches(&self, meta: &ModelMeta) -> bool {
        if let Some(expected) = self.open_source {
            if meta.open_source != Some(expected) {
                return false;
            }
        }
        if let Some(expected) = self.reasoning {
            if meta.reasoning != Some(expected) {
                return false;
            }
        }
        if let Some(expected) = self.image_input {
            if meta.image_input != Some(expected) {
                return false;
            }
        }
        if let Some(provider) = &self.provider {
            if meta.provider.as_deref() != Some(provider.as_str()) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !meta.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(language) = &self.language {
            if !meta.languages.iter().any(|l| l == language) {
                return false;
            }
        }
        if !self.parameters.is_unbounded() && !self.parameters.contains(meta.parameters_value()) {
            return false;
        }
        if !self.context_window.is_unbounded()
            && !self.context_window.contains(meta.context_window_value())
        {
            return false;
        }
        if !self.release_date.is_unbounded()
            && !self.release_date.contains_opt(meta.release_date_value())
        {
            return false;
        }
        true
    }
}

/// Non-empty, trimmed string parameter.
pub(crate) fn param_str(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// `true` / `false` (case-insensitive); anything else is absent.
pub(crate) fn param_bool(params: &HashMap<String, String>, key: &str) -> Option<bool> {
    let raw = param_str(params, key)?;
    match raw.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => {
            debug!(key, value = %raw, "Ignoring non-boolean filter value");
            None
        }
    }
}

pub(crate) fn param_i64(params: &HashMap<String, String>, key: &str) -> Option<i64> {
    let raw = param_str(params, key)?;
    match raw.parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            debug!(key, value = %raw, "Ignoring malformed numeric filter bound");
            None
        }
    }
}

pub(crate) fn param_date(params: &HashMap<String, String>, key: &str) -> Option<NaiveDate> {
    let raw = param_str(params, key)?;
    match NaiveDate::parse_from_str(&raw, RELEASE_DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            debug!(key, value = %raw, "Ignoring malformed date filter bound");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Magnitude;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn gpt4o() -> ModelMeta {
        ModelMeta {
            provider: Some("OpenAI".into()),
            parameters: Some(Magnitude::Integer(200)),
            context_window: Some(Magnitude::Text("128K".into())),
            open_source: Some(false),
            reasoning: Some(false),
            image_input: Some(true),
            languages: vec!["en".into(), "hu".into(), "de".into()],
            tags: vec!["general".into(), "multimodal".into()],
            release_date: Some("2025-02-01".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = MetadataFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&gpt4o()));
        assert!(filter.matches(&ModelMeta::default()));
    }

    #[test]
    fn test_boolean_and_membership_predicates() {
        let meta = gpt4o();

        let filter = MetadataFilter {
            image_input: Some(true),
            tag: Some("multimodal".into()),
            language: Some("hu".into()),
            ..Default::default()
        };
        assert!(filter.matches(&meta));

        let filter = MetadataFilter {
            open_source: Some(true),
            ..Default::default()
        };
        assert!(!filter.matches(&meta));

        let filter = MetadataFilter {
            language: Some("ja".into()),
            ..Default::default()
        };
        assert!(!filter.matches(&meta));
    }

    #[test]
    fn test_missing_flag_does_not_match_explicit_value() {
        let filter = MetadataFilter {
            reasoning: Some(false),
            ..Default::default()
        };
        assert!(!filter.matches(&ModelMeta::default()));
    }

    #[test]
    fn test_numeric_bounds_are_inclusive() {
        let meta = gpt4o();
        let filter = MetadataFilter {
            parameters: RangeFilter::between(200, 200),
            context_window: RangeFilter::between(128, 128),
            ..Default::default()
        };
        assert!(filter.matches(&meta));

        let filter = MetadataFilter {
            parameters: RangeFilter {
                min: Some(201),
                max: None,
            },
            ..Default::default()
        };
        assert!(!filter.matches(&meta));
    }

    #[test]
    fn test_unparseable_numeric_uses_floor() {
        let meta = ModelMeta {
            parameters: Some(Magnitude::Text("undisclosed".into())),
            ..Default::default()
        };
        let at_floor = MetadataFilter {
            parameters: RangeFilter {
                min: None,
                max: Some(0),
            },
            ..Default::default()
        };
        assert!(at_floor.matches(&meta));

        let above_floor = MetadataFilter {
            parameters: RangeFilter {
                min: Some(1),
                max: None,
            },
            ..Default::default()
        };
        assert!(!above_floor.matches(&meta));
    }

    #[test]
    fn test_date_range_and_missing_dates() {
        let filter = MetadataFilter::from_params(&params(&[
            ("min_date", "2025-02-01"),
            ("max_date", "2025-12-31"),
        ]));
        assert!(filter.matches(&gpt4o()));
        assert!(!filter.matches(&ModelMeta::default()));

        let upper_only = MetadataFilter::from_params(&params(&[("max_date", "2025-01-01")]));
        assert!(!upper_only.matches(&gpt4o()));
        assert!(upper_only.matches(&ModelMeta::default()));
    }

    #[test]
    fn test_from_params_treats_empty_values_as_absent() {
        let filter = MetadataFilter::from_params(&params(&[
            ("provider", ""),
            ("open_source", ""),
            ("min_parameters", "  "),
            ("tag", ""),
        ]));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_from_params_drops_malformed_bounds_only() {
        let filter = MetadataFilter::from_params(&params(&[
            ("min_parameters", "lots"),
            ("max_parameters", "500"),
            ("min_date", "yesterday"),
            ("reasoning", "maybe"),
            ("open_source", "TRUE"),
        ]));
        assert_eq!(filter.parameters.min, None);
        assert_eq!(filter.parameters.max, Some(500));
        assert_eq!(filter.release_date.min, None);
        assert_eq!(filter.reasoning, None);
        assert_eq!(filter.open_source, Some(true));
    }
}
