// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Spreadsheet ingestion: column mapping, validation and row preparation.
//!
//! Parsing is separated from writing so that a dry run and a real import
//! see exactly the same batch. Missing columns abort the import; data
//! problems inside rows become warnings and the offending rows are skipped.
//! CSV and `.xlsx` files share one row pipeline; only the first worksheet
//! of a workbook is read.

use calamine::{Data, Reader, Xlsx};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

use crate::catalog::ModelCatalog;
use crate::error::{CoreError, Result};
use crate::scoring::{QUALITY_MAX, QUALITY_MIN};
use crate::types::{Task, TaskGroup};

/// File extensions accepted for import.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "xlsx"];

/// Logical fields that must be mapped to a column.
pub const REQUIRED_FIELDS: &[&str] = &[
    "task_id",
    "task_name",
    "prompt_text",
    "task_group",
    "model_key",
    "quality_score",
];

/// Logical fields that may be mapped.
pub const OPTIONAL_FIELDS: &[&str] = &["output_text", "tokens"];

/// Rows shown in a dry-run preview.
const PREVIEW_ROWS: usize = 3;

/// Maps logical field names to spreadsheet column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<String, String>);

impl Default for ColumnMapping {
    fn default() -> Self {
        Self(
            REQUIRED_FIELDS
                .iter()
                .chain(OPTIONAL_FIELDS)
                .map(|f| (f.to_string(), f.to_string()))
                .collect(),
        )
    }
}

impl ColumnMapping {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Load a mapping file, falling back to the default mapping when the
    /// file is missing or malformed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_json_str(&raw).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "Invalid column mapping, using default");
                Self::default()
            }),
            Err(_) => {
                debug!(path = %path.display(), "No column mapping file, using default");
                Self::default()
            }
        }
    }

    /// Column header for a logical field.
    pub fn column(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

/// One prepared output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    pub task_id: String,
    pub model_key: String,
    pub output_text: String,
    pub tokens: Option<i64>,
    /// Raw score as found in the file; range checks happen when facts are
    /// written.
    pub quality_score: Option<f64>,
}

/// Parsed and validated contents of one import file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportBatch {
    /// Distinct tasks, first occurrence wins.
    pub tasks: Vec<Task>,
    /// Distinct (task, model) outputs, last occurrence wins.
    pub outputs: Vec<OutputRow>,
    pub warnings: Vec<String>,
    pub skipped_rows: usize,
}

/// What a dry run reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryRunReport {
    pub dry_run: bool,
    pub tasks_count: usize,
    pub outputs_count: usize,
    pub skipped_rows: usize,
    pub tasks_preview: Vec<Task>,
    pub outputs_preview: Vec<OutputRow>,
    pub warnings: Vec<String>,
}

impl ImportBatch {
    pub fn dry_run_report(&self) -> DryRunReport {
        DryRunReport {
            dry_run: true,
            tasks_count: self.tasks.len(),
            outputs_count: self.outputs.len(),
            skipped_rows: self.skipped_rows,
            tasks_preview: self.tasks.iter().take(PREVIEW_ROWS).cloned().collect(),
            outputs_preview: self.outputs.iter().take(PREVIEW_ROWS).cloned().collect(),
            warnings: self.warnings.clone(),
        }
    }
}

fn extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Reject files whose extension is not importable.
pub fn ensure_supported_extension(file_name: &str) -> Result<()> {
    if SUPPORTED_EXTENSIONS.contains(&extension(file_name).as_str()) {
        Ok(())
    } else {
        Err(CoreError::UnsupportedFile(format!(
            "{} (allowed: {})",
            file_name,
            SUPPORTED_EXTENSIONS.join(", ")
        )))
    }
}

struct Columns {
    task_id: usize,
    task_name: usize,
    prompt_text: usize,
    task_group: usize,
    model_key: usize,
    quality_score: usize,
    output_text: Option<usize>,
    tokens: Option<usize>,
}

fn resolve_columns(headers: &[String], mapping: &ColumnMapping) -> Result<Columns> {
    let position = |column: &str| headers.iter().position(|h| h.trim() == column);
    let mut missing = Vec::new();
    let mut required = BTreeMap::new();

    for field in REQUIRED_FIELDS {
        match mapping.column(field) {
            None => missing.push(format!("Required column '{}' not found in mapping", field)),
            Some(column) => match position(column) {
                Some(idx) => {
                    required.insert(*field, idx);
                }
                None => missing.push(format!(
                    "Column '{}' (mapped from '{}') not found in data",
                    column, field
                )),
            },
        }
    }
    if !missing.is_empty() {
        return Err(CoreError::MissingColumns(missing));
    }

    let optional = |field: &str| mapping.column(field).and_then(position);
    Ok(Columns {
        task_id: required["task_id"],
        task_name: required["task_name"],
        prompt_text: required["prompt_text"],
        task_group: required["task_group"],
        model_key: required["model_key"],
        quality_score: required["quality_score"],
        output_text: optional("output_text"),
        tokens: optional("tokens"),
    })
}

fn cell(record: &[String], idx: usize) -> &str {
    record.get(idx).map(|value| value.trim()).unwrap_or("")
}

fn sheet_cell(value: &Data) -> String {
    match value {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn parse_tokens(raw: &str) -> Option<i64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
}

/// Parse an uploaded file, picking the reader from its extension.
pub fn parse_import(
    file_name: &str,
    content: &[u8],
    mapping: &ColumnMapping,
    catalog: &ModelCatalog,
) -> Result<ImportBatch> {
    ensure_supported_extension(file_name)?;
    match extension(file_name).as_str() {
        "xlsx" => parse_xlsx(content, mapping, catalog),
        _ => {
            let input = std::str::from_utf8(content)
                .map_err(|_| CoreError::UnsupportedFile(format!("{} is not valid UTF-8", file_name)))?;
            parse_csv(input, mapping, catalog)
        }
    }
}

/// Parse CSV `input` with `mapping`, validating rows against `catalog`.
pub fn parse_csv(input: &str, mapping: &ColumnMapping, catalog: &ModelCatalog) -> Result<ImportBatch> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let records = reader.records().map(|record| {
        record
            .map(|r| r.iter().map(str::to_string).collect::<Vec<_>>())
            .map_err(CoreError::from)
    });
    parse_rows(&headers, records, mapping, catalog)
}

/// Parse the first worksheet of an `.xlsx` workbook.
pub fn parse_xlsx(content: &[u8], mapping: &ColumnMapping, catalog: &ModelCatalog) -> Result<ImportBatch> {
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(content))
        .map_err(|e: calamine::XlsxError| CoreError::Spreadsheet(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CoreError::Spreadsheet("workbook has no worksheets".into()))?
        .map_err(|e| CoreError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(sheet_cell).collect())
        .unwrap_or_default();
    let records = rows.map(|row| Ok::<_, CoreError>(row.iter().map(sheet_cell).collect::<Vec<_>>()));
    parse_rows(&headers, records, mapping, catalog)
}

fn parse_rows<I>(
    headers: &[String],
    records: I,
    mapping: &ColumnMapping,
    catalog: &ModelCatalog,
) -> Result<ImportBatch>
where
    I: IntoIterator<Item = Result<Vec<String>>>,
{
    let cols = resolve_columns(headers, mapping)?;

    let mut batch = ImportBatch::default();
    let mut seen_tasks = HashSet::new();
    let mut output_slots: HashMap<(String, String), usize> = HashMap::new();
    let mut duplicates = 0usize;
    let mut null_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut unknown_models = BTreeSet::new();
    let mut unknown_groups = BTreeSet::new();
    let mut invalid_scores = 0usize;
    let mut non_numeric_scores = 0usize;

    for record in records {
        let record = record?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let required = [
            ("task_id", cols.task_id),
            ("task_name", cols.task_name),
            ("prompt_text", cols.prompt_text),
            ("task_group", cols.task_group),
            ("model_key", cols.model_key),
            ("quality_score", cols.quality_score),
        ];
        for (field, idx) in required {
            if cell(&record, idx).is_empty() {
                *null_counts.entry(field).or_default() += 1;
            }
        }

        let task_id = cell(&record, cols.task_id);
        let model_key = cell(&record, cols.model_key);
        if task_id.is_empty() || model_key.is_empty() {
            batch.skipped_rows += 1;
            continue;
        }
        if !catalog.contains(model_key) {
            unknown_models.insert(model_key.to_string());
            batch.skipped_rows += 1;
            continue;
        }
        let group_label = cell(&record, cols.task_group);
        let group = match group_label.parse::<TaskGroup>() {
            Ok(group) => group,
            Err(_) => {
                if !group_label.is_empty() {
                    unknown_groups.insert(group_label.to_string());
                }
                batch.skipped_rows += 1;
                continue;
            }
        };

        let raw_score = cell(&record, cols.quality_score);
        let quality_score = if raw_score.is_empty() {
            None
        } else {
            match raw_score.parse::<f64>() {
                Ok(score) => {
                    if !(QUALITY_MIN..=QUALITY_MAX).contains(&score) {
                        invalid_scores += 1;
                    }
                    Some(score)
                }
                Err(_) => {
                    non_numeric_scores += 1;
                    None
                }
            }
        };

        if seen_tasks.insert(task_id.to_string()) {
            batch.tasks.push(Task {
                task_id: task_id.to_string(),
                task_name: cell(&record, cols.task_name).to_string(),
                prompt_text: cell(&record, cols.prompt_text).to_string(),
                task_group: Some(group.as_str().to_string()),
                created_at: None,
            });
        }

        let row = OutputRow {
            task_id: task_id.to_string(),
            model_key: model_key.to_string(),
            output_text: cols
                .output_text
                .map(|idx| cell(&record, idx).to_string())
                .unwrap_or_default(),
            tokens: cols.tokens.and_then(|idx| parse_tokens(cell(&record, idx))),
            quality_score,
        };
        match output_slots.entry((row.task_id.clone(), row.model_key.clone())) {
            Entry::Occupied(slot) => {
                batch.outputs[*slot.get()] = row;
                duplicates += 1;
            }
            Entry::Vacant(slot) => {
                slot.insert(batch.outputs.len());
                batch.outputs.push(row);
            }
        }
    }

    for (field, count) in null_counts {
        let column = mapping.column(field).unwrap_or(field);
        batch
            .warnings
            .push(format!("Required column '{}' has {} null values", column, count));
    }
    if !unknown_models.is_empty() {
        batch.warnings.push(format!(
            "Invalid model keys found: {:?}",
            unknown_models.into_iter().collect::<Vec<_>>()
        ));
    }
    if !unknown_groups.is_empty() {
        batch.warnings.push(format!(
            "Unknown task groups found: {:?}",
            unknown_groups.into_iter().collect::<Vec<_>>()
        ));
    }
    if invalid_scores > 0 {
        batch.warnings.push(format!(
            "Quality scores must be between 0-10. Found {} invalid values",
            invalid_scores
        ));
    }
    if duplicates > 0 {
        batch.warnings.push(format!(
            "Duplicate (task_id, model_key) rows: {}; the last occurrence was kept",
            duplicates
        ));
    }
    if non_numeric_scores > 0 {
        batch.warnings.push(format!(
            "Column '{}' contains {} non-numeric values",
            mapping.column("quality_score").unwrap_or("quality_score"),
            non_numeric_scores
        ));
    }

    debug!(
        tasks = batch.tasks.len(),
        outputs = batch.outputs.len(),
        skipped = batch.skipped_rows,
        warnings = batch.warnings.len(),
        "Import batch prepared"
    );
    Ok(batch)
}
