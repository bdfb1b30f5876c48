//! CSV Data Loader Module
//! Reads the health indicator CSV, normalizes headers and keeps TOTAL rows.

use crate::data::columns::{
    normalize_header, ColumnLayout, INDICATOR_COLUMN, PARAMETER_COLUMN, TOTAL_TYPE, TYPE_COLUMN,
};
use crate::data::table::HealthTable;
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use polars::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to load CSV: {0}")]
    Polars(#[from] PolarsError),
    #[error("CSV has no header row")]
    Empty,
    #[error("CSV is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Result of the pre-parse pass over the raw file.
#[derive(Debug, Default, PartialEq)]
struct CleanedCsv {
    bytes: Vec<u8>,
    headers: Vec<String>,
    kept_rows: usize,
    skipped_rows: usize,
}

/// Load the table at `path`.
///
/// Rows with more fields than the header are skipped, shorter rows are
/// padded with nulls, headers
/// are normalized, and only `Type == TOTAL` rows survive. Rows with a missing
/// key are dropped and the first row of each (Indicator, Parameter) pair wins.
pub fn load_table(path: &Path) -> Result<HealthTable, LoaderError> {
    let raw = fs::read(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let cleaned = clean_csv(&raw)?;
    if cleaned.headers.is_empty() {
        return Err(LoaderError::Empty);
    }
    if cleaned.skipped_rows > 0 {
        warn!(
            "{}: skipped {} malformed row(s)",
            path.display(),
            cleaned.skipped_rows
        );
    }
    debug!(
        "kept {} of {} data rows",
        cleaned.kept_rows,
        cleaned.kept_rows + cleaned.skipped_rows
    );

    let layout = ColumnLayout::from_headers(&cleaned.headers);
    let missing = layout.missing_required();
    if !missing.is_empty() {
        return Err(LoaderError::MissingColumns(
            missing.into_iter().map(String::from).collect(),
        ));
    }
    for unknown in &layout.unknown_months {
        warn!(
            "column '{}' looks monthly but '{}' is not a month name",
            unknown.name, unknown.token
        );
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .into_reader_with_file_handle(Cursor::new(cleaned.bytes))
        .finish()?;
    debug!("parsed {} rows x {} columns", df.height(), df.width());

    let totals = df
        .lazy()
        .with_columns([
            col(TYPE_COLUMN).cast(DataType::String),
            col(INDICATOR_COLUMN).cast(DataType::String),
            col(PARAMETER_COLUMN).cast(DataType::String),
        ])
        .filter(col(TYPE_COLUMN).eq(lit(TOTAL_TYPE)))
        .collect()?;

    let frame = retain_unique_pairs(totals)?;

    info!(
        "Loaded {}: {} TOTAL rows, {} monthly columns",
        path.display(),
        frame.height(),
        layout.month_columns.len()
    );

    HealthTable::new(frame, layout)
}

/// Re-emit the CSV with normalized headers, dropping overlong rows.
fn clean_csv(raw: &[u8]) -> Result<CleanedCsv, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw);

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Ok(CleanedCsv::default());
    }

    let mut bytes = Vec::with_capacity(raw.len());
    let mut kept_rows = 0;
    let mut skipped_rows = 0;
    {
        let mut writer = csv::Writer::from_writer(&mut bytes);
        writer.write_record(&headers)?;

        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("skipping unreadable row: {}", e);
                    skipped_rows += 1;
                    continue;
                }
            };
            let mut record = record;
            if record.len() > headers.len() {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                warn!(
                    "skipping line {}: expected {} fields, saw {}",
                    line,
                    headers.len(),
                    record.len()
                );
                skipped_rows += 1;
                continue;
            }
            // Short rows are padded; their missing cells read as nulls
            while record.len() < headers.len() {
                record.push_field("");
            }
            writer.write_record(&record)?;
            kept_rows += 1;
        }
        writer.flush().map_err(csv::Error::from)?;
    }

    Ok(CleanedCsv {
        bytes,
        headers,
        kept_rows,
        skipped_rows,
    })
}

/// Drop rows with a null key and all but the first row of each key pair.
fn retain_unique_pairs(df: DataFrame) -> Result<DataFrame, LoaderError> {
    let (keep, null_keys, duplicates) = {
        let indicators = df.column(INDICATOR_COLUMN)?.str()?;
        let parameters = df.column(PARAMETER_COLUMN)?.str()?;

        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut keep = Vec::with_capacity(df.height());
        let mut null_keys = 0usize;
        let mut duplicates = 0usize;

        for (indicator, parameter) in indicators.into_iter().zip(parameters.into_iter()) {
            match (indicator, parameter) {
                (Some(i), Some(p)) => {
                    let first = seen.insert((i, p));
                    if !first {
                        warn!("duplicate row for ({}, {}); keeping the first", i, p);
                        duplicates += 1;
                    }
                    keep.push(first);
                }
                _ => {
                    null_keys += 1;
                    keep.push(false);
                }
            }
        }
        (keep, null_keys, duplicates)
    };

    if null_keys == 0 && duplicates == 0 {
        return Ok(df);
    }
    if null_keys > 0 {
        warn!("dropped {} row(s) without an indicator or parameter", null_keys);
    }

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok(df.filter(&mask)?)
}

/// Memoized table load keyed on a fixed source path.
pub struct TableCache {
    path: PathBuf,
    cell: OnceCell<Arc<HealthTable>>,
}

impl TableCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Load on first use, then hand out the cached table.
    pub fn get_or_load(&self) -> Result<Arc<HealthTable>, LoaderError> {
        self.cell
            .get_or_try_init(|| load_table(&self.path).map(Arc::new))
            .cloned()
    }

    /// Forget the cached table; the next `get_or_load` reads the file again.
    pub fn invalidate(&mut self) {
        self.cell.take();
    }

    /// Re-read the source. The previous table stays cached if this fails.
    pub fn reload(&mut self) -> Result<Arc<HealthTable>, LoaderError> {
        let table = Arc::new(load_table(&self.path)?);
        self.invalidate();
        Ok(Arc::clone(self.cell.get_or_init(|| table)))
    }
}
