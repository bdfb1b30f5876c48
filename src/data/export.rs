//! Export Module
//! Field/Value CSV of the selected record.

use crate::data::table::SelectedRecord;
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The record transposed to `(field, value)` pairs in table column order.
pub fn export_rows(record: &SelectedRecord) -> Vec<(String, String)> {
    record.fields()
}

/// Two-column `Field,Value` CSV, one row per field of the record.
pub fn export_csv(record: &SelectedRecord) -> Result<Vec<u8>, ExportError> {
    let (fields, values): (Vec<String>, Vec<String>) = export_rows(record).into_iter().unzip();
    let mut df = DataFrame::new(vec![
        Column::new("Field".into(), fields),
        Column::new("Value".into(), values),
    ])?;

    let mut buf = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .finish(&mut df)?;
    Ok(buf)
}

/// Write the export of `record` to `path`.
pub fn write_export(record: &SelectedRecord, path: &Path) -> Result<(), ExportError> {
    let bytes = export_csv(record)?;
    fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Suggested file name, e.g. `"Full Immunization"` -> `Full_Immunization_summary.csv`.
pub fn download_filename(parameter: &str) -> String {
    format!("{}_summary.csv", parameter.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{load_fixture, HEALTH_CSV};

    fn parse_export(bytes: &[u8]) -> (Vec<String>, Vec<(String, String)>) {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers = reader
            .headers()
            .unwrap()
            .iter()
            .map(String::from)
            .collect();
        let rows = reader
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].to_string(), r[1].to_string())
            })
            .collect();
        (headers, rows)
    }

    #[test]
    fn export_round_trips_field_values() {
        let (_file, table) = load_fixture(HEALTH_CSV);
        let record = table.select("Immunization", "DPT3").unwrap();
        let bytes = export_csv(&record).unwrap();
        let (headers, rows) = parse_export(&bytes);

        assert_eq!(headers, vec!["Field", "Value"]);
        assert_eq!(rows, export_rows(&record));
        assert_eq!(rows.len(), table.layout().columns.len());
        assert_eq!(rows[0], ("Type".to_string(), "TOTAL".to_string()));
        assert_eq!(
            rows[1],
            ("Indicators".to_string(), "Immunization".to_string())
        );
        assert_eq!(rows[2], ("Parameters".to_string(), "DPT3".to_string()));

        let field_names: Vec<&str> = rows.iter().map(|(f, _)| f.as_str()).collect();
        let columns: Vec<&str> = table.layout().columns.iter().map(String::as_str).collect();
        assert_eq!(field_names, columns);

        let total = rows.iter().find(|(f, _)| f == "2011-2012").unwrap();
        assert_eq!(total.1.parse::<f64>().unwrap(), 100.0);
    }

    #[test]
    fn blank_cells_export_as_empty_text() {
        let (_file, table) = load_fixture(HEALTH_CSV);
        let record = table.select("Immunization", "BCG").unwrap();
        let (_, rows) = parse_export(&export_csv(&record).unwrap());

        let april = rows.iter().find(|(f, _)| f == "April 11-12").unwrap();
        assert_eq!(april.1, "");
        let delta = rows.iter().find(|(f, _)| f == "Δ May").unwrap();
        assert_eq!(delta.1.parse::<f64>().unwrap(), -1.0);
    }

    #[test]
    fn write_export_creates_file() {
        let (_file, table) = load_fixture(HEALTH_CSV);
        let record = table.select("Maternal Health", "ANC").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(download_filename(&record.parameter));

        write_export(&record, &path).unwrap();
        let written = fs::read(&path).unwrap();
        assert_eq!(written, export_csv(&record).unwrap());
    }

    #[test]
    fn filename_replaces_every_space() {
        assert_eq!(download_filename("DPT3"), "DPT3_summary.csv");
        assert_eq!(
            download_filename("Full Immunization  Rate"),
            "Full_Immunization__Rate_summary.csv"
        );
    }
}
