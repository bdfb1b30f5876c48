//! Health Table Module
//! The cleaned, TOTAL-only table and single-row selections out of it.

use crate::data::columns::ColumnLayout;
use crate::data::loader::LoaderError;
use crate::data::selector::Catalog;
use polars::prelude::*;

/// Immutable snapshot of the loaded indicator table.
#[derive(Debug)]
pub struct HealthTable {
    frame: DataFrame,
    layout: ColumnLayout,
    catalog: Catalog,
}

impl HealthTable {
    pub(crate) fn new(frame: DataFrame, layout: ColumnLayout) -> Result<Self, LoaderError> {
        let catalog = Catalog::from_frame(&frame)?;
        Ok(Self {
            frame,
            layout,
            catalog,
        })
    }

    #[cfg(test)]
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    /// Narrow the table to the row for `(indicator, parameter)`.
    pub fn select(&self, indicator: &str, parameter: &str) -> Option<SelectedRecord> {
        let row = self.catalog.row_index(indicator, parameter)?;
        Some(SelectedRecord {
            indicator: indicator.to_string(),
            parameter: parameter.to_string(),
            row: self.frame.slice(row as i64, 1),
        })
    }
}

/// One row of the table picked by the user.
#[derive(Debug, Clone)]
pub struct SelectedRecord {
    pub indicator: String,
    pub parameter: String,
    row: DataFrame,
}

impl SelectedRecord {
    /// Numeric value of a column, `None` when absent, null or non-numeric.
    pub fn value(&self, column: &str) -> Option<f64> {
        let values = self.row.column(column).ok()?.cast(&DataType::Float64).ok()?;
        values.f64().ok()?.get(0).filter(|v| !v.is_nan())
    }

    /// Every field of the row as `(column, text)` in table order.
    pub fn fields(&self) -> Vec<(String, String)> {
        self.row
            .get_columns()
            .iter()
            .map(|column| {
                let text = column
                    .as_materialized_series()
                    .get(0)
                    .map(cell_text)
                    .unwrap_or_default();
                (column.name().to_string(), text)
            })
            .collect()
    }
}

fn cell_text(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}
