//! Reshaper Module
//! Melts the two wide blocks of monthly columns into tidy (Month, Value, Year) rows.

use crate::data::columns::{Band, ColumnLayout, Month};
use crate::data::table::SelectedRecord;
use log::debug;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ReshapeError {
    #[error("Column '{column}' does not start with a month name (found '{token}')")]
    UnknownMonth { column: String, token: String },
}

/// One observation of the monthly trend.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyRow {
    pub month: Month,
    /// `None` when the cell is empty or not numeric.
    pub value: Option<f64>,
    pub band: Band,
}

impl TidyRow {
    /// Year label of the row, e.g. `2011–12`.
    pub fn year(&self) -> &'static str {
        self.band.label()
    }
}

/// Reshape the selected record into tidy rows in fiscal month order.
///
/// Band A rows are emitted before band B rows and the sort is stable, so
/// within a month the 2011–12 observation comes first.
pub fn reshape(
    record: &SelectedRecord,
    layout: &ColumnLayout,
) -> Result<Vec<TidyRow>, ReshapeError> {
    if let Some(unknown) = layout.unknown_months.first() {
        return Err(ReshapeError::UnknownMonth {
            column: unknown.name.clone(),
            token: unknown.token.clone(),
        });
    }

    let mut rows: Vec<TidyRow> = Band::ALL
        .iter()
        .flat_map(|&band| {
            layout.month_columns_for(band).map(move |column| TidyRow {
                month: column.month,
                value: record.value(&column.name),
                band,
            })
        })
        .collect();
    rows.sort_by_key(|row| row.month);

    debug!(
        "reshaped {} / {} into {} rows",
        record.indicator,
        record.parameter,
        rows.len()
    );
    Ok(rows)
}
