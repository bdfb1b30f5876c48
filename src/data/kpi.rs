//! KPI Extractor Module
//! Year-over-year totals of the selected record.

use crate::data::columns::Band;
use crate::data::table::SelectedRecord;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum KpiError {
    #[error("Yearly total '{column}' is empty or not numeric")]
    MissingTotal { column: String },
}

/// Yearly totals of both bands and their signed difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KpiTriple {
    pub value_a: i64,
    pub value_b: i64,
    /// `value_b - value_a`, saturating at the i64 bounds
    pub delta: i64,
}

impl KpiTriple {
    pub fn new(value_a: i64, value_b: i64) -> Self {
        Self {
            value_a,
            value_b,
            delta: value_b.saturating_sub(value_a),
        }
    }

    pub fn value(&self, band: Band) -> i64 {
        match band {
            Band::A => self.value_a,
            Band::B => self.value_b,
        }
    }
}

/// Extract the KPI triple. Totals are truncated toward zero.
pub fn kpis(record: &SelectedRecord) -> Result<KpiTriple, KpiError> {
    let total = |band: Band| {
        record
            .value(band.total_column())
            .map(|v| v.trunc() as i64)
            .ok_or_else(|| KpiError::MissingTotal {
                column: band.total_column().to_string(),
            })
    };
    Ok(KpiTriple::new(total(Band::A)?, total(Band::B)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{load_fixture, HEALTH_CSV};

    #[test]
    fn immunization_example() {
        let (_file, table) = load_fixture(HEALTH_CSV);
        let record = table.select("Immunization", "DPT3").unwrap();
        assert_eq!(kpis(&record), Ok(KpiTriple::new(100, 120)));
        assert_eq!(kpis(&record).unwrap().delta, 20);
    }

    #[test]
    fn negative_delta() {
        let (_file, table) = load_fixture(HEALTH_CSV);
        let record = table.select("Immunization", "BCG").unwrap();
        let kpi = kpis(&record).unwrap();
        assert_eq!((kpi.value_a, kpi.value_b, kpi.delta), (250, 240, -10));
        assert_eq!(kpi.delta, kpi.value(Band::B) - kpi.value(Band::A));
    }

    #[test]
    fn delta_is_b_minus_a_for_every_row() {
        let (_file, table) = load_fixture(HEALTH_CSV);
        let catalog = table.catalog();
        for indicator in catalog.indicators() {
            for parameter in catalog.parameters(indicator) {
                let record = table.select(indicator, parameter).unwrap();
                let kpi = kpis(&record).unwrap();
                assert_eq!(kpi.delta, kpi.value_b - kpi.value_a);
            }
        }
    }

    #[test]
    fn fractional_totals_truncate() {
        let csv = "Type,Indicators,Parameters,Total 2011-2012,Total 2012-2013\n\
                   TOTAL,Nutrition,IFA,10.9,-3.7\n";
        let (_file, table) = load_fixture(csv);
        let record = table.select("Nutrition", "IFA").unwrap();
        assert_eq!(kpis(&record), Ok(KpiTriple::new(10, -3)));
    }

    #[test]
    fn huge_totals_saturate_instead_of_overflowing() {
        let csv = "Type,Indicators,Parameters,Total 2011-2012,Total 2012-2013\n\
                   TOTAL,Nutrition,IFA,-1e19,1e19\n";
        let (_file, table) = load_fixture(csv);
        let record = table.select("Nutrition", "IFA").unwrap();
        let kpi = kpis(&record).unwrap();
        assert_eq!((kpi.value_a, kpi.value_b), (i64::MIN, i64::MAX));
        assert_eq!(kpi.delta, i64::MAX);
        assert_eq!(KpiTriple::new(i64::MAX, i64::MIN).delta, i64::MIN);
    }

    #[test]
    fn missing_total_is_an_error() {
        let csv = "Type,Indicators,Parameters,Total 2011-2012,Total 2012-2013\n\
                   TOTAL,Nutrition,IFA,,7\n";
        let (_file, table) = load_fixture(csv);
        let record = table.select("Nutrition", "IFA").unwrap();
        assert_eq!(
            kpis(&record),
            Err(KpiError::MissingTotal {
                column: "2011-2012".to_string(),
            })
        );
    }
}
