//! Selector Module
//! Indicator/parameter domains and the dependent dropdown state.

use crate::data::columns::{INDICATOR_COLUMN, PARAMETER_COLUMN};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Sorted key domains and the row of every (indicator, parameter) pair.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    parameters: BTreeMap<String, BTreeSet<String>>,
    rows: HashMap<(String, String), usize>,
}

impl Catalog {
    pub fn from_frame(df: &DataFrame) -> PolarsResult<Self> {
        let indicators = df.column(INDICATOR_COLUMN)?.str()?;
        let parameters = df.column(PARAMETER_COLUMN)?.str()?;

        let mut catalog = Catalog::default();
        for (row, (indicator, parameter)) in indicators
            .into_iter()
            .zip(parameters.into_iter())
            .enumerate()
        {
            if let (Some(i), Some(p)) = (indicator, parameter) {
                catalog
                    .parameters
                    .entry(i.to_string())
                    .or_default()
                    .insert(p.to_string());
                catalog
                    .rows
                    .entry((i.to_string(), p.to_string()))
                    .or_insert(row);
            }
        }
        Ok(catalog)
    }

    /// Sorted distinct indicators.
    pub fn indicators(&self) -> Vec<&str> {
        self.parameters.keys().map(String::as_str).collect()
    }

    /// Sorted distinct parameters recorded under `indicator`.
    pub fn parameters(&self, indicator: &str) -> Vec<&str> {
        self.parameters
            .get(indicator)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, indicator: &str, parameter: &str) -> bool {
        self.parameters
            .get(indicator)
            .is_some_and(|set| set.contains(parameter))
    }

    pub fn row_index(&self, indicator: &str, parameter: &str) -> Option<usize> {
        self.rows
            .get(&(indicator.to_string(), parameter.to_string()))
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// The two dropdown cells. The parameter is re-derived whenever the
/// indicator changes so it always lies in the indicator's domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    indicator: Option<String>,
    parameter: Option<String>,
}

impl SelectionState {
    pub fn indicator(&self) -> Option<&str> {
        self.indicator.as_deref()
    }

    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }

    /// Both cells filled.
    pub fn pair(&self) -> Option<(&str, &str)> {
        Some((self.indicator()?, self.parameter()?))
    }

    /// Bring both cells back into their domains, defaulting to the first
    /// entry. Used at start-up and after the table is reloaded.
    pub fn sync(&mut self, catalog: &Catalog) {
        let indicator = self
            .indicator
            .take()
            .filter(|i| catalog.indicators().contains(&i.as_str()))
            .or_else(|| catalog.indicators().first().map(|s| s.to_string()));
        self.indicator = indicator;
        self.rederive_parameter(catalog);
    }

    /// Change the indicator. Returns `false` for a value outside its domain.
    pub fn set_indicator(&mut self, catalog: &Catalog, indicator: &str) -> bool {
        if !catalog.indicators().contains(&indicator) {
            return false;
        }
        self.indicator = Some(indicator.to_string());
        self.rederive_parameter(catalog);
        true
    }

    /// Change the parameter. Returns `false` for a value outside the
    /// current indicator's domain.
    pub fn set_parameter(&mut self, catalog: &Catalog, parameter: &str) -> bool {
        match self.indicator.as_deref() {
            Some(indicator) if catalog.contains(indicator, parameter) => {
                self.parameter = Some(parameter.to_string());
                true
            }
            _ => false,
        }
    }

    fn rederive_parameter(&mut self, catalog: &Catalog) {
        let Some(indicator) = self.indicator.as_deref() else {
            self.parameter = None;
            return;
        };
        let keep = self
            .parameter
            .as_deref()
            .is_some_and(|p| catalog.contains(indicator, p));
        if !keep {
            self.parameter = catalog
                .parameters(indicator)
                .first()
                .map(|s| s.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{load_fixture, HEALTH_CSV};

    fn catalog() -> Catalog {
        let df = DataFrame::new(vec![
            Column::new(
                INDICATOR_COLUMN.into(),
                vec!["Maternal Health", "Immunization", "Immunization", "Immunization"],
            ),
            Column::new(
                PARAMETER_COLUMN.into(),
                vec!["ANC", "DPT3", "BCG", "DPT3"],
            ),
        ])
        .unwrap();
        Catalog::from_frame(&df).unwrap()
    }

    #[test]
    fn domains_are_sorted_and_distinct() {
        let catalog = catalog();
        assert_eq!(catalog.indicators(), vec!["Immunization", "Maternal Health"]);
        assert_eq!(catalog.parameters("Immunization"), vec!["BCG", "DPT3"]);
        assert_eq!(catalog.parameters("Maternal Health"), vec!["ANC"]);
        assert!(catalog.parameters("Nutrition").is_empty());
    }

    #[test]
    fn first_row_wins_for_repeated_pairs() {
        assert_eq!(catalog().row_index("Immunization", "DPT3"), Some(1));
        assert_eq!(catalog().row_index("Immunization", "ANC"), None);
    }

    #[test]
    fn sync_picks_first_entries() {
        let catalog = catalog();
        let mut state = SelectionState::default();
        state.sync(&catalog);
        assert_eq!(state.pair(), Some(("Immunization", "BCG")));
    }

    #[test]
    fn changing_indicator_resets_out_of_domain_parameter() {
        let catalog = catalog();
        let mut state = SelectionState::default();
        state.sync(&catalog);
        assert!(state.set_parameter(&catalog, "DPT3"));

        assert!(state.set_indicator(&catalog, "Maternal Health"));
        assert_eq!(state.pair(), Some(("Maternal Health", "ANC")));

        for indicator in catalog.indicators() {
            state.set_indicator(&catalog, indicator);
            let parameter = state.parameter().unwrap();
            assert!(catalog.parameters(indicator).contains(&parameter));
        }
    }

    #[test]
    fn reselecting_same_indicator_keeps_parameter() {
        let catalog = catalog();
        let mut state = SelectionState::default();
        state.sync(&catalog);
        state.set_parameter(&catalog, "DPT3");
        state.set_indicator(&catalog, "Immunization");
        assert_eq!(state.parameter(), Some("DPT3"));
    }

    #[test]
    fn out_of_domain_values_are_rejected() {
        let catalog = catalog();
        let mut state = SelectionState::default();
        assert!(!state.set_parameter(&catalog, "DPT3"));
        state.sync(&catalog);
        assert!(!state.set_indicator(&catalog, "Nutrition"));
        assert!(!state.set_parameter(&catalog, "ANC"));
        assert_eq!(state.pair(), Some(("Immunization", "BCG")));
    }

    #[test]
    fn sync_clears_everything_for_empty_catalog() {
        let mut state = SelectionState::default();
        state.sync(&catalog());
        state.sync(&Catalog::default());
        assert_eq!(state.indicator(), None);
        assert_eq!(state.parameter(), None);
    }

    #[test]
    fn select_from_loaded_table() {
        let (_file, table) = load_fixture(HEALTH_CSV);
        assert_eq!(
            table.catalog().indicators(),
            vec!["Immunization", "Maternal Health"]
        );
        assert!(table.select("Immunization", "DPT3").is_some());
        assert!(table.select("Immunization", "ANC").is_none());

        // Non-TOTAL rows never resurface.
        assert!(table.select("Immunization", "OPV").is_none());
    }
}
