//! Column Metadata Module
//! Header normalization and the month/band layout of the wide table.

use std::fmt;
use std::str::FromStr;

/// Key column holding the subtype filter.
pub const TYPE_COLUMN: &str = "Type";
/// Key column holding the top-level indicator.
pub const INDICATOR_COLUMN: &str = "Indicators";
/// Key column holding the sub-metric.
pub const PARAMETER_COLUMN: &str = "Parameters";
/// Only rows of this type are kept.
pub const TOTAL_TYPE: &str = "TOTAL";
/// Marker of the year-over-year delta columns after normalization.
pub const DELTA_MARKER: &str = "Δ";

/// Normalize a raw CSV header.
///
/// Quote characters are removed, surrounding whitespace trimmed, then
/// `Difference-` becomes `Δ ` and `Total ` is dropped, in that order.
pub fn normalize_header(raw: &str) -> String {
    raw.replace('"', "")
        .trim()
        .replace("Difference-", "Δ ")
        .replace("Total ", "")
}

/// Calendar month, ordered by the April-to-March fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
    January,
    February,
    March,
}

impl Month {
    /// All months in fiscal order.
    pub const FISCAL_ORDER: [Month; 12] = [
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
        Month::January,
        Month::February,
        Month::March,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
        }
    }

    /// Short label for crowded axes.
    pub fn abbrev(self) -> &'static str {
        &self.name()[..3]
    }

    /// Zero-based position in the fiscal year (April = 0).
    pub fn fiscal_index(self) -> usize {
        self as usize
    }

    pub fn from_fiscal_index(index: usize) -> Option<Month> {
        Self::FISCAL_ORDER.get(index).copied()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::FISCAL_ORDER
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// One of the two fiscal years being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    /// Fiscal year 2011-12
    A,
    /// Fiscal year 2012-13
    B,
}

impl Band {
    pub const ALL: [Band; 2] = [Band::A, Band::B];

    /// Substring identifying the band's monthly headers.
    pub fn token(self) -> &'static str {
        match self {
            Band::A => "11-12",
            Band::B => "12-13",
        }
    }

    /// Normalized header of the band's yearly total.
    pub fn total_column(self) -> &'static str {
        match self {
            Band::A => "2011-2012",
            Band::B => "2012-2013",
        }
    }

    /// Display label used for the Year series.
    pub fn label(self) -> &'static str {
        match self {
            Band::A => "2011–12",
            Band::B => "2012–13",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A monthly value column tagged with its month and band.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthColumn {
    pub name: String,
    pub month: Month,
    pub band: Band,
}

/// A monthly-looking header whose leading word is not a month name.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownMonthColumn {
    pub name: String,
    pub token: String,
}

/// Structured column metadata, built once per loaded table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnLayout {
    /// Every normalized header in table order.
    pub columns: Vec<String>,
    /// Monthly columns, band A first, each band in header order.
    pub month_columns: Vec<MonthColumn>,
    /// Monthly columns that could not be tagged with a month.
    pub unknown_months: Vec<UnknownMonthColumn>,
}

impl ColumnLayout {
    /// Classify normalized headers.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let columns: Vec<String> = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let mut month_columns = Vec::new();
        let mut unknown_months = Vec::new();

        for band in Band::ALL {
            for name in columns.iter().filter(|c| is_monthly(c) && c.contains(band.token())) {
                let token = first_alphabetic_run(name).unwrap_or_default();
                match token.parse::<Month>() {
                    Ok(month) => month_columns.push(MonthColumn {
                        name: name.clone(),
                        month,
                        band,
                    }),
                    Err(token) => {
                        if !unknown_months.iter().any(|u: &UnknownMonthColumn| &u.name == name) {
                            unknown_months.push(UnknownMonthColumn {
                                name: name.clone(),
                                token,
                            });
                        }
                    }
                }
            }
        }

        Self {
            columns,
            month_columns,
            unknown_months,
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Required columns absent from the table.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [TYPE_COLUMN, INDICATOR_COLUMN, PARAMETER_COLUMN]
            .into_iter()
            .chain(Band::ALL.iter().map(|b| b.total_column()))
            .filter(|name| !self.has_column(name))
            .collect()
    }

    pub fn month_columns_for(&self, band: Band) -> impl Iterator<Item = &MonthColumn> {
        self.month_columns.iter().filter(move |c| c.band == band)
    }
}

/// Header mentions a month name and is not a delta column.
fn is_monthly(name: &str) -> bool {
    !name.contains(DELTA_MARKER) && Month::FISCAL_ORDER.iter().any(|m| name.contains(m.name()))
}

/// First maximal run of alphabetic characters, e.g. `"April 11-12"` -> `"April"`.
fn first_alphabetic_run(name: &str) -> Option<&str> {
    let start = name.find(char::is_alphabetic)?;
    let rest = &name[start..];
    let end = rest
        .find(|c: char| !c.is_alphabetic())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}
