//! Charts module - Monthly trend rendering

mod plotter;
mod renderer;

use crate::data::{Band, Month, TidyRow};
use serde::{Deserialize, Serialize};

pub use plotter::TrendPlotter;
pub use renderer::TrendRenderer;

/// How the monthly trend is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 2] = [ChartKind::Line, ChartKind::Bar];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
        }
    }
}

/// Plottable points of one year, split into runs of consecutive months.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSeries {
    pub band: Band,
    /// A blank or absent month ends a run; lines are not drawn across it.
    pub segments: Vec<Vec<(Month, f64)>>,
}

impl BandSeries {
    pub fn points(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        self.segments.iter().flatten().copied()
    }
}

/// Split tidy rows into one series per band. Bands without values are dropped.
pub fn band_series(rows: &[TidyRow]) -> Vec<BandSeries> {
    Band::ALL
        .iter()
        .map(|&band| {
            let mut segments: Vec<Vec<(Month, f64)>> = Vec::new();
            let mut run: Vec<(Month, f64)> = Vec::new();
            for row in rows.iter().filter(|r| r.band == band) {
                let contiguous = run
                    .last()
                    .map_or(true, |(prev, _)| prev.fiscal_index() + 1 == row.month.fiscal_index());
                match row.value {
                    Some(v) if contiguous => run.push((row.month, v)),
                    Some(v) => {
                        segments.push(std::mem::take(&mut run));
                        run.push((row.month, v));
                    }
                    None if !run.is_empty() => segments.push(std::mem::take(&mut run)),
                    None => {}
                }
            }
            if !run.is_empty() {
                segments.push(run);
            }
            BandSeries { band, segments }
        })
        .filter(|s| !s.segments.is_empty())
        .collect()
}

/// Chart title for a parameter.
pub fn chart_title(parameter: &str) -> String {
    format!("{} – Monthly Comparison", parameter)
}

/// Value range covering every point and zero.
fn value_range(series: &[BandSeries]) -> (f64, f64) {
    let (min, max) = series
        .iter()
        .flat_map(|s| s.points().map(|(_, v)| v))
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if max - min < f64::EPSILON {
        (min, min + 1.0)
    } else {
        (min, max)
    }
}

/// Axis label for a fiscal month index; blank between ticks.
fn month_tick_label(x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 0.25 || index < 0.0 {
        return String::new();
    }
    Month::from_fiscal_index(index as usize)
        .map(|m| m.abbrev().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(month: Month, value: Option<f64>, band: Band) -> TidyRow {
        TidyRow { month, value, band }
    }

    #[test]
    fn series_split_by_band_and_skip_gaps() {
        let rows = vec![
            row(Month::April, None, Band::A),
            row(Month::April, Some(10.0), Band::B),
            row(Month::May, Some(9.0), Band::A),
            row(Month::May, Some(11.0), Band::B),
        ];
        let series = band_series(&rows);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].band, Band::A);
        assert_eq!(series[0].segments, vec![vec![(Month::May, 9.0)]]);
        assert_eq!(
            series[1].segments,
            vec![vec![(Month::April, 10.0), (Month::May, 11.0)]]
        );
    }

    #[test]
    fn gap_inside_a_band_splits_the_line() {
        let rows = vec![
            row(Month::April, Some(1.0), Band::A),
            row(Month::May, Some(2.0), Band::A),
            row(Month::June, None, Band::A),
            row(Month::July, Some(4.0), Band::A),
            row(Month::August, Some(5.0), Band::A),
        ];
        let series = band_series(&rows);

        assert_eq!(series.len(), 1);
        assert_eq!(
            series[0].segments,
            vec![
                vec![(Month::April, 1.0), (Month::May, 2.0)],
                vec![(Month::July, 4.0), (Month::August, 5.0)],
            ]
        );
        assert_eq!(series[0].points().count(), 4);
    }

    #[test]
    fn absent_month_column_also_splits_the_line() {
        let rows = vec![
            row(Month::April, Some(1.0), Band::B),
            row(Month::June, Some(3.0), Band::B),
        ];
        let series = band_series(&rows);
        assert_eq!(series[0].segments.len(), 2);
    }

    #[test]
    fn empty_band_is_dropped() {
        let rows = vec![row(Month::June, Some(3.0), Band::B)];
        let series = band_series(&rows);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].band, Band::B);
    }

    #[test]
    fn value_range_includes_zero() {
        let series = band_series(&[
            row(Month::April, Some(5.0), Band::A),
            row(Month::May, Some(-2.0), Band::B),
        ]);
        assert_eq!(value_range(&series), (-2.0, 5.0));
        assert_eq!(value_range(&[]), (0.0, 1.0));
    }

    #[test]
    fn title_mentions_parameter() {
        assert_eq!(chart_title("DPT3"), "DPT3 – Monthly Comparison");
    }

    #[test]
    fn month_labels_only_on_ticks() {
        assert_eq!(month_tick_label(0.0), "Apr");
        assert_eq!(month_tick_label(11.0), "Mar");
        assert_eq!(month_tick_label(0.5), "");
        assert_eq!(month_tick_label(-0.5), "");
        assert_eq!(month_tick_label(12.0), "");
    }
}
