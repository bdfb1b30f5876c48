//! Static Chart Renderer
//! Renders the monthly trend to a PNG file with plotters.
//!
//! Layout:
//! 1. Title: "{parameter} – Monthly Comparison"
//! 2. Month axis (April ... March), value axis
//! 3. One line (with markers) or one bar group per year
//! 4. Legend box, upper right

use crate::charts::{band_series, chart_title, month_tick_label, value_range, ChartKind};
use crate::data::{Band, Month, TidyRow};
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const BAR_WIDTH: f64 = 0.38;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to draw")]
    NoData,
    #[error("Drawing failed: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Draw(err.to_string())
}

fn band_rgb(band: Band) -> RGBColor {
    match band {
        Band::A => RGBColor(52, 152, 219),
        Band::B => RGBColor(231, 76, 60),
    }
}

pub struct TrendRenderer;

impl TrendRenderer {
    /// Render the trend chart for `parameter` to `path` as PNG.
    pub fn render_png(
        path: &Path,
        parameter: &str,
        rows: &[TidyRow],
        kind: ChartKind,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let series = band_series(rows);
        if series.is_empty() {
            return Err(RenderError::NoData);
        }

        let (lo, hi) = value_range(&series);
        let pad = (hi - lo) * 0.1;
        let y_min = if lo < 0.0 { lo - pad } else { 0.0 };
        let y_max = hi + pad;

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(chart_title(parameter), ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..11.5f64, y_min..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(12)
            .x_label_formatter(&|x: &f64| month_tick_label(*x))
            .x_desc("Month")
            .y_desc("Value")
            .draw()
            .map_err(draw_err)?;

        for s in &series {
            let color = band_rgb(s.band);
            let to_xy = |(month, v): (Month, f64)| (month.fiscal_index() as f64, v);

            match kind {
                ChartKind::Line => {
                    // One line per run so blank months stay blank
                    for (i, segment) in s.segments.iter().enumerate() {
                        let drawn = chart
                            .draw_series(LineSeries::new(
                                segment.iter().copied().map(to_xy),
                                color.stroke_width(2),
                            ))
                            .map_err(draw_err)?;
                        if i == 0 {
                            drawn.label(s.band.label()).legend(move |(x, y)| {
                                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                            });
                        }
                    }
                    chart
                        .draw_series(
                            s.points()
                                .map(to_xy)
                                .map(|point| Circle::new(point, 4, color.filled())),
                        )
                        .map_err(draw_err)?;
                }
                ChartKind::Bar => {
                    let offset = match s.band {
                        Band::A => -BAR_WIDTH,
                        Band::B => 0.0,
                    };
                    chart
                        .draw_series(s.points().map(to_xy).map(|(x, v)| {
                            Rectangle::new(
                                [(x + offset, 0.0), (x + offset + BAR_WIDTH, v)],
                                color.filled(),
                            )
                        }))
                        .map_err(draw_err)?
                        .label(s.band.label())
                        .legend(move |(x, y)| {
                            Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled())
                        });
                }
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rows_are_rejected_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let result = TrendRenderer::render_png(&path, "DPT3", &[], ChartKind::Line, (800, 600));
        assert!(matches!(result, Err(RenderError::NoData)));
        assert!(!path.exists());
    }
}
