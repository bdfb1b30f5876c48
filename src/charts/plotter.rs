//! Trend Plotter Module
//! Interactive monthly comparison chart using egui_plot.

use crate::charts::{band_series, month_tick_label, BandSeries, ChartKind};
use crate::data::{Band, Month, TidyRow};
use egui::Color32;
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

/// Series colors
pub const BAND_A_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const BAND_B_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

const BAR_WIDTH: f64 = 0.38;

pub fn band_color(band: Band) -> Color32 {
    match band {
        Band::A => BAND_A_COLOR,
        Band::B => BAND_B_COLOR,
    }
}

/// Draws the monthly trend with egui_plot.
pub struct TrendPlotter;

impl TrendPlotter {
    /// Draw the chart. X positions are fiscal month indices (April = 0).
    pub fn draw(ui: &mut egui::Ui, id: &str, rows: &[TidyRow], kind: ChartKind, height: f32) {
        let series = band_series(rows);

        Plot::new(format!("trend_{}", id))
            .height(height)
            .legend(Legend::default().position(egui_plot::Corner::RightTop))
            .x_axis_label("Month")
            .y_axis_label("Value")
            .allow_scroll(false)
            .include_x(-0.5)
            .include_x(11.5)
            .include_y(0.0)
            .x_grid_spacer(|_input| {
                (0..12)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .x_axis_formatter(|mark, _range| month_tick_label(mark.value))
            .label_formatter(|name, value| {
                let month = month_tick_label(value.x);
                if name.is_empty() {
                    format!("{}\n{:.0}", month, value.y)
                } else {
                    format!("{}\n{}: {:.0}", name, month, value.y)
                }
            })
            .show(ui, |plot_ui| match kind {
                ChartKind::Line => {
                    for s in &series {
                        let color = band_color(s.band);
                        // One line per run; the shared name keeps a single legend entry
                        for segment in &s.segments {
                            plot_ui.line(
                                Line::new(Self::plot_points(segment.iter().copied()))
                                    .color(color)
                                    .width(2.0)
                                    .name(s.band.label()),
                            );
                        }
                        plot_ui.points(
                            Points::new(Self::plot_points(s.points()))
                                .radius(4.0)
                                .color(color)
                                .name(s.band.label()),
                        );
                    }
                }
                ChartKind::Bar => {
                    for s in &series {
                        plot_ui.bar_chart(Self::bars(s));
                    }
                }
            });
    }

    fn plot_points(points: impl Iterator<Item = (Month, f64)>) -> PlotPoints {
        points
            .map(|(month, v)| [month.fiscal_index() as f64, v])
            .collect()
    }

    /// Grouped bars: 2011–12 left of the month tick, 2012–13 right.
    fn bars(series: &BandSeries) -> BarChart {
        let offset = match series.band {
            Band::A => -BAR_WIDTH / 2.0,
            Band::B => BAR_WIDTH / 2.0,
        };
        let color = band_color(series.band);
        let bars = series
            .points()
            .map(|(month, v)| {
                Bar::new(month.fiscal_index() as f64 + offset, v)
                    .width(BAR_WIDTH)
                    .name(month.name())
                    .fill(color)
            })
            .collect();
        BarChart::new(bars).color(color).name(series.band.label())
    }
}
