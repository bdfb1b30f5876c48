//! Chart Viewer Widget
//! Central panel: KPI cards, monthly trend chart and the transposed raw row.

use crate::charts::{chart_title, ChartKind, TrendPlotter};
use crate::data::{export_rows, kpis, reshape, Band, HealthTable, KpiTriple, SelectedRecord, SelectionState, TidyRow};
use egui::{Color32, RichText, ScrollArea};
use log::debug;

const CHART_HEIGHT: f32 = 380.0;
const POSITIVE: Color32 = Color32::from_rgb(40, 167, 69);
const NEGATIVE: Color32 = Color32::from_rgb(220, 53, 69);

/// Everything derived from one selection. Rebuilt from scratch on change.
pub struct DashboardSnapshot {
    pub record: SelectedRecord,
    pub kpis: Result<KpiTriple, String>,
    pub rows: Result<Vec<TidyRow>, String>,
    pub fields: Vec<(String, String)>,
}

impl DashboardSnapshot {
    /// `None` until both dropdowns hold a pair present in the table.
    pub fn compute(table: &HealthTable, selection: &SelectionState) -> Option<Self> {
        let (indicator, parameter) = selection.pair()?;
        let record = table.select(indicator, parameter)?;
        debug!("recomputing dashboard for {} / {}", indicator, parameter);

        Some(Self {
            kpis: kpis(&record).map_err(|e| e.to_string()),
            rows: reshape(&record, table.layout()).map_err(|e| e.to_string()),
            fields: export_rows(&record),
            record,
        })
    }
}

/// Central dashboard area.
#[derive(Default)]
pub struct ChartViewer {
    snapshot: Option<DashboardSnapshot>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_snapshot(&mut self, snapshot: Option<DashboardSnapshot>) {
        self.snapshot = snapshot;
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    /// Draw the dashboard for the current snapshot
    pub fn show(&self, ui: &mut egui::Ui, kind: ChartKind) {
        let Some(snapshot) = &self.snapshot else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No data for the current selection").size(20.0));
            });
            return;
        };
        let parameter = &snapshot.record.parameter;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                // ===== KPI Cards =====
                ui.label(
                    RichText::new(format!("📌 KPI Summary: {}", parameter))
                        .size(18.0)
                        .strong(),
                );
                ui.add_space(8.0);

                match &snapshot.kpis {
                    Ok(kpi) => {
                        ui.columns(3, |columns| {
                            for (column, band) in columns.iter_mut().zip(Band::ALL) {
                                Self::kpi_card(column, &format!("📅 {}", band), kpi.value(band), None);
                            }
                            Self::kpi_card(&mut columns[2], "📈 Yearly Difference", kpi.delta, Some(kpi.delta));
                        });
                    }
                    Err(error) => {
                        ui.label(RichText::new(format!("⚠ {}", error)).color(NEGATIVE));
                    }
                }

                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                // ===== Trend Chart =====
                ui.label(RichText::new("📈 Monthly Trend Comparison").size(18.0).strong());
                ui.add_space(5.0);

                match &snapshot.rows {
                    Ok(rows) if rows.iter().any(|r| r.value.is_some()) => {
                        ui.label(RichText::new(chart_title(parameter)).size(14.0));
                        TrendPlotter::draw(ui, parameter, rows, kind, CHART_HEIGHT);
                    }
                    Ok(_) => {
                        ui.label(RichText::new("No monthly values for this parameter").color(Color32::GRAY));
                    }
                    Err(error) => {
                        ui.label(RichText::new(format!("⚠ {}", error)).color(NEGATIVE));
                    }
                }

                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                // ===== Raw Data =====
                egui::CollapsingHeader::new(RichText::new("📋 Raw Data (Transposed)").size(16.0).strong())
                    .default_open(true)
                    .show(ui, |ui| {
                        Self::draw_fields_table(ui, &snapshot.fields);
                    });
            });
    }

    fn kpi_card(ui: &mut egui::Ui, label: &str, value: i64, delta: Option<i64>) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(label).size(13.0).color(Color32::GRAY));
                ui.label(RichText::new(group_digits(value)).size(28.0).strong());
                if let Some(delta) = delta {
                    let (arrow, color) = if delta >= 0 {
                        ("▲", POSITIVE)
                    } else {
                        ("▼", NEGATIVE)
                    };
                    ui.label(
                        RichText::new(format!("{} {:+}", arrow, delta))
                            .size(13.0)
                            .color(color),
                    );
                }
            });
    }

    fn draw_fields_table(ui: &mut egui::Ui, fields: &[(String, String)]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("raw_fields")
                    .striped(true)
                    .num_columns(2)
                    .min_col_width(120.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Field").strong().size(12.0));
                        ui.label(RichText::new("Value").strong().size(12.0));
                        ui.end_row();

                        for (field, value) in fields {
                            ui.label(RichText::new(field).size(12.0));
                            ui.label(RichText::new(value).size(12.0));
                            ui.end_row();
                        }
                    });
            });
    }
}

/// `1234567` -> `1,234,567`
fn group_digits(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Month;
    use std::io::Write;

    #[test]
    fn digits_are_grouped_in_thousands() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1,000");
        assert_eq!(group_digits(-1234567), "-1,234,567");
    }

    #[test]
    fn snapshot_requires_a_complete_pair() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "Type,Indicators,Parameters,Total 2011-2012,Total 2012-2013,April 11-12,April 12-13\n\
             TOTAL,Immunization,DPT3,100,120,8,10\n"
        )
        .unwrap();
        let cache = crate::data::TableCache::new(file.path());
        let table = cache.get_or_load().unwrap();

        let mut selection = SelectionState::default();
        assert!(DashboardSnapshot::compute(&table, &selection).is_none());

        selection.sync(table.catalog());
        let snapshot = DashboardSnapshot::compute(&table, &selection).unwrap();
        assert_eq!(snapshot.kpis, Ok(KpiTriple::new(100, 120)));
        let rows = snapshot.rows.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.month == Month::April));
        assert_eq!(snapshot.fields.len(), 7);
    }
}
