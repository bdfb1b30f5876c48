//! SANC-I Dashboard Main Application
//! Main window with control panel and dashboard view.

use crate::charts::TrendRenderer;
use crate::config::DashboardConfig;
use crate::data::{download_filename, write_export, HealthTable, TableCache};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, DashboardSnapshot};
use egui::{RichText, SidePanel};
use log::{error, info, warn};
use std::sync::Arc;

const CHART_PNG_SIZE: (u32, u32) = (1400, 800);

/// Main application window.
pub struct DashboardApp {
    title: String,
    cache: TableCache,
    table: Arc<HealthTable>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    /// `table` is the result of the first `cache.get_or_load()`.
    pub fn new(config: &DashboardConfig, cache: TableCache, table: Arc<HealthTable>) -> Self {
        let mut app = Self {
            title: config.title.clone(),
            cache,
            table,
            control_panel: ControlPanel::new(config.default_chart),
            chart_viewer: ChartViewer::new(),
        };
        app.control_panel.selection.sync(app.table.catalog());
        if app.table.catalog().is_empty() {
            warn!("{} has no TOTAL rows", app.cache.path().display());
            app.control_panel.set_status("No TOTAL rows in data source");
        }
        app.refresh();
        app
    }

    /// Recompute KPIs, tidy rows and the raw record for the current pair.
    fn refresh(&mut self) {
        let snapshot = DashboardSnapshot::compute(&self.table, &self.control_panel.selection);
        self.chart_viewer.set_snapshot(snapshot);
    }

    fn handle_reload(&mut self) {
        match self.cache.reload() {
            Ok(table) => {
                self.table = table;
                self.control_panel.selection.sync(self.table.catalog());
                self.refresh();
                self.control_panel
                    .set_status(format!("Reloaded {} rows", self.table.row_count()));
            }
            Err(e) => {
                error!("reload of {} failed: {}", self.cache.path().display(), e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    fn handle_download_csv(&mut self) {
        let Some(snapshot) = self.chart_viewer.snapshot() else {
            return;
        };
        let record = &snapshot.record;

        let output_path = match rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(download_filename(&record.parameter))
            .save_file()
        {
            Some(path) => path,
            None => return,
        };

        match write_export(record, &output_path) {
            Ok(()) => {
                info!("exported {} / {} to {}", record.indicator, record.parameter, output_path.display());
                self.control_panel
                    .set_status(format!("Saved {}", output_path.display()));
                self.control_panel.last_output = Some(output_path);
            }
            Err(e) => {
                error!("export failed: {}", e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    fn handle_save_chart(&mut self) {
        let Some(snapshot) = self.chart_viewer.snapshot() else {
            return;
        };
        let rows = match &snapshot.rows {
            Ok(rows) => rows,
            Err(e) => {
                self.control_panel.set_status(format!("Error: {}", e));
                return;
            }
        };
        let parameter = &snapshot.record.parameter;

        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(format!("{}_trend.png", parameter))
            .save_file()
        {
            Some(path) => path,
            None => return,
        };

        match TrendRenderer::render_png(
            &output_path,
            parameter,
            rows,
            self.control_panel.chart_kind,
            CHART_PNG_SIZE,
        ) {
            Ok(()) => {
                info!("chart for {} saved to {}", parameter, output_path.display());
                self.control_panel
                    .set_status(format!("Saved {}", output_path.display()));
                self.control_panel.last_output = Some(output_path);
            }
            Err(e) => {
                error!("chart render failed: {}", e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    fn handle_open_last(&mut self) {
        if let Some(path) = self.control_panel.last_output.clone() {
            if let Err(e) = open::that(&path) {
                warn!("could not open {}: {}", path.display(), e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let table = Arc::clone(&self.table);
                    let has_selection = self.chart_viewer.snapshot().is_some();
                    let action = self.control_panel.show(
                        ui,
                        table.catalog(),
                        self.cache.path(),
                        table.row_count(),
                        has_selection,
                    );

                    match action {
                        ControlPanelAction::SelectionChanged => self.refresh(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::DownloadCsv => self.handle_download_csv(),
                        ControlPanelAction::SaveChart => self.handle_save_chart(),
                        ControlPanelAction::OpenLastOutput => self.handle_open_last(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(RichText::new(&self.title).size(24.0).strong());
            ui.add_space(10.0);
            self.chart_viewer.show(ui, self.control_panel.chart_kind);
        });
    }
}
