//! Control Panel Widget
//! Left side panel with the indicator/parameter dropdowns and export actions.

use crate::charts::ChartKind;
use crate::data::{Catalog, SelectionState};
use egui::{Color32, ComboBox, RichText};
use std::path::{Path, PathBuf};

/// Left side control panel with selection and export controls.
pub struct ControlPanel {
    pub selection: SelectionState,
    pub chart_kind: ChartKind,
    pub status: String,
    /// Last file written by an export, offered for opening.
    pub last_output: Option<PathBuf>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            selection: SelectionState::default(),
            chart_kind: ChartKind::default(),
            status: "Ready".to_string(),
            last_output: None,
        }
    }
}

impl ControlPanel {
    pub fn new(chart_kind: ChartKind) -> Self {
        Self {
            chart_kind,
            ..Self::default()
        }
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        catalog: &Catalog,
        source: &Path,
        row_count: usize,
        has_selection: bool,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let name = source
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| source.display().to_string());
                ui.label(RichText::new(name).size(12.0));
                ui.label(
                    RichText::new(format!("{} TOTAL rows", row_count))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                if ui.small_button("🔄 Reload data").clicked() {
                    action = ControlPanelAction::Reload;
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(RichText::new("🔍 Filter").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 80.0;
        let combo_width = 190.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Indicator:"));
            ComboBox::from_id_salt("indicator")
                .width(combo_width)
                .selected_text(self.selection.indicator().unwrap_or("-"))
                .show_ui(ui, |ui| {
                    for indicator in catalog.indicators() {
                        let selected = self.selection.indicator() == Some(indicator);
                        if ui.selectable_label(selected, indicator).clicked()
                            && !selected
                            && self.selection.set_indicator(catalog, indicator)
                        {
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);

        // Parameter list is re-derived from the current indicator every frame
        let parameters = self
            .selection
            .indicator()
            .map(|i| catalog.parameters(i))
            .unwrap_or_default();

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Parameter:"));
            ComboBox::from_id_salt("parameter")
                .width(combo_width)
                .selected_text(self.selection.parameter().unwrap_or("-"))
                .show_ui(ui, |ui| {
                    for parameter in &parameters {
                        let selected = self.selection.parameter() == Some(*parameter);
                        if ui.selectable_label(selected, *parameter).clicked()
                            && !selected
                            && self.selection.set_parameter(catalog, parameter)
                        {
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Chart Type Section =====
        ui.label(RichText::new("📊 Chart Type").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            for kind in ChartKind::ALL {
                ui.radio_value(&mut self.chart_kind, kind, kind.label());
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(has_selection, |ui| {
                let button = egui::Button::new(RichText::new("⬇ Download Filtered Data").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::DownloadCsv;
                }

                ui.add_space(8.0);

                let button = egui::Button::new(RichText::new("🖼 Save Chart PNG").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::SaveChart;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Saved") || self.status.starts_with("Reloaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        if self.last_output.is_some() && ui.small_button("📂 Open last export").clicked() {
            action = ControlPanelAction::OpenLastOutput;
        }

        action
    }

    /// Set status line
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    Reload,
    DownloadCsv,
    SaveChart,
    OpenLastOutput,
}
