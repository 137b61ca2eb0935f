//! Control Panel Widget
//! Left side panel with file selection, figure toggles, and export controls.

use crate::charts::FigureKind;
use egui::{Color32, RichText};
use std::path::PathBuf;

/// User settings for figure building
#[derive(Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub selected_kinds: [bool; FigureKind::SELECTABLE.len()],
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            csv_path: None,
            selected_kinds: [true; FigureKind::SELECTABLE.len()],
        }
    }
}

/// Left side control panel with file selection and figure controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub row_count: usize,
    pub column_count: usize,
    pub numeric_columns: Vec<String>,
    pub progress: f32,
    pub status: String,
    pub build_enabled: bool,
    pub export_enabled: bool,
    pub open_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            row_count: 0,
            column_count: 0,
            numeric_columns: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            build_enabled: false,
            export_enabled: false,
            open_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update table info after CSV load
    pub fn update_table(&mut self, rows: usize, cols: usize, numeric_columns: Vec<String>) {
        self.row_count = rows;
        self.column_count = cols;
        self.build_enabled = !numeric_columns.is_empty();
        self.numeric_columns = numeric_columns;
        self.export_enabled = false;
    }

    /// Get the figure kinds currently toggled on
    pub fn selected_kinds(&self) -> Vec<FigureKind> {
        FigureKind::SELECTABLE
            .iter()
            .zip(self.settings.selected_kinds.iter())
            .filter(|(_, &selected)| selected)
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 ChartLab")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("CSV Figure Studio")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        if self.row_count > 0 {
            ui.add_space(5.0);
            ui.label(
                RichText::new(format!(
                    "{} rows, {} columns ({} numeric)",
                    self.row_count,
                    self.column_count,
                    self.numeric_columns.len()
                ))
                .size(11.0)
                .color(Color32::GRAY),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Figure Selection Section =====
        ui.label(RichText::new("📈 Figures").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                for (kind, selected) in FigureKind::SELECTABLE
                    .iter()
                    .zip(self.settings.selected_kinds.iter_mut())
                {
                    ui.checkbox(selected, kind.label());
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.build_enabled, |ui| {
                let button = egui::Button::new(RichText::new("▶ Build Figures").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::BuildFigures;
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(self.export_enabled, |ui| {
                ui.horizontal(|ui| {
                    ui.add_space(18.0);
                    let pdf_button = egui::Button::new(RichText::new("📄 Export PDF").size(13.0))
                        .min_size(egui::vec2(128.0, 30.0));
                    if ui.add(pdf_button).clicked() {
                        action = ControlPanelAction::ExportPdf;
                    }
                    let docx_button = egui::Button::new(RichText::new("📝 Export Word").size(13.0))
                        .min_size(egui::vec2(128.0, 30.0));
                    if ui.add(docx_button).clicked() {
                        action = ControlPanelAction::ExportDocx;
                    }
                });
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(self.open_enabled, |ui| {
                if ui.small_button("Open last export").clicked() {
                    action = ControlPanelAction::OpenLastExport;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    BuildFigures,
    ExportPdf,
    ExportDocx,
    OpenLastExport,
}
