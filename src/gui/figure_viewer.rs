//! Figure Viewer Widget
//! Central scrollable panel showing the table preview and interactive figures.

use crate::charts::{Figure, FigurePlotter};
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;

/// First rows of the loaded table, shown above the figures.
pub struct TablePreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

/// Scrollable display area for the data preview and built figures.
pub struct FigureViewer {
    pub figures: Vec<Figure>,
    pub preview: Option<TablePreview>,
}

impl Default for FigureViewer {
    fn default() -> Self {
        Self {
            figures: Vec::new(),
            preview: None,
        }
    }
}

impl FigureViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear preview and figures
    pub fn clear(&mut self) {
        self.figures.clear();
        self.preview = None;
    }

    pub fn set_preview(&mut self, preview: TablePreview) {
        self.preview = Some(preview);
    }

    pub fn set_figures(&mut self, figures: Vec<Figure>) {
        self.figures = figures;
    }

    /// Draw the preview card and one card per figure
    pub fn show(&mut self, ui: &mut egui::Ui) {
        if self.preview.is_none() && self.figures.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if let Some(preview) = &self.preview {
                    Self::draw_preview_card(ui, preview);
                    ui.add_space(CARD_SPACING);
                }

                for figure in &self.figures {
                    Self::draw_figure_card(ui, figure);
                    ui.add_space(CARD_SPACING);
                }
            });
    }

    fn draw_preview_card(ui: &mut egui::Ui, preview: &TablePreview) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.5, Color32::from_rgb(100, 149, 237)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!(
                        "Data Preview (first {} of {} rows)",
                        preview.rows.len(),
                        preview.total_rows
                    ))
                    .size(16.0)
                    .strong(),
                );
                ui.add_space(8.0);

                ScrollArea::horizontal()
                    .id_salt("preview_scroll")
                    .show(ui, |ui| {
                        egui::Grid::new("preview_grid")
                            .striped(true)
                            .min_col_width(60.0)
                            .show(ui, |ui| {
                                for header in &preview.headers {
                                    ui.label(RichText::new(header).strong());
                                }
                                ui.end_row();
                                for row in &preview.rows {
                                    for value in row {
                                        ui.label(value);
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }

    fn draw_figure_card(ui: &mut egui::Ui, figure: &Figure) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.5, Color32::from_gray(90)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&figure.title).size(18.0).strong());
                ui.add_space(8.0);
                FigurePlotter::draw_figure(ui, figure);
            });
    }
}
