//! ChartLab Compare Application
//! Loads an AI report table and a human report table, runs the metric
//! comparison, and shows the summary figure with export controls.

use crate::charts::{Figure, FigurePlotter, FigureRenderer};
use crate::compare::ComparisonReport;
use crate::data::{LoaderError, TableLoader};
use crate::export;
use crate::stats;
use egui::{Color32, RichText, ScrollArea, SidePanel};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy)]
enum TableSide {
    Ai,
    Human,
}

#[derive(Clone, Copy)]
enum ResultsFormat {
    Csv,
    Json,
}

/// One row of the metric summary table.
struct MetricRow {
    metric: String,
    ai_mean: f64,
    human_mean: f64,
    t_stat: f64,
    p_value: f64,
    significant: bool,
}

/// Comparison application window.
pub struct CompareApp {
    ai_loader: TableLoader,
    human_loader: TableLoader,
    ai_path: Option<PathBuf>,
    human_path: Option<PathBuf>,

    report: Option<ComparisonReport>,
    figure: Option<Figure>,
    metric_rows: Vec<MetricRow>,
    last_export: Option<PathBuf>,
    status: String,
}

impl CompareApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            ai_loader: TableLoader::new(),
            human_loader: TableLoader::new(),
            ai_path: None,
            human_path: None,
            report: None,
            figure: None,
            metric_rows: Vec::new(),
            last_export: None,
            status: "Load both tables to compare".to_string(),
        }
    }

    fn load_table(loader: &mut TableLoader, path: &Path) -> Result<(usize, usize), LoaderError> {
        let df = loader.load_csv(&path.to_string_lossy())?;
        Ok(df.shape())
    }

    /// Handle file selection for one side, loading synchronously
    fn handle_browse(&mut self, side: TableSide) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        // Either table changing invalidates the previous comparison
        self.report = None;
        self.figure = None;
        self.metric_rows.clear();

        let (loader, label) = match side {
            TableSide::Ai => (&mut self.ai_loader, "AI"),
            TableSide::Human => (&mut self.human_loader, "human"),
        };

        match Self::load_table(loader, &path) {
            Ok((rows, cols)) => {
                self.status = format!("Loaded {label} table: {rows} rows, {cols} columns");
                match side {
                    TableSide::Ai => self.ai_path = Some(path),
                    TableSide::Human => self.human_path = Some(path),
                }
            }
            Err(e) => {
                log::error!("CSV load failed: {e}");
                self.status = format!("Error: {e}");
            }
        }
    }

    /// Run the comparison over the two loaded tables
    fn handle_run(&mut self) {
        let (Some(ai), Some(human)) = (self.ai_loader.dataframe(), self.human_loader.dataframe())
        else {
            self.status = "Load both tables to compare".to_string();
            return;
        };

        match ComparisonReport::run(ai, human) {
            Ok(report) => {
                self.metric_rows = report
                    .metrics
                    .iter()
                    .map(|m| MetricRow {
                        metric: m.metric.clone(),
                        ai_mean: stats::summarize(&m.ai).mean,
                        human_mean: stats::summarize(&m.human).mean,
                        t_stat: m.test.t_stat,
                        p_value: m.test.p_value,
                        significant: m.test.significant,
                    })
                    .collect();
                self.figure = Some(report.figure());
                self.report = Some(report);
                self.status = "Complete! Comparison ready".to_string();
            }
            Err(e) => {
                log::error!("Comparison failed: {e}");
                self.report = None;
                self.figure = None;
                self.metric_rows.clear();
                self.status = format!("Error: {e}");
            }
        }
    }

    /// Export the measure/value table as CSV or JSON
    fn handle_export_results(&mut self, format: ResultsFormat) {
        let Some(report) = &self.report else {
            self.status = "No comparison to export".to_string();
            return;
        };

        let (filter_name, extension, file_name) = match format {
            ResultsFormat::Csv => ("CSV", "csv", "comparison_results.csv"),
            ResultsFormat::Json => ("JSON", "json", "comparison_results.json"),
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter(filter_name, &[extension])
            .set_file_name(file_name)
            .save_file()
        else {
            return;
        };

        let records = report.result_records();
        let result = match format {
            ResultsFormat::Csv => export::write_results_csv(&records, &path),
            ResultsFormat::Json => export::write_results_json(&records, &path),
        };

        match result {
            Ok(()) => {
                self.status = format!("Complete! Results written to {}", path.display());
                self.last_export = Some(path);
            }
            Err(e) => {
                log::error!("Results export failed: {e}");
                self.status = format!("Error: export failed: {e}");
            }
        }
    }

    /// Export the summary figure as a PNG
    fn handle_export_figure(&mut self) {
        let Some(figure) = &self.figure else {
            self.status = "No comparison to export".to_string();
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("comparison_summary.png")
            .save_file()
        else {
            return;
        };

        let result = FigureRenderer::render_png(figure)
            .map_err(|e| e.to_string())
            .and_then(|rendered| {
                export::write_figure_png(&rendered, &path).map_err(|e| e.to_string())
            });

        match result {
            Ok(()) => {
                self.status = format!("Complete! Figure written to {}", path.display());
                self.last_export = Some(path);
            }
            Err(e) => {
                log::error!("Figure export failed: {e}");
                self.status = format!("Error: export failed: {e}");
            }
        }
    }

    fn handle_open_last_export(&mut self) {
        if let Some(path) = &self.last_export {
            if let Err(e) = open::that(path) {
                self.status = format!("Error: could not open file: {e}");
            }
        }
    }

    fn draw_file_picker(
        ui: &mut egui::Ui,
        heading: &str,
        path: &Option<PathBuf>,
    ) -> bool {
        let mut clicked = false;
        ui.label(RichText::new(heading).size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            clicked = true;
                        }
                    });
                });
            });
        clicked
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 ChartLab Compare")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("AI vs Human Reports")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        if Self::draw_file_picker(ui, "🤖 AI Report CSV", &self.ai_path) {
            self.handle_browse(TableSide::Ai);
        }
        ui.add_space(10.0);
        if Self::draw_file_picker(ui, "👤 Human Report CSV", &self.human_path) {
            self.handle_browse(TableSide::Human);
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let both_loaded = self.ai_loader.dataframe().is_some()
            && self.human_loader.dataframe().is_some();

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(both_loaded, |ui| {
                let button = egui::Button::new(RichText::new("▶ Run Comparison").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    self.handle_run();
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(self.report.is_some(), |ui| {
                ui.horizontal(|ui| {
                    ui.add_space(10.0);
                    if ui.button("📄 Results CSV").clicked() {
                        self.handle_export_results(ResultsFormat::Csv);
                    }
                    if ui.button("📄 Results JSON").clicked() {
                        self.handle_export_results(ResultsFormat::Json);
                    }
                });
                ui.add_space(5.0);
                if ui.button("🖼 Figure PNG").clicked() {
                    self.handle_export_figure();
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(self.last_export.is_some(), |ui| {
                if ui.small_button("Open last export").clicked() {
                    self.handle_open_last_export();
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));
    }

    fn draw_results(&self, ui: &mut egui::Ui) {
        let Some(report) = &self.report else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Comparison").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!(
                        "Tables: {} rows x {} columns each",
                        report.rows, report.cols
                    ))
                    .size(13.0)
                    .color(Color32::GRAY),
                );
                ui.add_space(10.0);

                if let Some(figure) = &self.figure {
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
                    ui.add_space(15.0);
                }

                self.draw_metric_table(ui);
                ui.add_space(15.0);
                Self::draw_class_table(ui, report);
            });
    }

    fn draw_metric_table(&self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Metric Summary").size(16.0).strong());
        ui.add_space(5.0);

        egui::Grid::new("metric_grid")
            .striped(true)
            .min_col_width(80.0)
            .show(ui, |ui| {
                for header in ["Metric", "AI Mean", "Human Mean", "t", "p", ""] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();

                for row in &self.metric_rows {
                    ui.label(&row.metric);
                    ui.label(format!("{:.3}", row.ai_mean));
                    ui.label(format!("{:.3}", row.human_mean));
                    ui.label(format!("{:.3}", row.t_stat));
                    ui.label(format!("{:.4}", row.p_value));
                    if row.significant {
                        ui.label(
                            RichText::new("significant")
                                .color(Color32::from_rgb(220, 53, 69)),
                        );
                    } else {
                        ui.label("");
                    }
                    ui.end_row();
                }
            });
    }

    fn draw_class_table(ui: &mut egui::Ui, report: &ComparisonReport) {
        ui.label(
            RichText::new(format!(
                "Classification Agreement (Cohen's Kappa = {:.3})",
                report.kappa
            ))
            .size(16.0)
            .strong(),
        );
        ui.add_space(5.0);

        egui::Grid::new("class_grid")
            .striped(true)
            .min_col_width(80.0)
            .show(ui, |ui| {
                for header in ["Classification", "AI", "Human"] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();

                for count in &report.class_counts {
                    ui.label(&count.label);
                    ui.label(count.ai.to_string());
                    ui.label(count.human.to_string());
                    ui.end_row();
                }
            });
    }
}

impl eframe::App for CompareApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("compare_controls")
            .min_width(280.0)
            .max_width(330.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.draw_controls(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_results(ui);
        });
    }
}
