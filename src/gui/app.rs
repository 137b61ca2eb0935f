//! ChartLab Main Application
//! Main window with control panel and figure viewer.

use crate::charts::{Figure, FigureKind, FigureRenderer, RenderedFigure};
use crate::data::{self, TableLoader};
use crate::export::{DocxGenerator, PdfGenerator};
use crate::gui::{ControlPanel, ControlPanelAction, FigureViewer, TablePreview};
use egui::SidePanel;
use polars::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

const PREVIEW_ROWS: usize = 10;

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete { df: DataFrame },
    Error(String),
}

/// Figure building result from background thread
enum BuildResult {
    Progress(f32, String),
    Complete(Vec<Figure>),
    Error(String),
}

#[derive(Clone, Copy)]
enum ExportFormat {
    Pdf,
    Docx,
}

/// Main application window.
pub struct VisualizerApp {
    loader: TableLoader,
    control_panel: ControlPanel,
    figure_viewer: FigureViewer,
    last_export: Option<PathBuf>,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,

    // Async figure building
    build_rx: Option<Receiver<BuildResult>>,
    is_building: bool,
}

impl VisualizerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            loader: TableLoader::new(),
            control_panel: ControlPanel::new(),
            figure_viewer: FigureViewer::new(),
            last_export: None,
            load_rx: None,
            is_loading: false,
            build_rx: None,
            is_building: false,
        }
    }

    /// Handle CSV file selection, loading in a background thread
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.figure_viewer.clear();
            self.control_panel.settings.csv_path = Some(path.clone());
            self.control_panel.set_progress(0.0, "Loading CSV file...");
            self.is_loading = true;

            let (tx, rx) = channel();
            self.load_rx = Some(rx);

            let path_str = path.to_string_lossy().to_string();

            thread::spawn(move || {
                let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));

                match data::read_csv(&path_str) {
                    Ok(df) => {
                        let _ = tx.send(LoadResult::Complete { df });
                    }
                    Err(e) => {
                        let _ = tx.send(LoadResult::Error(e.to_string()));
                    }
                }
            });
        }
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_progress(0.0, &status);
                    }
                    LoadResult::Complete { df } => {
                        let (rows, cols) = df.shape();
                        let numeric = data::numeric_column_names(&df);
                        let (headers, preview_rows) = data::preview_rows(&df, PREVIEW_ROWS);

                        self.figure_viewer.set_preview(TablePreview {
                            headers,
                            rows: preview_rows,
                            total_rows: rows,
                        });
                        self.loader.set_dataframe(df);
                        self.control_panel.update_table(rows, cols, numeric);
                        self.control_panel
                            .set_progress(0.0, &format!("Loaded {rows} rows, {cols} columns"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        log::error!("CSV load failed: {error}");
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {error}"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Start figure building in a background thread
    fn start_build(&mut self) {
        let kinds = self.control_panel.selected_kinds();
        if kinds.is_empty() {
            self.control_panel.set_progress(0.0, "No figures selected");
            return;
        }

        let Some(df) = self.loader.dataframe().cloned() else {
            self.control_panel.set_progress(0.0, "No data loaded");
            return;
        };

        let (tx, rx) = channel();
        self.build_rx = Some(rx);
        self.is_building = true;
        self.control_panel.set_progress(5.0, "Building figures...");

        thread::spawn(move || {
            Self::run_build(tx, df, kinds);
        });
    }

    /// Build the selected figures (called from background thread)
    fn run_build(tx: Sender<BuildResult>, df: DataFrame, kinds: Vec<FigureKind>) {
        let mut figures = Vec::new();
        let total = kinds.len();

        for (idx, kind) in kinds.iter().enumerate() {
            let progress = 10.0 + (idx as f32 / total as f32) * 80.0;
            let _ = tx.send(BuildResult::Progress(
                progress,
                format!("Building {}...", kind.label()),
            ));

            let figure = match kind {
                FigureKind::Distribution => Figure::distribution(&df),
                FigureKind::Scatter => Figure::scatter(&df),
                FigureKind::Box => Figure::box_plot(&df),
                FigureKind::Pairwise => Figure::pairwise(&df),
                FigureKind::Regression => Figure::regression(&df),
                // Not selectable in the visualizer
                FigureKind::Comparison => continue,
            };

            match figure {
                Ok(figure) => figures.push(figure),
                Err(e) => {
                    let _ = tx.send(BuildResult::Error(e.to_string()));
                    return;
                }
            }
        }

        let _ = tx.send(BuildResult::Complete(figures));
    }

    /// Check for figure building results
    fn check_build_results(&mut self) {
        let rx = self.build_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    BuildResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    BuildResult::Complete(figures) => {
                        let count = figures.len();
                        self.control_panel.export_enabled = count > 0;
                        self.figure_viewer.set_figures(figures);
                        self.control_panel
                            .set_progress(100.0, &format!("Complete! {count} figures ready"));
                        self.is_building = false;
                        should_keep_receiver = false;
                    }
                    BuildResult::Error(error) => {
                        log::error!("Figure build failed: {error}");
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {error}"));
                        self.is_building = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.build_rx = Some(rx);
            }
        }
    }

    /// Handle report export, rendering figures to memory first
    fn handle_export(&mut self, format: ExportFormat) {
        if self.figure_viewer.figures.is_empty() {
            self.control_panel.set_progress(0.0, "No figures to export");
            return;
        }

        let (filter_name, extension, file_name) = match format {
            ExportFormat::Pdf => ("PDF", "pdf", "chartlab_report.pdf"),
            ExportFormat::Docx => ("Word Document", "docx", "chartlab_report.docx"),
        };

        let output_path = match rfd::FileDialog::new()
            .add_filter(filter_name, &[extension])
            .set_file_name(file_name)
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        self.control_panel.set_progress(10.0, "Rendering figures...");

        let mut rendered: Vec<RenderedFigure> = Vec::new();
        let total = self.figure_viewer.figures.len();

        for (idx, figure) in self.figure_viewer.figures.iter().enumerate() {
            match FigureRenderer::render_png(figure) {
                Ok(image) => {
                    rendered.push(image);
                    let progress = 10.0 + (idx as f32 / total as f32) * 50.0;
                    self.control_panel.set_progress(
                        progress,
                        &format!("Rendering figure {}/{}...", idx + 1, total),
                    );
                }
                Err(e) => {
                    log::error!("Figure render failed: {e}");
                    self.control_panel
                        .set_progress(0.0, &format!("Error: render failed: {e}"));
                    return;
                }
            }
        }

        self.control_panel.set_progress(70.0, "Generating report...");

        let result = match format {
            ExportFormat::Pdf => PdfGenerator::generate_pdf_from_bytes(&rendered, &output_path),
            ExportFormat::Docx => {
                DocxGenerator::generate_docx_from_bytes(&rendered, &output_path, "ChartLab Report")
            }
        };

        match result {
            Ok(()) => {
                let name = output_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.control_panel.set_progress(
                    100.0,
                    &format!("Complete! Exported {} figures to {name}", rendered.len()),
                );
                self.last_export = Some(output_path);
                self.control_panel.open_enabled = true;
            }
            Err(e) => {
                log::error!("Report export failed: {e}");
                self.control_panel
                    .set_progress(0.0, &format!("Error: export failed: {e}"));
            }
        }
    }

    /// Open the last exported file with the system default application
    fn handle_open_last_export(&mut self) {
        if let Some(path) = &self.last_export {
            if let Err(e) = open::that(path) {
                self.control_panel
                    .set_progress(0.0, &format!("Error: could not open file: {e}"));
            }
        }
    }
}

impl eframe::App for VisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();
        self.check_build_results();

        // Request repaint while loading or building
        if self.is_loading || self.is_building {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::BuildFigures => {
                            if !self.is_building {
                                self.start_build();
                            }
                        }
                        ControlPanelAction::ExportPdf => {
                            self.handle_export(ExportFormat::Pdf);
                        }
                        ControlPanelAction::ExportDocx => {
                            self.handle_export(ExportFormat::Docx);
                        }
                        ControlPanelAction::OpenLastExport => {
                            self.handle_open_last_export();
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Figure Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.figure_viewer.show(ui);
        });
    }
}
