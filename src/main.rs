//! ChartLab - CSV Data Analysis & Figure Studio
//!
//! Desktop application for exploring CSV tables with interactive figures.

use chartlab::gui::VisualizerApp;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("ChartLab"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "ChartLab",
        options,
        Box::new(|cc| Ok(Box::new(VisualizerApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
