//! ChartLab Compare - AI vs Human Report Comparison
//!
//! Desktop application comparing AI generated report metrics against
//! human written ones.

use chartlab::gui::CompareApp;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("ChartLab Compare"),
        ..Default::default()
    };

    eframe::run_native(
        "ChartLab Compare",
        options,
        Box::new(|cc| Ok(Box::new(CompareApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
