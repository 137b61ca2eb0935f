//! GUI module - User interface components

mod app;
mod compare_app;
mod control_panel;
mod figure_viewer;

pub use app::VisualizerApp;
pub use compare_app::CompareApp;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use figure_viewer::{FigureViewer, TablePreview};
