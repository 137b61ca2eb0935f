//! Charts module - figure building, interactive plotting, static rendering

mod figure;
mod plotter;
mod renderer;

pub use figure::{
    BarPanel, BoxPanel, CategoryCount, Figure, FigureError, FigureKind, HistogramPanel,
    LabeledBox, Panel, ScatterPanel,
};
pub use plotter::FigurePlotter;
pub use renderer::{FigureRenderer, RenderError, RenderedFigure};
