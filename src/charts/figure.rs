//! Figure Model Module
//! Builds data-only figure descriptions that both the interactive
//! plotter and the static renderer draw from.

use crate::data::{self, NumericColumn};
use crate::stats::{self, BoxStats, HistBin, LinearFit};
use polars::prelude::DataFrame;
use rayon::prelude::*;
use thiserror::Error;

/// Sample count for kernel density curves.
const KDE_SAMPLES: usize = 200;

#[derive(Error, Debug)]
pub enum FigureError {
    #[error("Data error: {0}")]
    Data(#[from] data::LoaderError),
    #[error("No numeric columns in the table")]
    NoNumericColumns,
    #[error("{0} needs at least two numeric columns")]
    NeedsTwoColumns(&'static str),
}

/// The chart families the app can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureKind {
    Distribution,
    Scatter,
    Box,
    Pairwise,
    Regression,
    Comparison,
}

impl FigureKind {
    /// Kinds selectable in the visualizer. Comparison figures are
    /// assembled by the comparison pipeline instead.
    pub const SELECTABLE: [FigureKind; 5] = [
        FigureKind::Distribution,
        FigureKind::Scatter,
        FigureKind::Box,
        FigureKind::Pairwise,
        FigureKind::Regression,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FigureKind::Distribution => "Distribution",
            FigureKind::Scatter => "Scatter Matrix",
            FigureKind::Box => "Box Plot",
            FigureKind::Pairwise => "Pairwise Grid",
            FigureKind::Regression => "Regression Grid",
            FigureKind::Comparison => "AI vs Human Comparison",
        }
    }
}

/// Histogram bars plus an optional density curve.
#[derive(Debug, Clone)]
pub struct HistogramPanel {
    pub title: String,
    pub bins: Vec<HistBin>,
    pub kde: Vec<[f64; 2]>,
}

/// One box glyph with its label.
#[derive(Debug, Clone)]
pub struct LabeledBox {
    pub label: String,
    pub stats: BoxStats,
}

/// One or more box glyphs sharing an axis.
#[derive(Debug, Clone)]
pub struct BoxPanel {
    pub title: String,
    pub boxes: Vec<LabeledBox>,
    pub annotation: Option<String>,
}

/// Scatter points with an optional least-squares line.
#[derive(Debug, Clone)]
pub struct ScatterPanel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<[f64; 2]>,
    pub fit: Option<LinearFit>,
}

/// Grouped category counts, one count per series.
#[derive(Debug, Clone)]
pub struct CategoryCount {
    pub label: String,
    pub counts: Vec<f64>,
}

/// Side-by-side count bars per category.
#[derive(Debug, Clone)]
pub struct BarPanel {
    pub title: String,
    pub series: Vec<String>,
    pub categories: Vec<CategoryCount>,
    pub annotation: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Panel {
    Histogram(HistogramPanel),
    Box(BoxPanel),
    Scatter(ScatterPanel),
    Bars(BarPanel),
    Label(String),
}

/// A complete figure: a grid of panels plus a title.
#[derive(Debug, Clone)]
pub struct Figure {
    pub kind: FigureKind,
    pub title: String,
    pub grid_columns: usize,
    pub panels: Vec<Panel>,
}

impl Figure {
    /// One stacked histogram-with-density panel per numeric column.
    pub fn distribution(df: &DataFrame) -> Result<Figure, FigureError> {
        let view = populated_view(df);
        if view.is_empty() {
            return Err(FigureError::NoNumericColumns);
        }

        let panels = view
            .iter()
            .map(|col| {
                Panel::Histogram(HistogramPanel {
                    title: format!("Distribution of {}", col.name),
                    bins: stats::histogram(&col.values),
                    kde: stats::kde_curve(&col.values, KDE_SAMPLES),
                })
            })
            .collect();

        Ok(Figure {
            kind: FigureKind::Distribution,
            title: FigureKind::Distribution.label().to_string(),
            grid_columns: 1,
            panels,
        })
    }

    /// One box-and-whisker panel per numeric column.
    pub fn box_plot(df: &DataFrame) -> Result<Figure, FigureError> {
        let view = populated_view(df);
        if view.is_empty() {
            return Err(FigureError::NoNumericColumns);
        }

        let grid_columns = view.len().min(3);
        let panels = view
            .iter()
            .map(|col| {
                Panel::Box(BoxPanel {
                    title: col.name.clone(),
                    boxes: vec![LabeledBox {
                        label: col.name.clone(),
                        stats: stats::box_stats(&col.values),
                    }],
                    annotation: None,
                })
            })
            .collect();

        Ok(Figure {
            kind: FigureKind::Box,
            title: FigureKind::Box.label().to_string(),
            grid_columns,
            panels,
        })
    }

    /// Scatter matrix with column names on the diagonal.
    pub fn scatter(df: &DataFrame) -> Result<Figure, FigureError> {
        Self::pair_grid(df, FigureKind::Scatter)
    }

    /// Pair grid with histograms on the diagonal.
    pub fn pairwise(df: &DataFrame) -> Result<Figure, FigureError> {
        Self::pair_grid(df, FigureKind::Pairwise)
    }

    /// Pair grid with least-squares lines through every scatter cell.
    pub fn regression(df: &DataFrame) -> Result<Figure, FigureError> {
        Self::pair_grid(df, FigureKind::Regression)
    }

    /// Build an n-by-n grid over the numeric columns. Cells are
    /// independent, so they are filled in parallel.
    fn pair_grid(df: &DataFrame, kind: FigureKind) -> Result<Figure, FigureError> {
        let view = populated_view(df);
        if view.is_empty() {
            return Err(FigureError::NoNumericColumns);
        }
        if view.len() < 2 {
            return Err(FigureError::NeedsTwoColumns(kind.label()));
        }

        let aligned: Vec<Vec<Option<f64>>> = view
            .iter()
            .map(|col| data::column_f64_aligned(df, &col.name))
            .collect::<Result<_, _>>()?;

        let n = view.len();
        let panels: Vec<Panel> = (0..n * n)
            .into_par_iter()
            .map(|idx| {
                let (row, col) = (idx / n, idx % n);
                let x = &view[col];
                let y = &view[row];

                if row == col {
                    return match kind {
                        FigureKind::Scatter => Panel::Label(x.name.clone()),
                        _ => Panel::Histogram(HistogramPanel {
                            title: x.name.clone(),
                            bins: stats::histogram(&x.values),
                            kde: stats::kde_curve(&x.values, KDE_SAMPLES),
                        }),
                    };
                }

                let points = paired(&aligned[col], &aligned[row]);
                let fit = if kind == FigureKind::Regression {
                    stats::fit_line(&points)
                } else {
                    None
                };
                Panel::Scatter(ScatterPanel {
                    title: String::new(),
                    x_label: x.name.clone(),
                    y_label: y.name.clone(),
                    points,
                    fit,
                })
            })
            .collect();

        Ok(Figure {
            kind,
            title: kind.label().to_string(),
            grid_columns: n,
            panels,
        })
    }
}

/// Numeric columns that still hold data after null and NaN dropping.
fn populated_view(df: &DataFrame) -> Vec<NumericColumn> {
    let mut view = data::numeric_view(df);
    view.retain(|col| !col.values.is_empty());
    view
}

/// Zip two row-aligned columns, keeping rows where both sides hold a value.
fn paired(xs: &[Option<f64>], ys: &[Option<f64>]) -> Vec<[f64; 2]> {
    xs.iter()
        .zip(ys)
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some([*x, *y]),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("name".into(), vec!["a", "b", "c", "d"]),
            Column::new("score".into(), vec![1.0, 2.0, 3.0, 4.0]),
            Column::new("weight".into(), vec![2.0, 4.0, 6.0, 8.0]),
        ])
        .expect("frame")
    }

    #[test]
    fn distribution_stacks_one_panel_per_column() {
        let fig = Figure::distribution(&sample_frame()).expect("figure");
        assert_eq!(fig.grid_columns, 1);
        assert_eq!(fig.panels.len(), 2);
        for panel in &fig.panels {
            match panel {
                Panel::Histogram(h) => {
                    assert!(!h.bins.is_empty());
                    assert!(!h.kde.is_empty());
                }
                other => panic!("expected histogram, got {other:?}"),
            }
        }
    }

    #[test]
    fn scatter_grid_labels_the_diagonal() {
        let fig = Figure::scatter(&sample_frame()).expect("figure");
        assert_eq!(fig.grid_columns, 2);
        assert_eq!(fig.panels.len(), 4);
        assert!(matches!(&fig.panels[0], Panel::Label(name) if name == "score"));
        assert!(matches!(&fig.panels[3], Panel::Label(name) if name == "weight"));
        match &fig.panels[1] {
            Panel::Scatter(s) => {
                assert_eq!(s.points.len(), 4);
                assert!(s.fit.is_none());
            }
            other => panic!("expected scatter, got {other:?}"),
        }
    }

    #[test]
    fn pairwise_grid_puts_histograms_on_the_diagonal() {
        let fig = Figure::pairwise(&sample_frame()).expect("figure");
        assert!(matches!(&fig.panels[0], Panel::Histogram(_)));
        assert!(matches!(&fig.panels[1], Panel::Scatter(_)));
    }

    #[test]
    fn regression_grid_fits_every_scatter_cell() {
        let fig = Figure::regression(&sample_frame()).expect("figure");
        // panel 1 plots score against weight, and score = weight / 2
        match &fig.panels[1] {
            Panel::Scatter(s) => {
                let fit = s.fit.as_ref().expect("fit");
                assert!((fit.slope - 0.5).abs() < 1e-12);
                assert!(fit.intercept.abs() < 1e-12);
                assert!((fit.r - 1.0).abs() < 1e-12);
            }
            other => panic!("expected scatter, got {other:?}"),
        }
    }

    #[test]
    fn pair_grids_need_two_numeric_columns() {
        let df = DataFrame::new(vec![
            Column::new("only".into(), vec![1.0, 2.0, 3.0]),
        ])
        .expect("frame");
        assert!(matches!(
            Figure::scatter(&df),
            Err(FigureError::NeedsTwoColumns(_))
        ));
    }

    #[test]
    fn all_builders_reject_text_only_tables() {
        let df = DataFrame::new(vec![
            Column::new("name".into(), vec!["a", "b"]),
        ])
        .expect("frame");
        assert!(matches!(
            Figure::distribution(&df),
            Err(FigureError::NoNumericColumns)
        ));
        assert!(matches!(
            Figure::box_plot(&df),
            Err(FigureError::NoNumericColumns)
        ));
    }

    #[test]
    fn paired_rows_drop_when_either_side_is_missing() {
        let df = DataFrame::new(vec![
            Column::new("x".into(), vec![Some(1.0), None, Some(3.0)]),
            Column::new("y".into(), vec![Some(2.0), Some(5.0), Some(6.0)]),
        ])
        .expect("frame");
        let fig = Figure::scatter(&df).expect("figure");
        // panel 2 is row 1, col 0: x from the first column, y from the second
        match &fig.panels[2] {
            Panel::Scatter(s) => assert_eq!(s.points, vec![[1.0, 2.0], [3.0, 6.0]]),
            other => panic!("expected scatter, got {other:?}"),
        }
    }
}
