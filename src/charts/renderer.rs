//! Static Figure Renderer
//! Rasterizes figures to PNG bytes with Plotters for export embedding.

use crate::charts::figure::{BarPanel, BoxPanel, Figure, HistogramPanel, LabeledBox, Panel, ScatterPanel};
use image::{ImageBuffer, RgbImage};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use thiserror::Error;

const CELL_WIDTH: u32 = 420;
const CELL_HEIGHT: u32 = 320;
const TITLE_HEIGHT: u32 = 40;
const BOX_HALF_WIDTH: f64 = 0.22;
const CAP_HALF_WIDTH: f64 = 0.11;

// Mirrors the interactive palette.
const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(52, 152, 219),
    RGBColor(243, 156, 18),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
];
const CURVE_COLOR: RGBColor = RGBColor(231, 76, 60);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Invalid render buffer")]
    Buffer,
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// A figure rasterized to PNG, ready for export.
#[derive(Debug, Clone)]
pub struct RenderedFigure {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Renders figures off-screen into PNG byte buffers.
pub struct FigureRenderer;

impl FigureRenderer {
    /// Rasterize a figure at a fixed cell size per panel.
    pub fn render_png(figure: &Figure) -> Result<RenderedFigure, RenderError> {
        let cols = figure.grid_columns.max(1);
        let rows = figure.panels.len().div_ceil(cols);
        let width = cols as u32 * CELL_WIDTH;
        let height = rows as u32 * CELL_HEIGHT + TITLE_HEIGHT;

        let mut buf = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            let content = root
                .titled(&figure.title, ("sans-serif", 26))
                .map_err(draw_err)?;

            let cells = content.split_evenly((rows, cols));
            for (cell, panel) in cells.iter().zip(&figure.panels) {
                Self::draw_panel(cell, panel)?;
            }
            root.present().map_err(draw_err)?;
        }

        let img: RgbImage = ImageBuffer::from_raw(width, height, buf).ok_or(RenderError::Buffer)?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;

        Ok(RenderedFigure {
            title: figure.title.clone(),
            width,
            height,
            png,
        })
    }

    fn draw_panel(
        cell: &DrawingArea<BitMapBackend, Shift>,
        panel: &Panel,
    ) -> Result<(), RenderError> {
        match panel {
            Panel::Histogram(h) => Self::draw_histogram(cell, h),
            Panel::Box(b) => Self::draw_box(cell, b),
            Panel::Scatter(s) => Self::draw_scatter(cell, s),
            Panel::Bars(b) => Self::draw_bars(cell, b),
            Panel::Label(text) => Self::draw_label(cell, text),
        }
    }

    fn draw_histogram(
        cell: &DrawingArea<BitMapBackend, Shift>,
        panel: &HistogramPanel,
    ) -> Result<(), RenderError> {
        let first = match panel.bins.first() {
            Some(bin) => bin,
            None => return Ok(()),
        };
        let last = panel.bins.last().unwrap_or(first);

        let mut x_min = first.start;
        let mut x_max = last.end;
        let mut y_max = panel.bins.iter().map(|b| b.density).fold(0.0, f64::max);
        for point in &panel.kde {
            x_min = x_min.min(point[0]);
            x_max = x_max.max(point[0]);
            y_max = y_max.max(point[1]);
        }
        if y_max <= 0.0 {
            y_max = 1.0;
        }

        let mut builder = ChartBuilder::on(cell);
        builder
            .margin(6)
            .x_label_area_size(24)
            .y_label_area_size(40);
        if !panel.title.is_empty() {
            builder.caption(&panel.title, ("sans-serif", 15));
        }
        let mut chart = builder
            .build_cartesian_2d(x_min..x_max, 0.0..y_max * 1.1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .label_style(("sans-serif", 11))
            .draw()
            .map_err(draw_err)?;

        let fill = SERIES_COLORS[0];
        chart
            .draw_series(panel.bins.iter().map(|bin| {
                Rectangle::new(
                    [(bin.start, 0.0), (bin.end, bin.density)],
                    fill.mix(0.45).filled(),
                )
            }))
            .map_err(draw_err)?;
        chart
            .draw_series(panel.bins.iter().map(|bin| {
                Rectangle::new(
                    [(bin.start, 0.0), (bin.end, bin.density)],
                    fill.stroke_width(1),
                )
            }))
            .map_err(draw_err)?;

        if !panel.kde.is_empty() {
            chart
                .draw_series(LineSeries::new(
                    panel.kde.iter().map(|p| (p[0], p[1])),
                    CURVE_COLOR.stroke_width(2),
                ))
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_box(
        cell: &DrawingArea<BitMapBackend, Shift>,
        panel: &BoxPanel,
    ) -> Result<(), RenderError> {
        if panel.boxes.is_empty() {
            return Ok(());
        }

        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for item in &panel.boxes {
            y_min = y_min.min(item.stats.whisker_low);
            y_max = y_max.max(item.stats.whisker_high);
            for &v in &item.stats.outliers {
                y_min = y_min.min(v);
                y_max = y_max.max(v);
            }
        }
        let (y_min, y_max) = padded_range(y_min, y_max);

        let n = panel.boxes.len();
        let labels: Vec<&str> = panel.boxes.iter().map(|b| b.label.as_str()).collect();

        let mut builder = ChartBuilder::on(cell);
        builder
            .margin(6)
            .x_label_area_size(24)
            .y_label_area_size(40);
        if !panel.title.is_empty() {
            builder.caption(&panel.title, ("sans-serif", 15));
        }
        let mut chart = builder
            .build_cartesian_2d(-0.5..n as f64 - 0.5, y_min..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_labels((2 * n + 1).min(21))
            .x_label_formatter(&|x| {
                let rounded = x.round();
                if (x - rounded).abs() > 0.01 || rounded < 0.0 {
                    return String::new();
                }
                labels
                    .get(rounded as usize)
                    .map(|s| s.to_string())
                    .unwrap_or_default()
            })
            .label_style(("sans-serif", 11))
            .draw()
            .map_err(draw_err)?;

        for (i, item) in panel.boxes.iter().enumerate() {
            Self::draw_box_glyph(&mut chart, i as f64, item, series_color(i))?;
        }

        if let Some(text) = &panel.annotation {
            cell.draw(&Text::new(
                text.clone(),
                (56, 26),
                ("sans-serif", 13).into_font().color(&BLACK),
            ))
            .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_box_glyph(
        chart: &mut ChartContext<BitMapBackend, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        x: f64,
        item: &LabeledBox,
        color: RGBColor,
    ) -> Result<(), RenderError> {
        let s = &item.stats;
        let body = [
            (x - BOX_HALF_WIDTH, s.summary.q1),
            (x + BOX_HALF_WIDTH, s.summary.q3),
        ];
        chart
            .draw_series(std::iter::once(Rectangle::new(
                body,
                color.mix(0.35).filled(),
            )))
            .map_err(draw_err)?;
        chart
            .draw_series(std::iter::once(Rectangle::new(body, color.stroke_width(1))))
            .map_err(draw_err)?;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![
                    (x - BOX_HALF_WIDTH, s.summary.median),
                    (x + BOX_HALF_WIDTH, s.summary.median),
                ],
                color.stroke_width(2),
            )))
            .map_err(draw_err)?;
        chart
            .draw_series([
                PathElement::new(
                    vec![(x, s.whisker_low), (x, s.summary.q1)],
                    color.stroke_width(1),
                ),
                PathElement::new(
                    vec![(x, s.summary.q3), (x, s.whisker_high)],
                    color.stroke_width(1),
                ),
                PathElement::new(
                    vec![
                        (x - CAP_HALF_WIDTH, s.whisker_low),
                        (x + CAP_HALF_WIDTH, s.whisker_low),
                    ],
                    color.stroke_width(1),
                ),
                PathElement::new(
                    vec![
                        (x - CAP_HALF_WIDTH, s.whisker_high),
                        (x + CAP_HALF_WIDTH, s.whisker_high),
                    ],
                    color.stroke_width(1),
                ),
            ])
            .map_err(draw_err)?;
        chart
            .draw_series(
                s.outliers
                    .iter()
                    .map(|&v| Circle::new((x, v), 2, color.filled())),
            )
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_scatter(
        cell: &DrawingArea<BitMapBackend, Shift>,
        panel: &ScatterPanel,
    ) -> Result<(), RenderError> {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for p in &panel.points {
            x_min = x_min.min(p[0]);
            x_max = x_max.max(p[0]);
            y_min = y_min.min(p[1]);
            y_max = y_max.max(p[1]);
        }
        let (x_lo, x_hi) = padded_range(x_min, x_max);
        let (y_lo, y_hi) = padded_range(y_min, y_max);

        let mut builder = ChartBuilder::on(cell);
        builder
            .margin(6)
            .x_label_area_size(28)
            .y_label_area_size(40);
        if !panel.title.is_empty() {
            builder.caption(&panel.title, ("sans-serif", 15));
        }
        let mut chart = builder
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc(panel.x_label.as_str())
            .y_desc(panel.y_label.as_str())
            .label_style(("sans-serif", 10))
            .axis_desc_style(("sans-serif", 11))
            .draw()
            .map_err(draw_err)?;

        let color = SERIES_COLORS[0];
        chart
            .draw_series(
                panel
                    .points
                    .iter()
                    .map(|p| Circle::new((p[0], p[1]), 2, color.mix(0.6).filled())),
            )
            .map_err(draw_err)?;

        if let Some(fit) = &panel.fit {
            if x_min.is_finite() && x_max > x_min {
                chart
                    .draw_series(LineSeries::new(
                        [x_min, x_max]
                            .iter()
                            .map(|&x| (x, fit.slope * x + fit.intercept)),
                        CURVE_COLOR.stroke_width(2),
                    ))
                    .map_err(draw_err)?;
            }
        }
        Ok(())
    }

    fn draw_bars(
        cell: &DrawingArea<BitMapBackend, Shift>,
        panel: &BarPanel,
    ) -> Result<(), RenderError> {
        if panel.categories.is_empty() || panel.series.is_empty() {
            return Ok(());
        }

        let n = panel.categories.len();
        let series_count = panel.series.len();
        let mut y_max = 0.0f64;
        for cat in &panel.categories {
            for &c in &cat.counts {
                y_max = y_max.max(c);
            }
        }
        if y_max <= 0.0 {
            y_max = 1.0;
        }
        let labels: Vec<&str> = panel.categories.iter().map(|c| c.label.as_str()).collect();

        let mut builder = ChartBuilder::on(cell);
        builder
            .margin(6)
            .x_label_area_size(24)
            .y_label_area_size(40);
        if !panel.title.is_empty() {
            builder.caption(&panel.title, ("sans-serif", 15));
        }
        let mut chart = builder
            .build_cartesian_2d(-0.5..n as f64 - 0.5, 0.0..y_max * 1.15)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_labels((2 * n + 1).min(21))
            .x_label_formatter(&|x| {
                let rounded = x.round();
                if (x - rounded).abs() > 0.01 || rounded < 0.0 {
                    return String::new();
                }
                labels
                    .get(rounded as usize)
                    .map(|s| s.to_string())
                    .unwrap_or_default()
            })
            .label_style(("sans-serif", 11))
            .draw()
            .map_err(draw_err)?;

        let slot = 0.8 / series_count as f64;
        for (s, series_name) in panel.series.iter().enumerate() {
            let color = series_color(s);
            let offset = (s as f64 + 0.5) * slot - 0.4;
            chart
                .draw_series(panel.categories.iter().enumerate().filter_map(|(j, cat)| {
                    let count = *cat.counts.get(s)?;
                    let x = j as f64 + offset;
                    Some(Rectangle::new(
                        [(x - slot * 0.42, 0.0), (x + slot * 0.42, count)],
                        color.mix(0.75).filled(),
                    ))
                }))
                .map_err(draw_err)?
                .label(series_name.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .label_font(("sans-serif", 11))
            .draw()
            .map_err(draw_err)?;

        if let Some(text) = &panel.annotation {
            cell.draw(&Text::new(
                text.clone(),
                (56, 26),
                ("sans-serif", 13).into_font().color(&BLACK),
            ))
            .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_label(cell: &DrawingArea<BitMapBackend, Shift>, text: &str) -> Result<(), RenderError> {
        let (w, h) = cell.dim_in_pixel();
        let style = TextStyle::from(("sans-serif", 20).into_font())
            .pos(Pos::new(HPos::Center, VPos::Center));
        cell.draw_text(text, &style, (w as i32 / 2, h as i32 / 2))
            .map_err(draw_err)?;
        Ok(())
    }
}

fn series_color(idx: usize) -> RGBColor {
    SERIES_COLORS[idx % SERIES_COLORS.len()]
}

fn padded_range(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 0.5, max + 0.5);
    }
    let pad = (max - min) * 0.08;
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("score".into(), vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            Column::new("weight".into(), vec![2.0, 4.0, 5.0, 4.0, 8.0]),
        ])
        .expect("frame")
    }

    #[test]
    fn renders_distribution_to_png_bytes() {
        let figure = Figure::distribution(&sample_frame()).expect("figure");
        let rendered = FigureRenderer::render_png(&figure).expect("render");

        assert_eq!(rendered.width, CELL_WIDTH);
        assert_eq!(rendered.height, 2 * CELL_HEIGHT + TITLE_HEIGHT);
        assert_eq!(&rendered.png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&rendered.png).expect("decode");
        assert_eq!(decoded.width(), rendered.width);
        assert_eq!(decoded.height(), rendered.height);
    }

    #[test]
    fn renders_every_figure_kind() {
        let df = sample_frame();
        for figure in [
            Figure::distribution(&df).expect("distribution"),
            Figure::scatter(&df).expect("scatter"),
            Figure::box_plot(&df).expect("box"),
            Figure::pairwise(&df).expect("pairwise"),
            Figure::regression(&df).expect("regression"),
        ] {
            let rendered = FigureRenderer::render_png(&figure).expect("render");
            assert!(!rendered.png.is_empty());
        }
    }

    #[test]
    fn padded_range_handles_degenerate_input() {
        assert_eq!(padded_range(f64::INFINITY, f64::NEG_INFINITY), (0.0, 1.0));
        assert_eq!(padded_range(2.0, 2.0), (1.5, 2.5));
        let (lo, hi) = padded_range(0.0, 10.0);
        assert!(lo < 0.0 && hi > 10.0);
    }
}
