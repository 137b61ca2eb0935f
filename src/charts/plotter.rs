//! Figure Plotter Module
//! Draws figure panels interactively using egui_plot.

use crate::charts::figure::{BarPanel, BoxPanel, Figure, HistogramPanel, Panel, ScatterPanel};
use egui::{Color32, RichText};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points,
};

/// Series palette, shared with the static renderer.
pub const SERIES_COLORS: [Color32; 4] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
];
pub const CURVE_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

pub fn series_color(idx: usize) -> Color32 {
    SERIES_COLORS[idx % SERIES_COLORS.len()]
}

/// Draws figures on screen using egui_plot.
pub struct FigurePlotter;

impl FigurePlotter {
    /// Draw a figure as a grid of interactive panels.
    ///
    /// Stacked figures get tall zoomable panels; grid figures use
    /// compact fixed cells so the matrix stays readable.
    pub fn draw_figure(ui: &mut egui::Ui, figure: &Figure) {
        let cols = figure.grid_columns.max(1);
        let full_size = cols == 1;
        let height = if full_size { 300.0 } else { 180.0 };
        let spacing = ui.spacing().item_spacing.x;
        let cell_width =
            ((ui.available_width() - spacing * (cols as f32 - 1.0)) / cols as f32).max(120.0);

        egui::Grid::new(ui.make_persistent_id(&figure.title))
            .num_columns(cols)
            .spacing([spacing, spacing])
            .show(ui, |ui| {
                for (i, panel) in figure.panels.iter().enumerate() {
                    let id_salt = format!("{}_{}", figure.title, i);
                    Self::draw_panel(ui, panel, &id_salt, cell_width, height, full_size);
                    if (i + 1) % cols == 0 {
                        ui.end_row();
                    }
                }
            });
    }

    pub fn draw_panel(
        ui: &mut egui::Ui,
        panel: &Panel,
        id_salt: &str,
        width: f32,
        height: f32,
        full_size: bool,
    ) {
        ui.vertical(|ui| {
            ui.set_width(width);
            match panel {
                Panel::Histogram(h) => {
                    Self::panel_header(ui, &h.title);
                    Self::draw_histogram(ui, h, id_salt, width, height, full_size);
                }
                Panel::Box(b) => {
                    Self::panel_header(ui, &b.title);
                    Self::draw_box(ui, b, id_salt, width, height, full_size);
                    Self::panel_footnote(ui, b.annotation.as_deref());
                }
                Panel::Scatter(s) => {
                    Self::panel_header(ui, &s.title);
                    Self::draw_scatter(ui, s, id_salt, width, height, full_size);
                }
                Panel::Bars(b) => {
                    Self::panel_header(ui, &b.title);
                    Self::draw_bars(ui, b, id_salt, width, height, full_size);
                    Self::panel_footnote(ui, b.annotation.as_deref());
                }
                Panel::Label(text) => {
                    ui.add_sized(
                        [width, height],
                        egui::Label::new(RichText::new(text).strong().size(16.0)),
                    );
                }
            }
        });
    }

    fn panel_header(ui: &mut egui::Ui, title: &str) {
        if !title.is_empty() {
            ui.label(RichText::new(title).strong().size(12.0));
        }
    }

    fn panel_footnote(ui: &mut egui::Ui, annotation: Option<&str>) {
        if let Some(text) = annotation {
            ui.label(RichText::new(text).size(11.0));
        }
    }

    fn draw_histogram(
        ui: &mut egui::Ui,
        panel: &HistogramPanel,
        id_salt: &str,
        width: f32,
        height: f32,
        full_size: bool,
    ) {
        let color = SERIES_COLORS[0];
        let bars: Vec<Bar> = panel
            .bins
            .iter()
            .map(|bin| {
                Bar::new((bin.start + bin.end) / 2.0, bin.density)
                    .width(bin.end - bin.start)
                    .fill(color.gamma_multiply(0.45))
                    .stroke(egui::Stroke::new(1.0, color))
            })
            .collect();

        Plot::new(id_salt.to_owned())
            .width(width)
            .height(height)
            .allow_zoom(full_size)
            .allow_drag(full_size)
            .allow_scroll(false)
            .y_axis_label("Density")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
                if !panel.kde.is_empty() {
                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(panel.kde.iter().copied()))
                            .color(CURVE_COLOR)
                            .width(1.5)
                            .name("Density"),
                    );
                }
            });
    }

    fn draw_box(
        ui: &mut egui::Ui,
        panel: &BoxPanel,
        id_salt: &str,
        width: f32,
        height: f32,
        full_size: bool,
    ) {
        let x_labels: Vec<String> = panel.boxes.iter().map(|b| b.label.clone()).collect();

        Plot::new(id_salt.to_owned())
            .width(width)
            .height(height)
            .allow_zoom(full_size)
            .allow_drag(full_size)
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if idx < x_labels.len() {
                    x_labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (i, item) in panel.boxes.iter().enumerate() {
                    let color = series_color(i);
                    let s = &item.stats;
                    let elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(
                            s.whisker_low,
                            s.summary.q1,
                            s.summary.median,
                            s.summary.q3,
                            s.whisker_high,
                        ),
                    )
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(egui::Stroke::new(1.5, color));

                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&item.label));

                    if !s.outliers.is_empty() {
                        let points: PlotPoints =
                            s.outliers.iter().map(|&v| [i as f64, v]).collect();
                        plot_ui.points(
                            Points::new(points)
                                .radius(2.5)
                                .color(color)
                                .name(format!("{} outliers", item.label)),
                        );
                    }
                }
            });
    }

    fn draw_scatter(
        ui: &mut egui::Ui,
        panel: &ScatterPanel,
        id_salt: &str,
        width: f32,
        height: f32,
        full_size: bool,
    ) {
        let mut x_lo = f64::INFINITY;
        let mut x_hi = f64::NEG_INFINITY;
        for p in &panel.points {
            x_lo = x_lo.min(p[0]);
            x_hi = x_hi.max(p[0]);
        }

        Plot::new(id_salt.to_owned())
            .width(width)
            .height(height)
            .allow_zoom(full_size)
            .allow_drag(full_size)
            .allow_scroll(false)
            .x_axis_label(panel.x_label.clone())
            .y_axis_label(panel.y_label.clone())
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(panel.points.iter().copied()))
                        .radius(2.5)
                        .color(SERIES_COLORS[0].gamma_multiply(0.8)),
                );

                if let Some(fit) = &panel.fit {
                    if x_lo.is_finite() && x_hi > x_lo {
                        let line: PlotPoints = [x_lo, x_hi]
                            .iter()
                            .map(|&x| [x, fit.slope * x + fit.intercept])
                            .collect();
                        plot_ui.line(Line::new(line).color(CURVE_COLOR).width(1.5).name("Fit"));
                    }
                }
            });
    }

    fn draw_bars(
        ui: &mut egui::Ui,
        panel: &BarPanel,
        id_salt: &str,
        width: f32,
        height: f32,
        full_size: bool,
    ) {
        let x_labels: Vec<String> = panel.categories.iter().map(|c| c.label.clone()).collect();
        let series_count = panel.series.len().max(1);
        let slot = 0.8 / series_count as f64;

        Plot::new(id_salt.to_owned())
            .width(width)
            .height(height)
            .allow_zoom(full_size)
            .allow_drag(full_size)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if idx < x_labels.len() {
                    x_labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (s, series_name) in panel.series.iter().enumerate() {
                    let color = series_color(s);
                    let offset = (s as f64 + 0.5) * slot - 0.4;
                    let bars: Vec<Bar> = panel
                        .categories
                        .iter()
                        .enumerate()
                        .filter_map(|(j, cat)| {
                            let count = *cat.counts.get(s)?;
                            Some(
                                Bar::new(j as f64 + offset, count)
                                    .width(slot * 0.85)
                                    .fill(color.gamma_multiply(0.75))
                                    .stroke(egui::Stroke::new(1.0, color)),
                            )
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).name(series_name));
                }
            });
    }
}
