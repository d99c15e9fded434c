use std::f64::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot,
    PlotBounds, PlotPoint, PlotPoints, Points, Polygon, Text,
};

use tracer_dashboard::chart::{
    BarPanel, BoxPanel, ChartSpec, Panel, PiePanel, StackedBarPanel,
};
use tracer_dashboard::state::AppState;

/// Charts never shrink below this, so empty charts stay visible.
const MIN_PLOT_HEIGHT: f32 = 180.0;
const BAR_WIDTH: f64 = 0.7;
/// Room for "{program} [{n}]" tick labels.
const CATEGORY_AXIS_WIDTH: f32 = 180.0;

// ---------------------------------------------------------------------------
// Central panel – every chart of the current filter
// ---------------------------------------------------------------------------

/// Render the chart list in the central panel.
pub fn charts(ui: &mut Ui, state: &AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a tracer study file to begin  (File → Open…)");
        });
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for chart in &state.charts {
                chart_row(ui, chart);
                ui.separator();
            }
        });
}

fn chart_row(ui: &mut Ui, chart: &ChartSpec) {
    ui.heading(&chart.title);
    let height = chart.height.max(MIN_PLOT_HEIGHT);
    let row_width = ui.available_width();
    let gap = ui.spacing().item_spacing.x;

    ui.horizontal_top(|ui: &mut Ui| {
        for (i, (panel, share)) in chart.panels.iter().zip(&chart.column_widths).enumerate() {
            let width = (row_width * share - gap).max(100.0);
            let id = format!("{:?}-{i}", chart.id);
            ui.vertical(|ui: &mut Ui| {
                ui.set_width(width);
                match panel {
                    Panel::Bar(p) => bar_panel(ui, &id, p, width, height),
                    Panel::Box(p) => box_panel(ui, &id, p, width, height),
                    Panel::Pie(p) => pie_panel(ui, &id, p, width, height),
                    Panel::StackedBar(p) => stacked_panel(ui, &id, p, width, height),
                }
            });
        }
    });
}

fn subtitle(ui: &mut Ui, text: &Option<String>) {
    if let Some(text) = text {
        ui.label(RichText::new(text).strong());
    }
}

/// Plot with a category axis on y: tick `i` shows `labels[i]`.
fn category_plot(id: &str, labels: Vec<String>, width: f32, height: f32) -> Plot {
    Plot::new(id)
        .width(width)
        .height(height)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .y_axis_min_width(CATEGORY_AXIS_WIDTH)
        .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
}

fn category_bounds(x_range: (f64, f64), n: usize) -> PlotBounds {
    PlotBounds::from_min_max([x_range.0, -0.6], [x_range.1, n as f64 - 0.4])
}

// ---------------------------------------------------------------------------
// Horizontal bars
// ---------------------------------------------------------------------------

fn bar_panel(ui: &mut Ui, id: &str, panel: &BarPanel, width: f32, height: f32) {
    subtitle(ui, &panel.axes.subtitle);
    let labels: Vec<String> = panel.bars.iter().map(|b| b.label.clone()).collect();

    let bars: Vec<Bar> = panel
        .bars
        .iter()
        .enumerate()
        .map(|(i, b)| Bar::new(i as f64, b.value).name(&b.label).fill(panel.color))
        .collect();
    let chart = BarChart::new(bars)
        .color(panel.color)
        .width(BAR_WIDTH)
        .horizontal();

    category_plot(id, labels, width, height)
        .x_axis_label(panel.axes.x_title.as_str())
        .y_axis_label(panel.axes.y_title.as_str())
        .show(ui, |plot_ui| {
            if let Some(range) = panel.axes.x_range {
                plot_ui.set_plot_bounds(category_bounds(range, panel.bars.len()));
            }
            plot_ui.bar_chart(chart);
            for (i, b) in panel.bars.iter().enumerate() {
                if let Some(text) = &b.text {
                    // Centre inside the visible part of the bar.
                    let start = panel.axes.x_range.map(|(lo, _)| lo).unwrap_or(0.0);
                    let x = (start.max(0.0) + b.value) / 2.0;
                    plot_ui.text(
                        Text::new(PlotPoint::new(x, i as f64), text.as_str())
                            .color(Color32::WHITE),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Box plot with all points
// ---------------------------------------------------------------------------

fn box_panel(ui: &mut Ui, id: &str, panel: &BoxPanel, width: f32, height: f32) {
    subtitle(ui, &panel.axes.subtitle);

    Plot::new(id)
        .width(width)
        .height(height)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show_x(false)
        .x_axis_formatter(|_: GridMark, _: &RangeInclusive<f64>| String::new())
        .show(ui, |plot_ui| {
            let Some(s) = &panel.summary else {
                plot_ui.text(Text::new(PlotPoint::new(0.0, 0.0), "No data"));
                return;
            };
            let spread = BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker);
            let elem = BoxElem::new(0.0, spread)
                .name(&panel.name)
                .fill(panel.color.linear_multiply(0.3))
                .stroke(Stroke::new(1.5, panel.color))
                .box_width(0.5)
                .whisker_width(0.3);
            plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&panel.name));

            // Points beside the box, spread by a fixed jitter pattern.
            let points: PlotPoints = panel
                .points
                .iter()
                .enumerate()
                .map(|(i, &gpa)| {
                    let jitter = ((i * 37) % 100) as f64 / 100.0 - 0.5;
                    [-0.6 + jitter * 0.3, gpa]
                })
                .collect();
            plot_ui.points(Points::new(points).radius(2.0).color(panel.color));
        });
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

/// Vertices of one slice: centre, then the arc from `start` clockwise by `sweep`.
fn slice_points(start: f64, sweep: f64) -> Vec<[f64; 2]> {
    let steps = ((sweep / TAU) * 120.0).ceil().max(2.0) as usize;
    std::iter::once([0.0, 0.0])
        .chain((0..=steps).map(|k| {
            let a = start - sweep * k as f64 / steps as f64;
            [a.cos(), a.sin()]
        }))
        .collect()
}

fn pie_panel(ui: &mut Ui, id: &str, panel: &PiePanel, width: f32, height: f32) {
    Plot::new(id)
        .width(width)
        .height(height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.2)
        .include_x(1.2)
        .include_y(-1.2)
        .include_y(1.2)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            if panel.slices.is_empty() {
                plot_ui.text(Text::new(PlotPoint::new(0.0, 0.0), "No data"));
                return;
            }
            // Start at twelve o'clock and go clockwise.
            let mut angle = FRAC_PI_2;
            for slice in &panel.slices {
                let sweep = slice.percent / 100.0 * TAU;
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(slice_points(angle, sweep)))
                        .fill_color(slice.color)
                        .stroke(Stroke::new(1.0, Color32::WHITE))
                        .name(&slice.label),
                );
                let mid = angle - sweep / 2.0;
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                        slice.text(),
                    )
                    .color(Color32::BLACK)
                    .anchor(Align2::CENTER_CENTER),
                );
                angle -= sweep;
            }
        });
}

// ---------------------------------------------------------------------------
// Stacked horizontal bars
// ---------------------------------------------------------------------------

fn stacked_panel(ui: &mut Ui, id: &str, panel: &StackedBarPanel, width: f32, height: f32) {
    let n = panel.categories.len();

    let mut charts: Vec<BarChart> = Vec::with_capacity(panel.series.len());
    for series in &panel.series {
        let bars: Vec<Bar> = series
            .values
            .iter()
            .enumerate()
            .map(|(j, &v)| Bar::new(j as f64, v).name(&panel.categories[j]).fill(series.color))
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(&series.name)
            .color(series.color)
            .width(BAR_WIDTH)
            .horizontal()
            .stack_on(&below);
        charts.push(chart);
    }

    category_plot(id, panel.categories.clone(), width, height)
        .x_axis_label(panel.axes.x_title.as_str())
        .y_axis_label(panel.axes.y_title.as_str())
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            if let Some(range) = panel.axes.x_range {
                plot_ui.set_plot_bounds(category_bounds(range, n));
            }
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
            let mut base = vec![0.0; n];
            for series in &panel.series {
                for (j, (&v, text)) in series.values.iter().zip(&series.texts).enumerate() {
                    if v > 0.0 {
                        plot_ui.text(
                            Text::new(PlotPoint::new(base[j] + v / 2.0, j as f64), text.as_str())
                                .color(Color32::BLACK),
                        );
                    }
                    base[j] += v;
                }
            }
        });
}
