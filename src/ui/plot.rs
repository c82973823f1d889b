use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, MarkerShape, Plot, PlotPoint,
    PlotPoints, Points, Polygon, Text,
};

use crate::charts::{BoxGroup, ChartData, ChartSpec, Panel, PointSeries, Series};
use crate::color::coolwarm;
use crate::data::model::CategoryField;
use crate::state::AppState;
use crate::ui::table;

const PLOT_HEIGHT: f32 = 320.0;
const HEATMAP_HEIGHT: f32 = 560.0;
/// Share of a category slot taken up by its bars or boxes.
const GROUP_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Render one numbered panel from its precomputed data.
pub fn panel_chart(ui: &mut Ui, panel: &Panel, data: &ChartData, state: &AppState) {
    if data.is_empty() {
        ui.weak("No employees match the current filters.");
        return;
    }

    let id = format!("panel_{}", panel.number);
    match (panel.chart, data) {
        (ChartSpec::GroupedBars { color, .. }, ChartData::GroupedBars { categories, series }) => {
            grouped_bars(ui, &id, categories, series, color, state)
        }
        (ChartSpec::Pie { names }, ChartData::Pie { slices }) => pie(ui, &id, slices, names, state),
        (ChartSpec::Histogram { x, color, .. }, ChartData::Histogram { edges, series }) => {
            stacked_histogram(ui, &id, x.column(), edges, series, color, state)
        }
        (ChartSpec::BoxPlot { y, color, .. }, ChartData::BoxPlot { categories, groups, boxes }) => {
            box_plot(ui, &id, y.column(), categories, groups, boxes, color, state)
        }
        (ChartSpec::Scatter { x, y, color }, ChartData::Scatter { series }) => {
            scatter(ui, &id, x.column(), y.column(), series, color, state)
        }
        (ChartSpec::CorrelationHeatmap, ChartData::Heatmap { columns, matrix }) => {
            heatmap(ui, &id, columns, matrix)
        }
        (ChartSpec::Table, ChartData::Table { .. }) => table::raw_table(ui, state),
        (spec, _) => {
            log::warn!("Panel {} has data that does not match {spec:?}", panel.number);
        }
    }
}

/// A plot sized for the scrolling dashboard: page scroll stays with the page.
fn base_plot(id: &str) -> Plot<'_> {
    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
}

/// Axis labeller that names integer grid marks after `labels`.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

/// Horizontal offset of colour group `i` of `n` inside a category slot.
fn group_offset(i: usize, n: usize) -> f64 {
    let width = GROUP_WIDTH / n as f64;
    (i as f64 - (n as f64 - 1.0) / 2.0) * width
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

fn grouped_bars(
    ui: &mut Ui,
    id: &str,
    categories: &[String],
    series: &[Series],
    color: CategoryField,
    state: &AppState,
) {
    let n = series.len();
    let bar_width = GROUP_WIDTH / n.max(1) as f64;

    let charts: Vec<BarChart> = series
        .iter()
        .enumerate()
        .map(|(s_idx, s)| {
            let bars = s
                .values
                .iter()
                .enumerate()
                .map(|(c_idx, &count)| {
                    Bar::new(c_idx as f64 + group_offset(s_idx, n), count)
                        .width(bar_width * 0.95)
                        .name(format!("{} / {}", categories[c_idx], s.name))
                })
                .collect();
            BarChart::new(bars)
                .name(&s.name)
                .color(state.color_for(color, &s.name))
        })
        .collect();

    base_plot(id)
        .x_axis_formatter(category_axis(categories.to_vec()))
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

fn stacked_histogram(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    edges: &[f64],
    series: &[Series],
    color: CategoryField,
    state: &AppState,
) {
    let mut charts: Vec<BarChart> = Vec::with_capacity(series.len());
    for s in series {
        let bars = edges
            .windows(2)
            .zip(&s.values)
            .map(|(edge, &count)| {
                Bar::new((edge[0] + edge[1]) / 2.0, count)
                    .width((edge[1] - edge[0]) * 0.98)
                    .name(format!("{:.0} – {:.0}", edge[0], edge[1]))
            })
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(&s.name)
            .color(state.color_for(color, &s.name))
            .stack_on(&below);
        charts.push(chart);
    }

    base_plot(id)
        .x_axis_label(x_label)
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

fn pie(ui: &mut Ui, id: &str, slices: &[(String, usize)], names: CategoryField, state: &AppState) {
    let total: usize = slices.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return;
    }

    let mut start = 0.0_f64;
    let mut wedges = Vec::with_capacity(slices.len());
    let mut labels = Vec::with_capacity(slices.len());
    for (name, count) in slices {
        let sweep = TAU * *count as f64 / total as f64;
        let steps = ((sweep / TAU) * 120.0).ceil().max(2.0) as usize;
        let mut points = vec![[0.0, 0.0]];
        points.extend((0..=steps).map(|i| {
            let a = start + sweep * i as f64 / steps as f64;
            [a.cos(), a.sin()]
        }));
        let points: PlotPoints = points.into_iter().collect();

        let share = 100.0 * *count as f64 / total as f64;
        wedges.push(
            Polygon::new(points)
                .name(format!("{name} ({share:.1}%)"))
                .fill_color(state.color_for(names, name))
                .stroke(Stroke::new(1.0, Color32::WHITE)),
        );

        let mid = start + sweep / 2.0;
        labels.push(Text::new(
            PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
            RichText::new(format!("{share:.1}%")).color(Color32::WHITE).strong(),
        ));
        start += sweep;
    }

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_scroll(false)
        .allow_drag(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for wedge in wedges {
                plot_ui.polygon(wedge);
            }
            for label in labels {
                plot_ui.text(label);
            }
        });
}

// ---------------------------------------------------------------------------
// Box plots
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn box_plot(
    ui: &mut Ui,
    id: &str,
    y_label: &str,
    categories: &[String],
    groups: &[String],
    boxes: &[BoxGroup],
    color: CategoryField,
    state: &AppState,
) {
    let n = groups.len().max(1);
    let box_width = GROUP_WIDTH / n as f64 * 0.9;

    let mut plots = Vec::with_capacity(groups.len());
    let mut outliers = Vec::new();
    for (g_idx, group) in groups.iter().enumerate() {
        let c = state.color_for(color, group);
        let mut elems = Vec::new();
        let mut points = Vec::new();
        for b in boxes.iter().filter(|b| &b.group == group) {
            let x = b.category as f64 + group_offset(g_idx, n);
            let s = &b.summary;
            elems.push(
                BoxElem::new(
                    x,
                    BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
                )
                .name(format!("{} / {group} (n={})", categories[b.category], s.count))
                .box_width(box_width)
                .whisker_width(box_width / 2.0)
                .fill(c.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, c)),
            );
            points.extend(s.outliers.iter().map(|&y| [x, y]));
        }
        plots.push(BoxPlot::new(elems).name(group).color(c));
        if !points.is_empty() {
            outliers.push(
                Points::new(points)
                    .shape(MarkerShape::Circle)
                    .radius(2.5)
                    .color(c),
            );
        }
    }

    base_plot(id)
        .x_axis_formatter(category_axis(categories.to_vec()))
        .y_axis_label(y_label)
        .show(ui, |plot_ui| {
            for plot in plots {
                plot_ui.box_plot(plot);
            }
            for pts in outliers {
                plot_ui.points(pts);
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

fn scatter(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    y_label: &str,
    series: &[PointSeries],
    color: CategoryField,
    state: &AppState,
) {
    base_plot(id)
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .show(ui, |plot_ui| {
            for s in series {
                plot_ui.points(
                    Points::new(s.points.clone())
                        .name(&s.name)
                        .radius(2.5)
                        .color(state.color_for(color, &s.name)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn heatmap(ui: &mut Ui, id: &str, columns: &[String], matrix: &[Vec<f64>]) {
    let n = columns.len();
    // Row 0 is drawn at the top.
    let y_labels: Vec<String> = columns.iter().rev().cloned().collect();

    Plot::new(id)
        .height(HEATMAP_HEIGHT)
        .data_aspect(1.0)
        .show_grid(false)
        .allow_scroll(false)
        .x_axis_formatter(category_axis(columns.to_vec()))
        .y_axis_formatter(category_axis(y_labels))
        .show(ui, |plot_ui| {
            for (i, row) in matrix.iter().enumerate() {
                let y = (n - 1 - i) as f64;
                for (j, &r) in row.iter().enumerate() {
                    let x = j as f64;
                    let cell: PlotPoints = vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ]
                    .into_iter()
                    .collect();
                    plot_ui.polygon(
                        Polygon::new(cell)
                            .fill_color(coolwarm(r))
                            .stroke(Stroke::new(0.5, Color32::from_gray(40))),
                    );
                    if r.is_finite() {
                        plot_ui.text(Text::new(
                            PlotPoint::new(x, y),
                            RichText::new(format!("{r:.2}")).size(9.0).color(Color32::BLACK),
                        ));
                    }
                }
            }
        });
}
