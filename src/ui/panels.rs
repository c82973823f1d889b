use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::charts::PANELS;
use crate::data::filter::FILTERABLE;
use crate::data::metrics::Metrics;
use crate::data::model::CategoryField;
use crate::state::AppState;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Cheap Arc clone so the loop can mutate `state`.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for field in FILTERABLE {
                let all_values = dataset.unique(field);
                let n_selected = state.selection.values(field).map_or(0, |s| s.len());
                let header_text = format!(
                    "Select {}  ({n_selected}/{})",
                    field_label(field),
                    all_values.len()
                );

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(field.column())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(field);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(field);
                            }
                        });

                        for val in all_values {
                            let mut checked = state
                                .selection
                                .values(field)
                                .is_some_and(|s| s.contains(val));
                            if ui.checkbox(&mut checked, val.as_str()).changed() {
                                state.toggle_filter_value(field, val);
                            }
                        }
                    });
            }

            ui.separator();
            age_sliders(ui, state);

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

fn age_sliders(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Select Age Range");
    let (lo, hi) = state.age_bounds();
    let (mut min, mut max) = state.selection.age;

    let from = ui.add(Slider::new(&mut min, lo..=hi).text("from"));
    let to = ui.add(Slider::new(&mut max, lo..=hi).text("to"));

    // Dragging one thumb past the other pushes the other along.
    if from.changed() {
        max = max.max(min);
    }
    if to.changed() {
        min = min.min(max);
    }
    if from.changed() || to.changed() {
        state.set_age_range(min, max);
    }
}

fn field_label(field: CategoryField) -> &'static str {
    match field {
        CategoryField::JobRole => "Job Role",
        CategoryField::MaritalStatus => "Marital Status",
        CategoryField::EducationField => "Education Field",
        CategoryField::OverTime => "Overtime",
        other => other.column(),
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState, source_label: &str) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("HR Analytics & Attrition Dashboard");
        ui.separator();
        ui.label(source_label);
        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} employees loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.load_error {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – metrics and the numbered chart panels
// ---------------------------------------------------------------------------

/// Render the dashboard body, or the blocking load error.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(RichText::new(format!("Could not load data: {err}")).color(Color32::RED));
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("HR Analytics & Attrition Dashboard");
            ui.label(
                "Explore employee attrition trends, demographics, job roles, and satisfaction \
                 insights to drive strategic HR decisions.",
            );
            ui.add_space(8.0);

            key_metrics(ui, &state.metrics);

            for (panel, data) in PANELS.iter().zip(&state.charts) {
                ui.add_space(16.0);
                ui.heading(format!("{}. {}", panel.number, panel.title));
                ui.label(panel.description);
                ui.add_space(4.0);
                plot::panel_chart(ui, panel, data, state);
            }
        });
}

fn key_metrics(ui: &mut Ui, metrics: &Metrics) {
    ui.heading("Key Metrics");
    ui.columns(3, |cols: &mut [Ui]| {
        metric_card(&mut cols[0], "Total Employees", metrics.count.to_string());
        metric_card(&mut cols[1], "Attrition Rate (%)", metrics.attrition_rate_label());
        metric_card(&mut cols[2], "Avg Monthly Income", metrics.avg_income_label());
    });
}

fn metric_card(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(28.0).strong());
    });
}
