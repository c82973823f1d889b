use eframe::egui;

use crate::data::cache::DataSource;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HrDashboardApp {
    pub state: AppState,
    source_label: String,
}

impl HrDashboardApp {
    /// Wrap the state built from `source`'s startup load.
    pub fn new(source: &DataSource, state: AppState) -> Self {
        Self {
            state,
            source_label: format!("Data: {}", source.path().display()),
        }
    }
}

impl eframe::App for HrDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: status bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state, &self.source_label);
        });

        // ---- Left side panel: filters (hidden while the load error blocks) ----
        if self.state.load_error.is_none() {
            egui::SidePanel::left("filter_panel")
                .default_width(260.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: metrics and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &self.state);
        });
    }
}
