mod app;
mod charts;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::HrDashboardApp;
use config::DashboardConfig;
use data::cache::DataSource;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env();
    let source = DataSource::new(&config.data_path);
    // Read once up front; a failure becomes the blocking error screen.
    let state = AppState::from_load(source.load());
    let app = HrDashboardApp::new(&source, state);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "HR Attrition Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
