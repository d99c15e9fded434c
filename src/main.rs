mod app;
mod ui;

use app::TracerDashboardApp;
use eframe::egui;
use tracer_dashboard::config::Settings;
use tracer_dashboard::state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::from_env();
    let state = match AppState::from_settings(&settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Cannot start: {e}");
            std::process::exit(1);
        }
    };
    let app = TracerDashboardApp { state };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Tracer Study Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
