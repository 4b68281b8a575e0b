mod app;
mod charts;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::RetailDashApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Retail Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(RetailDashApp::new(config)))),
    )
}
