mod app;
mod charts;
mod color;
mod config;
mod data;
mod geo;
mod state;
mod stats;
mod ui;

use app::AtlasApp;
use config::Config;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::from_env();
    log::info!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "World Mental Health Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(AtlasApp::new(config)))),
    )
}
