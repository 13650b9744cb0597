mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;
mod units;

use std::path::PathBuf;

use app::TelemetryGrapherApp;
use config::{ViewerConfig, DEFAULT_CONFIG_FILE};
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = ViewerConfig::load_or_default(&config_path).unwrap_or_else(|e| {
        log::error!("{e:#}; falling back to defaults");
        ViewerConfig::default()
    });
    log::info!(
        "Reading logs from {} as {}",
        config.data_dir.display(),
        config.encoding
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Interactive Data Grapher",
        options,
        Box::new(|_cc| Ok(Box::new(TelemetryGrapherApp::new(AppState::new(config))))),
    )
}
