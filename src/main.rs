mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::Path;

use app::DashboardApp;
use config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let (config, startup_message) = match DashboardConfig::load_or_default(Path::new(CONFIG_FILE)) {
        Ok(config) => (config, None),
        Err(e) => {
            log::error!("Ignoring {CONFIG_FILE}: {e:#}");
            (DashboardConfig::default(), Some(format!("Config error: {e:#}")))
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(config, startup_message)))),
    )
}
