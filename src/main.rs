//! Air Crashes Dashboard - aviation accident data cleaning & year-filtered charts
//!
//! Loads the accident CSV, cleans it once into a canonical table and shows
//! summary charts filtered by year.

mod charts;
mod config;
mod data;
mod gui;
mod logging;
mod stats;
mod views;

use anyhow::{anyhow, Context};
use config::AppConfig;
use eframe::egui;
use gui::DashboardApp;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load dashboard configuration")?;
    logging::init_logging(&config.log_filter);
    info!(data_path = %config.data_path.display(), "Starting Air Crashes Overview");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Air Crashes Overview"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Air Crashes Overview",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("Dashboard window failed: {e}"))
}
