//! SANC-I Health Dashboard
//!
//! Interactive viewer for the national health CSV: TOTAL rows, one
//! indicator/parameter pair at a time, year-over-year KPIs and a monthly trend.

mod charts;
mod config;
mod data;
mod gui;

use anyhow::{anyhow, Context};
use config::{DashboardConfig, CONFIG_FILE};
use data::TableCache;
use eframe::egui;
use gui::DashboardApp;
use log::info;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::load(Path::new(CONFIG_FILE))?.with_args(std::env::args().skip(1));
    info!("data source: {}", config.data_path.display());

    // Without a table there is nothing to show
    let cache = TableCache::new(&config.data_path);
    let table = cache
        .get_or_load()
        .with_context(|| format!("Failed to load {}", config.data_path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([900.0, 600.0])
            .with_title(&config.title),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(&config, cache, table)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
