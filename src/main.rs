use std::sync::Arc;

use anyhow::Context;
use customer_dashboard::app::CustomerDashboardApp;
use customer_dashboard::config::Config;
use customer_dashboard::data;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::from_env();
    log::debug!("Using {config:?}");

    let data = data::loader::load(&config.customers, &config.coordinates)
        .context("dashboard cannot start")?;
    let data = Arc::new(data);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Customer Demography Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(CustomerDashboardApp::new(data)))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}
