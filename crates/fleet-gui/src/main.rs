//! GUI entry point for the fleet tracker

mod app;
mod canvas;
mod list_panel;
mod map_view;
mod table_panel;
mod theme;
mod tiles;

use std::sync::Arc;

use app::{FleetApp, APP_TITLE};
use eframe::egui;
use fleet_app::config::Config;
use fleet_app::logging;
use fleet_app::service::VehicleService;
use fleet_infra::HttpVehicleGateway;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    match Config::init_default() {
        Ok(true) => info!("wrote default config file"),
        Ok(false) => {}
        Err(e) => warn!(error = %e, "could not write default config file"),
    }

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "failed to load config, using defaults");
        Config::default()
    });
    info!(
        api_url = %config.api.base_url,
        token = %config.token_preview(),
        "starting fleet tracker"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("fleet-io")
        .build()?;

    let gateway = HttpVehicleGateway::new(&config.gateway_options())?;
    let service = VehicleService::with_sample_fallback(Arc::new(gateway));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(FleetApp::new(cc, config, runtime, service)))),
    )?;
    Ok(())
}
