#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod views;
mod worker;

use std::path::PathBuf;

use app::EnergyInsightApp;
use ei_client::config::ENV_CONFIG;
use ei_client::{ApiClient, ClientConfig, EiaClient, SessionStore};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::var_os(ENV_CONFIG).map(PathBuf::from);
    let config = ClientConfig::load(config_path.as_deref())?;
    let session = match SessionStore::open(&config.session_file()) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "session file unusable, starting signed out");
            SessionStore::in_memory()
        }
    };
    let api = ApiClient::new(&config, session)?;
    let eia = EiaClient::new(&config)?;
    let has_key = config.eia_api_key.is_some();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_title("EnergyInsight"),
        ..Default::default()
    };

    eframe::run_native(
        "EnergyInsight",
        options,
        Box::new(move |cc| Ok(Box::new(EnergyInsightApp::new(cc, api, eia, has_key)))),
    )?;
    Ok(())
}
