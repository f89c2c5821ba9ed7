// src/main.rs
use crate::config::AppConfig;
use crate::connectors::backend::BackendClient;
use crate::core::poller::Poller;
use crate::core::refresher::DashboardRefresher;
use crate::core::render::ChannelView;
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

mod config;
mod connectors;
mod core;
mod error;
mod tui;
mod types;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // 1. Load Configuration
    let config = AppConfig::new()?;
    let _log_guard = utils::logging::init(&config.log);

    info!("========================================");
    info!("Trade dashboard starting");
    info!("Backend: {}", config.backend.base_url);
    info!(
        "Refresh every {}s, retry after {}s",
        config.refresh.interval_secs, config.refresh.retry_delay_secs
    );
    info!("========================================");

    // 2. Initialize Components
    let api = BackendClient::new(
        &config.backend.base_url,
        Duration::from_secs(config.backend.request_timeout_secs),
    )?;

    // 3. Create Channels
    let (ui_tx, ui_rx) = mpsc::channel(100);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let refresher = DashboardRefresher::new(
        Arc::new(api),
        Arc::new(ChannelView::new(ui_tx)),
        config.refresh.retry_delay(),
        shutdown_rx,
    );

    // 4. Start polling: one refresh now, then on every interval
    let poller = Poller::spawn(refresher.clone(), config.refresh.interval(), shutdown_tx);

    // 5. Run UI until the user quits
    let result = tui::run(ui_rx, refresher, config.backend.base_url.clone()).await;
    if let Err(e) = &result {
        error!("UI terminated with error: {}", e);
    }

    poller.shutdown().await;
    info!("Trade dashboard stopped");

    result
}
