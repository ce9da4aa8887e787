//! Desktop client for a video info/download backend

// Backend HTTP contract
mod api;
// egui front end
mod app;
// Command line / environment settings
mod config;
// Page logic, independent of egui
mod controller;
// Runs controller commands against the backend
mod dispatch;
// Error type and banner messages
mod error;
// Duration and size labels
mod format;
// Terminal logger setup
mod logging;
// Wire and save-task models
mod model;
// Opening folders and URLs with the OS
mod platform;
// Streaming resolved downloads to disk
mod saver;
// Per-page request state
mod session;
// Thumbnail fetch and decode
mod thumbnail;
// View model the UI renders
mod view;

use anyhow::{Context as _, Result};
use clap::Parser;
use eframe::egui::Visuals;
use log::info;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::api::{Backend, HttpBackend};
use crate::app::VideoPageApp;
use crate::config::{Cli, ClientConfig};

// Global Tokio runtime stored in a OnceCell; it must outlive the window
static RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

/// Program entry point: reads settings, starts the runtime and the GUI
fn main() -> Result<()> {
    let config = ClientConfig::from(Cli::parse());
    logging::init_logger(config.log_level)?;
    info!("using backend at {}", config.server);

    let rt = RUNTIME
        .get_or_try_init(|| Runtime::new().map(Arc::new))
        .context("failed to start the async runtime")?;
    let handle = rt.handle().clone();

    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(config.server.clone(), config.request_timeout)?);
    let save_client = reqwest::Client::builder()
        .connect_timeout(config.request_timeout)
        .build()
        .context("failed to build the download client")?;

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Video Downloader",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(Visuals::dark());
            Box::new(VideoPageApp::new(cc, &config, backend, save_client, handle))
        }),
    )
    .map_err(|e| anyhow::anyhow!("the window closed with an error: {e}"))
}
