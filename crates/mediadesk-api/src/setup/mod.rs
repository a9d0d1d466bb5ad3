//! Application setup and initialization
//!
//! Initialization logic kept out of main.rs: telemetry, storage roots,
//! service construction, background tasks, and route assembly.

pub mod routes;
pub mod server;
pub mod services;

use anyhow::{Context, Result};

use mediadesk_core::Config;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(AppState, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let (state, reaper) = services::initialize_services(&config).await?;

    // Detached background task; it lives for the life of the process
    reaper.start();
    tracing::info!(
        interval_secs = config.reaper_interval_secs,
        max_age_minutes = config.staging_max_age_minutes,
        "Staging reaper started"
    );

    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
