//! LED matrix clock daemon.
//!
//! This is the main entry point that wires together the persisted
//! settings, the shared clock state, the sampling loop, the display
//! adapter, and the control API.
//!
//! # Startup Sequence
//!
//! 1. Load service configuration from `ledclock-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load the persisted timezone / hour mode (defaults on any failure)
//! 4. Create the shared clock state, running
//! 5. Choose the display adapter (socket bridge or log-only)
//! 6. Spawn the sampling loop
//! 7. Serve the control API until Ctrl-C
//! 8. Stop the sampling loop

mod bridge;
mod error;

use std::path::Path;
use std::sync::Arc;

use ledclock_api::{AppState, ServerConfig};
use ledclock_core::config::ServiceConfig;
use ledclock_core::display::LogDisplay;
use ledclock_core::sampler::{spawn_sampler, Sampler};
use ledclock_core::{ClockControl, ClockState, ConfigStore, DisplayAdapter};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::bridge::BridgeDisplay;
use crate::error::EngineError;

const CONFIG_FILE: &str = "ledclock-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the API cannot bind, or
/// the sampling loop panics.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration (before logging, which it configures).
    let (config, config_source) = load_config()?;

    // 2. Initialize structured logging.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true);
    let installed = if config.logging.json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
    installed.map_err(|e| EngineError::Logging {
        message: format!("{e}"),
    })?;

    info!(
        config_source,
        host = %config.server.host,
        port = config.server.port,
        tick_interval_ms = config.clock.tick_interval_ms,
        state_path = %config.clock.state_path.display(),
        "ledclock-engine starting"
    );

    // 3. Load persisted settings.
    let store = ConfigStore::new(&config.clock.state_path);
    let settings = store.load();

    // 4. Create the shared clock.
    let clock = Arc::new(ClockState::new(settings.timezone, settings.hour_mode));
    info!(
        timezone = %clock.timezone(),
        hour_mode = %clock.hour_mode(),
        "clock state initialized"
    );

    // 5-6. Choose the display and start sampling.
    let display = select_display(&config);
    let sampler = spawn_sampler(
        Sampler::new(Arc::clone(&clock), display).with_interval(config.clock.tick_interval()),
    );

    // 7. Serve the control API.
    let app_state = Arc::new(AppState::new(ClockControl::new(Arc::clone(&clock), store)));
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let served = ledclock_api::start_server(&server_config, app_state, shutdown_signal()).await;

    // 8. Stop sampling whether or not the server exited cleanly.
    sampler.shutdown().await?;
    served?;

    info!("ledclock-engine shutdown complete");
    Ok(())
}

/// Load `ledclock-config.yaml` from the working directory, or defaults
/// (with environment overrides) if it does not exist.
fn load_config() -> Result<(ServiceConfig, &'static str), EngineError> {
    let path = Path::new(CONFIG_FILE);
    if path.exists() {
        Ok((ServiceConfig::from_file(path)?, CONFIG_FILE))
    } else {
        Ok((ServiceConfig::from_env()?, "defaults"))
    }
}

fn select_display(config: &ServiceConfig) -> Box<dyn DisplayAdapter> {
    if let Some(socket) = &config.display.bridge_socket {
        info!(socket = %socket.display(), "using display bridge");
        Box::new(BridgeDisplay::new(socket))
    } else {
        warn!("no display bridge configured, display output is log-only");
        Box::new(LogDisplay::new())
    }
}

/// Resolve on Ctrl-C. If the handler cannot be installed, never resolve
/// so the server keeps running.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
