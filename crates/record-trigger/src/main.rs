//! Record-Trigger: start and stop recording sessions from a remote trigger server.

mod app;
mod app_command;
mod config;
mod error;
mod record_button;
mod recording_state;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    record_button::RecordButton,
    recording_state::RecordingState,
};

use crate::config::{Config, DEFAULT_LOG_FILTER};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use record_trigger_core::{RemoteTrigger, SystemClock};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application entry point.
fn main() {
    let config = Config::load();

    let filter = config
        .as_ref()
        .map(|c| c.logging.filter.clone())
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Config validation failed: {:?}", e);
        std::process::exit(1);
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(config)) {
        error!(error = ?e, "Record-Trigger exited with error");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> AppResult<()> {
    let (command_tx, command_rx) = mpsc::channel(32);

    let button = Arc::new(RecordButton::new(command_tx.clone()));
    let mut trigger = RemoteTrigger::start(
        button,
        Arc::new(SystemClock),
        config.listener.to_settings(),
    )?;

    info!(endpoint = %config.listener.endpoint(), "Waiting for remote triggers");

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = ?e, "Failed to listen for Ctrl-C");
            return;
        }
        info!("Ctrl-C received");
        if let Err(e) = command_tx.send(AppCommand::Shutdown).await {
            error!(error = ?e, "Failed to send shutdown command");
        }
    });

    // The app owns the receiver; dropping it after run() fails any
    // in-flight forward on the listener thread so the join below can't stall.
    let sessions = App::new(command_rx).run().await;
    info!(sessions, "Stopping trigger listener");

    tokio::task::spawn_blocking(move || trigger.shutdown())
        .await
        .map_err(|e| AppError::ShutdownFailed {
            reason: format!("Listener shutdown task failed: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
}
