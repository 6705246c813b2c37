//! Host-side bindings for remote triggers.
//!
//! The listener calls these from its own thread. Each call is handed to the
//! async app loop over a bounded channel instead of acting in place.

use crate::{AppCommand, AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use record_trigger_core::RecordingControl;
use tokio::sync::mpsc;
use tracing::{error, instrument};

/// Recording controls exposed to the trigger listener.
pub struct RecordButton {
    command_tx: mpsc::Sender<AppCommand>,
}

impl RecordButton {
    /// Create bindings that forward to the app loop behind `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Send `command` to the app loop, waiting for channel capacity.
    ///
    /// Must not be called from inside the async runtime.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn forward(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .blocking_send(command)
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", command, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl RecordingControl for RecordButton {
    fn start_recording(&self) {
        if let Err(e) = self.forward(AppCommand::StartRecording) {
            error!(error = ?e, "Failed to forward start trigger");
        }
    }

    fn stop_recording(&self) {
        if let Err(e) = self.forward(AppCommand::StopRecording) {
            error!(error = ?e, "Failed to forward stop trigger");
        }
    }
}
