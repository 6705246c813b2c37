use crate::{AppCommand, RecordingState};

use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Main application state.
///
/// Runs on the async runtime. Remote triggers arrive as [`AppCommand`]s
/// forwarded by [`crate::RecordButton`] from the listener thread.
pub struct App {
    command_rx: mpsc::Receiver<AppCommand>,
    state: RecordingState,
}

impl App {
    /// Create an idle app reading commands from `command_rx`.
    pub fn new(command_rx: mpsc::Receiver<AppCommand>) -> Self {
        Self {
            command_rx,
            state: RecordingState::Idle,
        }
    }

    /// Current recording state.
    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Run until shutdown is requested or every sender is gone.
    ///
    /// Returns the number of sessions completed.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> u64 {
        info!("Record-Trigger starting");

        let mut completed = 0;
        while let Some(command) = self.command_rx.recv().await {
            let was_recording = self.state.is_recording();
            let keep_running = self.handle_command(command);
            if was_recording && !self.state.is_recording() {
                completed += 1;
            }
            if !keep_running {
                break;
            }
        }

        info!(sessions = completed, state = ?self.state(), "Record-Trigger shut down");
        completed
    }

    /// Apply one command to the recording state.
    ///
    /// Returns `false` once shutdown has been handled.
    #[instrument(skip(self))]
    pub fn handle_command(&mut self, command: AppCommand) -> bool {
        match command {
            AppCommand::StartRecording => {
                self.start_recording();
                true
            }
            AppCommand::StopRecording => {
                self.stop_recording();
                true
            }
            AppCommand::Shutdown => {
                info!("Shutdown requested");
                if self.state.is_recording() {
                    self.stop_recording();
                }
                false
            }
        }
    }

    fn start_recording(&mut self) {
        match self.state {
            RecordingState::Idle => {
                let session_id = Uuid::new_v4();
                self.state = RecordingState::Recording {
                    started_at: Instant::now(),
                    session_id,
                };
                info!(session_id = %session_id, "Recording started");
            }
            RecordingState::Recording { session_id, .. } => {
                warn!(session_id = %session_id, "Start trigger while recording, ignoring");
            }
        }
    }

    fn stop_recording(&mut self) {
        match self.state {
            RecordingState::Recording {
                started_at,
                session_id,
            } => {
                self.state = RecordingState::Idle;
                info!(
                    session_id = %session_id,
                    duration_ms = started_at.elapsed().as_millis(),
                    "Recording stopped"
                );
            }
            RecordingState::Idle => {
                warn!("Stop trigger while idle, ignoring");
            }
        }
    }
}
