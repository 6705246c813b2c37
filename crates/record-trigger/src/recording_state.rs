use std::time::Instant;

use uuid::Uuid;

/// Recording session state driven by remote triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// No session in progress.
    Idle,
    /// A session started by a remote trigger is in progress.
    Recording {
        /// When the start trigger was handled.
        started_at: Instant,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
}

impl RecordingState {
    /// Whether a session is in progress.
    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording { .. })
    }
}
