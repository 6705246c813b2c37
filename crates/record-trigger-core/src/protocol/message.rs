use crate::{
    CoreResult, ListenerError,
    protocol::{COMMAND_OFFSET, Command, FRAME_SIZE, SEND_TIME_OFFSET},
};

use std::panic::Location;

use error_location::ErrorLocation;

/// One decoded trigger frame.
///
/// Messages are ephemeral: decoded from a receive buffer, dispatched, and
/// dropped. The raw code is kept so unknown commands can be reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Message {
    /// Raw command code (0 = start, 1 = stop).
    pub command_code: i32,
    /// Sender-side timestamp in seconds.
    pub send_time: f64,
}

impl Message {
    /// Build a message for a known command.
    pub fn new(command: Command, send_time: f64) -> Self {
        Self {
            command_code: command.code(),
            send_time,
        }
    }

    /// Decode a frame. The input must be exactly [`FRAME_SIZE`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::MalformedFrame`] for any other length.
    #[track_caller]
    pub fn decode(bytes: &[u8]) -> CoreResult<Self> {
        let frame: &[u8; FRAME_SIZE] = bytes.try_into().map_err(|_| ListenerError::MalformedFrame {
            len: bytes.len(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut code = [0u8; 4];
        code.copy_from_slice(&frame[COMMAND_OFFSET..COMMAND_OFFSET + 4]);
        let mut time = [0u8; 8];
        time.copy_from_slice(&frame[SEND_TIME_OFFSET..SEND_TIME_OFFSET + 8]);

        Ok(Self {
            command_code: i32::from_le_bytes(code),
            send_time: f64::from_le_bytes(time),
        })
    }

    /// Encode this message the way the trigger sender lays it out.
    pub fn encode(&self) -> [u8; FRAME_SIZE] {
        let mut frame = [0u8; FRAME_SIZE];
        frame[COMMAND_OFFSET..COMMAND_OFFSET + 4]
            .copy_from_slice(&self.command_code.to_le_bytes());
        frame[SEND_TIME_OFFSET..SEND_TIME_OFFSET + 8]
            .copy_from_slice(&self.send_time.to_le_bytes());
        frame
    }

    /// Interpret the command code.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::UnknownCommand`] for codes other than 0 and 1.
    #[track_caller]
    pub fn command(&self) -> CoreResult<Command> {
        Command::try_from(self.command_code)
    }

    /// Seconds between the sender's timestamp and `now`.
    ///
    /// Only meaningful when both sides share a clock; used for diagnostics.
    pub fn latency_secs(&self, now: f64) -> f64 {
        now - self.send_time
    }
}
