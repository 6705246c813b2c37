use crate::{CoreResult, ListenerError};

use std::{fmt, panic::Location};

use error_location::ErrorLocation;

/// Remote trigger commands understood by the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Command {
    /// Start a recording session.
    StartTrigger = 0,
    /// Stop the current recording session.
    StopTrigger = 1,
}

impl Command {
    /// Wire code for this command.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for Command {
    type Error = ListenerError;

    #[track_caller]
    fn try_from(code: i32) -> CoreResult<Self> {
        match code {
            0 => Ok(Command::StartTrigger),
            1 => Ok(Command::StopTrigger),
            code => Err(ListenerError::UnknownCommand {
                code,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::StartTrigger => f.write_str("start"),
            Command::StopTrigger => f.write_str("stop"),
        }
    }
}
