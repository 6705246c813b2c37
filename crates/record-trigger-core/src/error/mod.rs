use error_location::ErrorLocation;
use thiserror::Error;

/// Trigger listener errors with source location tracking.
///
/// None of these are fatal to the host: the receive loop logs them and
/// either reconnects or drops the offending frame.
#[derive(Error, Debug)]
pub enum ListenerError {
    /// The trigger endpoint could not be resolved to a socket address.
    #[error("Failed to resolve {endpoint}: {reason} {location}")]
    ResolveFailed {
        /// Endpoint as configured (`host:port`).
        endpoint: String,
        /// Description of the resolution failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Every resolved address refused or timed out.
    #[error("Unable to connect to {endpoint}: {source} {location}")]
    ConnectFailed {
        /// Endpoint as configured (`host:port`).
        endpoint: String,
        /// Error from the last address attempted.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Socket-level read failure on an established connection.
    #[error("recv failed: {source} {location}")]
    ReceiveFailed {
        /// Underlying socket error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A receive was attempted without an open connection.
    #[error("Not connected {location}")]
    NotConnected {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Byte count present but not equal to the frame size.
    #[error("Malformed frame of {len} bytes {location}")]
    MalformedFrame {
        /// Number of bytes received.
        len: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Well-formed frame carrying an unrecognised command code.
    #[error("Unknown command code {code} {location}")]
    UnknownCommand {
        /// The command code found on the wire.
        code: i32,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The background listener thread could not be started.
    #[error("Failed to spawn listener thread: {source} {location}")]
    ThreadSpawn {
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`ListenerError`].
pub type Result<T> = std::result::Result<T, ListenerError>;
