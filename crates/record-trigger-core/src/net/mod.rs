mod connection;

pub use connection::{ConnectionManager, ConnectionState};

use std::time::Duration;

/// Fixed trigger server endpoint.
pub const DEFAULT_ENDPOINT: &str = "127.0.0.1:1299";

/// Upper bound on a single connection handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
