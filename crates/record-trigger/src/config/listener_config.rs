use crate::config::{
    default_backoff_ms, default_connect_timeout_ms, default_host, default_port,
};

use std::time::Duration;

use record_trigger_core::{FramingPolicy, ListenerSettings};
use serde::{Deserialize, Serialize};

/// Trigger listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerConfig {
    /// Trigger server host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Trigger server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Delay between failed connection attempts, in milliseconds.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Bound on a single connection handshake, in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// `per_read` or `accumulate`.
    #[serde(default)]
    pub framing: FramingPolicy,
}

impl ListenerConfig {
    /// Endpoint as `host:port`.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings for the core listener.
    pub fn to_settings(&self) -> ListenerSettings {
        ListenerSettings {
            endpoint: self.endpoint(),
            backoff: Duration::from_millis(self.backoff_ms),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            framing: self.framing,
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            backoff_ms: default_backoff_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            framing: FramingPolicy::default(),
        }
    }
}
