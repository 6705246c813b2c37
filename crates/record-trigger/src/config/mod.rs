#[allow(clippy::module_inception)]
mod config;
mod listener_config;
mod logging_config;

pub(crate) use {
    config::Config, listener_config::ListenerConfig, logging_config::LoggingConfig,
};

pub(crate) const DEFAULT_HOST: &str = "127.0.0.1";
pub(crate) const DEFAULT_PORT: u16 = 1299;
pub(crate) const DEFAULT_BACKOFF_MS: u64 = 500;
pub(crate) const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2000;
pub(crate) const DEFAULT_LOG_FILTER: &str = "record_trigger=info,record_trigger_core=info";

pub(crate) fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn default_backoff_ms() -> u64 {
    DEFAULT_BACKOFF_MS
}

pub(crate) fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

pub(crate) fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}
