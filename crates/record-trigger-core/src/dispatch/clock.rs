use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" in seconds, used to log trigger latency.
pub trait TimeSource: Send + Sync {
    /// Current time in seconds.
    fn now_secs(&self) -> f64;
}

/// Wall-clock seconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_secs(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or_default()
    }
}
