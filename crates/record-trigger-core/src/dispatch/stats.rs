use std::sync::atomic::{AtomicU64, Ordering};

/// Diagnostic counters written by the receive loop.
#[derive(Debug, Default)]
pub(crate) struct DispatcherStats {
    frames_dispatched: AtomicU64,
    frames_discarded: AtomicU64,
    unknown_commands: AtomicU64,
    connect_attempts: AtomicU64,
    reconnects: AtomicU64,
}

/// Point-in-time copy of the listener's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Frames that invoked a host action.
    pub frames_dispatched: u64,
    /// Receive results discarded as malformed.
    pub frames_discarded: u64,
    /// Well-formed frames with an unrecognised command code.
    pub unknown_commands: u64,
    /// Calls to connect, successful or not.
    pub connect_attempts: u64,
    /// Connections established after the first one.
    pub reconnects: u64,
}

impl DispatcherStats {
    pub(crate) fn record_dispatched(&self) {
        self.frames_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_discarded(&self) {
        self.frames_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unknown(&self) {
        self.unknown_commands.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_connect_attempt(&self) {
        self.connect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_reconnect(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_dispatched: self.frames_dispatched.load(Ordering::Relaxed),
            frames_discarded: self.frames_discarded.load(Ordering::Relaxed),
            unknown_commands: self.unknown_commands.load(Ordering::Relaxed),
            connect_attempts: self.connect_attempts.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
        }
    }
}
