mod clock;
mod dispatcher;
mod host;
mod stats;

pub(crate) use {dispatcher::MessageDispatcher, stats::DispatcherStats};

pub use {
    clock::{SystemClock, TimeSource},
    host::RecordingControl,
    stats::StatsSnapshot,
};
