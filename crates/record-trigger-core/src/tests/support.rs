use crate::{Command, FramingPolicy, ListenerSettings, RecordingControl, TimeSource};

use std::{
    net::TcpListener,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

/// Host double that records every action it receives, in order.
#[derive(Default)]
pub(crate) struct RecordingSpy {
    starts: AtomicUsize,
    stops: AtomicUsize,
    calls: Mutex<Vec<Command>>,
}

impl RecordingSpy {
    pub(crate) fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub(crate) fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> Vec<Command> {
        self.calls.lock().unwrap().clone()
    }
}

impl RecordingControl for RecordingSpy {
    fn start_recording(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(Command::StartTrigger);
    }

    fn stop_recording(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(Command::StopTrigger);
    }
}

/// Clock frozen at a fixed instant.
pub(crate) struct FixedClock(pub(crate) f64);

impl TimeSource for FixedClock {
    fn now_secs(&self) -> f64 {
        self.0
    }
}

/// Poll `condition` until it holds or `timeout` passes.
pub(crate) fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

/// A trigger server on an ephemeral loopback port.
pub(crate) fn trigger_server() -> (TcpListener, String) {
    let server = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = server.local_addr().unwrap().to_string();
    (server, endpoint)
}

/// A loopback endpoint with nothing listening on it.
pub(crate) fn unused_endpoint() -> String {
    let (server, endpoint) = trigger_server();
    drop(server);
    endpoint
}

/// Settings with short timings so tests do not wait on the defaults.
pub(crate) fn fast_settings(endpoint: &str, framing: FramingPolicy) -> ListenerSettings {
    ListenerSettings {
        endpoint: endpoint.to_string(),
        backoff: Duration::from_millis(20),
        connect_timeout: Duration::from_millis(500),
        framing,
    }
}
