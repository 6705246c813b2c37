//! Read-decode-dispatch loop for remote triggers.
//!
//! Runs on the listener's background thread. Owns the retry policy and
//! the framing policy; the socket itself belongs to [`ConnectionManager`].

use crate::{
    ConnectionManager, ConnectionState,
    dispatch::{DispatcherStats, RecordingControl, TimeSource},
    protocol::{Command, FrameAccumulator, FramingPolicy, Message, RECV_BUFFER_SIZE},
};

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use tracing::{debug, info, instrument, warn};

pub(crate) struct MessageDispatcher {
    connection: Arc<ConnectionManager>,
    actions: Arc<dyn RecordingControl>,
    clock: Arc<dyn TimeSource>,
    /// Cleared exactly once, by the owning listener at shutdown.
    running: Arc<AtomicBool>,
    stats: Arc<DispatcherStats>,
    backoff: Duration,
    framing: FramingPolicy,
    accumulator: FrameAccumulator,
}

impl MessageDispatcher {
    pub(crate) fn new(
        connection: Arc<ConnectionManager>,
        actions: Arc<dyn RecordingControl>,
        clock: Arc<dyn TimeSource>,
        running: Arc<AtomicBool>,
        stats: Arc<DispatcherStats>,
        backoff: Duration,
        framing: FramingPolicy,
    ) -> Self {
        Self {
            connection,
            actions,
            clock,
            running,
            stats,
            backoff,
            framing,
            accumulator: FrameAccumulator::new(),
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Connect, receive until the connection drops, repeat until stopped.
    #[instrument(skip(self), fields(endpoint = %self.connection.endpoint()))]
    pub(crate) fn run(mut self) {
        info!(framing = ?self.framing, "Trigger listener started");

        let mut buf = [0u8; RECV_BUFFER_SIZE];
        let mut connected_before = false;

        while self.is_running() {
            if !self.establish() {
                break;
            }

            if connected_before {
                self.stats.record_reconnect();
            }
            connected_before = true;

            self.receive_until_disconnected(&mut buf);

            self.connection.close();
            if self.accumulator.pending() > 0 {
                debug!(
                    pending = self.accumulator.pending(),
                    "Dropping partial frame"
                );
            }
            self.accumulator.clear();
        }

        self.connection.close();
        info!("Trigger listener stopped");
    }

    /// Retry connecting until it succeeds or shutdown is requested.
    ///
    /// Returns `false` when the loop should exit.
    fn establish(&self) -> bool {
        while self.is_running() {
            self.stats.record_connect_attempt();
            match self.connection.connect() {
                Ok(()) => return true,
                Err(e) => {
                    debug!(error = %e, backoff_ms = self.backoff.as_millis(), "Connect failed");
                    if self.is_running() {
                        thread::sleep(self.backoff);
                    }
                }
            }
        }
        false
    }

    fn receive_until_disconnected(&mut self, buf: &mut [u8]) {
        while self.is_running() && self.connection.state() == ConnectionState::Connected {
            match self.connection.receive(buf) {
                Ok(0) => {
                    info!("Connection closed by peer");
                    return;
                }
                Ok(n) => {
                    self.handle_bytes(&buf[..n]);
                }
                Err(e) => {
                    if self.is_running() {
                        warn!(error = %e, "Receive failed, reconnecting");
                    } else {
                        debug!(error = %e, "Receive interrupted by shutdown");
                    }
                    return;
                }
            }
        }
    }

    /// Apply the framing policy to one receive result.
    ///
    /// Returns how many host actions were invoked.
    pub(crate) fn handle_bytes(&mut self, bytes: &[u8]) -> usize {
        match self.framing {
            FramingPolicy::PerRead => match Message::decode(bytes) {
                Ok(message) => usize::from(self.dispatch(&message).is_some()),
                Err(e) => {
                    self.stats.record_discarded();
                    debug!(error = %e, "Discarding frame");
                    0
                }
            },
            FramingPolicy::Accumulate => {
                let frames = self.accumulator.push(bytes);
                frames
                    .iter()
                    .filter_map(|frame| Message::decode(frame).ok())
                    .filter(|message| self.dispatch(message).is_some())
                    .count()
            }
        }
    }

    /// Invoke the host action for `message`, if it names one.
    pub(crate) fn dispatch(&self, message: &Message) -> Option<Command> {
        let command = match message.command() {
            Ok(command) => command,
            Err(e) => {
                self.stats.record_unknown();
                warn!(error = %e, "Ignoring trigger");
                return None;
            }
        };

        match command {
            Command::StartTrigger => {
                let latency_ms = message.latency_secs(self.clock.now_secs()) * 1000.0;
                debug!(latency_ms, "Start trigger received");
                self.actions.start_recording();
            }
            Command::StopTrigger => {
                debug!("Stop trigger received");
                self.actions.stop_recording();
            }
        }

        self.stats.record_dispatched();
        Some(command)
    }
}
