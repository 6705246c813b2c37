//! Binds the trigger receive loop to the lifetime of its owner.
//!
//! Construction spawns the background thread; [`ButtonSocketListener::shutdown`]
//! (or dropping the listener) clears the running flag, closes the socket to
//! unblock any pending receive, and joins the thread before returning.

use crate::{
    ConnectionManager, ConnectionState, CoreResult, FramingPolicy, ListenerError,
    dispatch::{
        DispatcherStats, MessageDispatcher, RecordingControl, StatsSnapshot, SystemClock,
        TimeSource,
    },
    net::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT},
};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use error_location::ErrorLocation;
use tracing::{error, info, instrument, warn};

/// Delay between failed connection attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

const THREAD_NAME: &str = "button-socket-listener";

/// Tunables for a listener. The defaults describe the fixed local endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ListenerSettings {
    /// Trigger server address as `host:port`.
    pub endpoint: String,
    /// Wait between failed connection attempts.
    pub backoff: Duration,
    /// Bound on a single connection handshake. Zero means the OS default.
    pub connect_timeout: Duration,
    /// How receive results are split into frames.
    pub framing: FramingPolicy,
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            backoff: DEFAULT_BACKOFF,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            framing: FramingPolicy::default(),
        }
    }
}

/// Lifecycle of a [`ButtonSocketListener`]. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Not yet started. Construction starts the thread, so a constructed
    /// listener is never observed here.
    Idle,
    /// Background thread is connecting or receiving.
    Running,
    /// Shutdown requested, waiting for the thread to exit.
    ShuttingDown,
    /// Background thread has exited.
    Stopped,
}

/// Background client that turns remote triggers into host actions.
pub struct ButtonSocketListener {
    running: Arc<AtomicBool>,
    connection: Arc<ConnectionManager>,
    stats: Arc<DispatcherStats>,
    worker: Option<JoinHandle<()>>,
    state: LifecycleState,
}

impl ButtonSocketListener {
    /// Start listening on the fixed local endpoint with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::ThreadSpawn`] if the thread cannot start.
    #[track_caller]
    pub fn new(actions: Arc<dyn RecordingControl>) -> CoreResult<Self> {
        Self::with_settings(actions, Arc::new(SystemClock), ListenerSettings::default())
    }

    /// Start listening with explicit settings and time source.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::ThreadSpawn`] if the thread cannot start.
    #[track_caller]
    #[instrument(skip(actions, clock))]
    pub fn with_settings(
        actions: Arc<dyn RecordingControl>,
        clock: Arc<dyn TimeSource>,
        settings: ListenerSettings,
    ) -> CoreResult<Self> {
        let connection =
            ConnectionManager::new(settings.endpoint.clone(), settings.connect_timeout);
        Self::spawn(actions, clock, connection, &settings)
    }

    /// Start the background thread over an already configured connection.
    #[track_caller]
    pub(crate) fn spawn(
        actions: Arc<dyn RecordingControl>,
        clock: Arc<dyn TimeSource>,
        connection: ConnectionManager,
        settings: &ListenerSettings,
    ) -> CoreResult<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let connection = Arc::new(connection);
        let stats = Arc::new(DispatcherStats::default());

        let dispatcher = MessageDispatcher::new(
            Arc::clone(&connection),
            actions,
            clock,
            Arc::clone(&running),
            Arc::clone(&stats),
            settings.backoff,
            settings.framing,
        );

        let worker = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || dispatcher.run())
            .map_err(|source| ListenerError::ThreadSpawn {
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(endpoint = %settings.endpoint, "Button socket listener started");

        Ok(Self {
            running,
            connection,
            stats,
            worker: Some(worker),
            state: LifecycleState::Running,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Current state of the underlying connection.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Diagnostic counters from the receive loop.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Stop the background thread and wait for it to exit. Idempotent.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        self.state = LifecycleState::ShuttingDown;
        self.running.store(false, Ordering::Release);
        self.connection.close();

        // A host action that drops the listener runs on the worker itself.
        if worker.thread().id() == thread::current().id() {
            warn!("Shutdown requested from the listener thread, not joining");
        } else if worker.join().is_err() {
            error!("Button socket listener thread panicked");
        }

        self.state = LifecycleState::Stopped;
        info!("Button socket listener stopped");
    }
}

impl Drop for ButtonSocketListener {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Whether this target has native sockets to listen with.
pub fn sockets_supported() -> bool {
    cfg!(not(target_family = "wasm"))
}

/// A listener where the platform supports one, a no-op otherwise.
pub enum RemoteTrigger {
    /// Actively listening for triggers.
    Listening(ButtonSocketListener),
    /// No sockets on this platform; triggers are never delivered.
    Unsupported,
}

impl RemoteTrigger {
    /// Start a listener if [`sockets_supported`].
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::ThreadSpawn`] if the thread cannot start.
    #[track_caller]
    pub fn start(
        actions: Arc<dyn RecordingControl>,
        clock: Arc<dyn TimeSource>,
        settings: ListenerSettings,
    ) -> CoreResult<Self> {
        if !sockets_supported() {
            info!("Sockets unavailable on this platform, remote triggers disabled");
            return Ok(RemoteTrigger::Unsupported);
        }

        ButtonSocketListener::with_settings(actions, clock, settings).map(RemoteTrigger::Listening)
    }

    /// Lifecycle state; `Unsupported` reports `Stopped`.
    pub fn state(&self) -> LifecycleState {
        match self {
            RemoteTrigger::Listening(listener) => listener.state(),
            RemoteTrigger::Unsupported => LifecycleState::Stopped,
        }
    }

    /// Stop the listener if there is one.
    pub fn shutdown(&mut self) {
        if let RemoteTrigger::Listening(listener) = self {
            listener.shutdown();
        }
    }
}
