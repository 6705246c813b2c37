//! Single outbound TCP connection to the trigger server.
//!
//! The background thread owns connect and receive. [`ConnectionManager::close`]
//! is the one operation allowed from another thread: it shuts the socket
//! down so a blocked receive returns promptly.

use crate::{
    CoreResult, ListenerError,
    net::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT},
};

use std::{
    io::{self, ErrorKind, Read},
    net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs},
    panic::Location,
    sync::{Mutex, MutexGuard, TryLockError},
    time::Duration,
};

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Connection state, owned by [`ConnectionManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No socket is open.
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// A socket is open and readable.
    Connected,
}

struct Control {
    state: ConnectionState,
    /// Handle used for shutdown; never read from.
    stream: Option<TcpStream>,
}

/// Owns the socket to the trigger server and delivers raw bytes.
///
/// Two handles to the same socket are kept: the reader, locked for the
/// whole of a blocking receive, and the control handle, which `close` can
/// always reach without waiting on that receive.
pub struct ConnectionManager {
    endpoint: String,
    connect_timeout: Duration,
    control: Mutex<Control>,
    reader: Mutex<Option<TcpStream>>,
    /// Held before every connect so tests can observe an in-flight handshake.
    #[cfg(test)]
    handshake_delay: Duration,
}

impl ConnectionManager {
    /// Create a manager for `endpoint` (`host:port`). Nothing is opened yet.
    pub fn new(endpoint: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout,
            control: Mutex::new(Control {
                state: ConnectionState::Disconnected,
                stream: None,
            }),
            reader: Mutex::new(None),
            #[cfg(test)]
            handshake_delay: Duration::ZERO,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_handshake_delay(mut self, delay: Duration) -> Self {
        self.handshake_delay = delay;
        self
    }

    /// Manager for the fixed local trigger endpoint.
    pub fn local() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Endpoint this manager connects to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.control().state
    }

    /// Resolve the endpoint and open a stream connection.
    ///
    /// Tries every resolved address once. Retrying is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::ResolveFailed`] if the endpoint does not
    /// resolve and [`ListenerError::ConnectFailed`] if no address accepts.
    #[track_caller]
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub fn connect(&self) -> CoreResult<()> {
        {
            let mut control = self.control();
            if control.state == ConnectionState::Connected {
                debug!("Already connected");
                return Ok(());
            }
            control.state = ConnectionState::Connecting;
        }
        debug!("Connecting");

        let stream = match self.open_stream() {
            Ok(stream) => stream,
            Err(e) => {
                self.control().state = ConnectionState::Disconnected;
                return Err(e);
            }
        };

        let reader = match stream.try_clone() {
            Ok(reader) => reader,
            Err(source) => {
                self.control().state = ConnectionState::Disconnected;
                return Err(ListenerError::ConnectFailed {
                    endpoint: self.endpoint.clone(),
                    source,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        *self.reader() = Some(reader);
        {
            let mut control = self.control();
            control.stream = Some(stream);
            control.state = ConnectionState::Connected;
        }

        info!("Connected to trigger server");

        Ok(())
    }

    /// Blocking read of whatever bytes are available, up to `buf.len()`.
    ///
    /// `Ok(0)` means the peer closed the connection in an orderly way.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::NotConnected`] without an open socket and
    /// [`ListenerError::ReceiveFailed`] on socket errors, including the
    /// socket being closed underneath the read.
    #[track_caller]
    pub fn receive(&self, buf: &mut [u8]) -> CoreResult<usize> {
        let mut reader = self.reader();
        let Some(stream) = reader.as_mut() else {
            return Err(ListenerError::NotConnected {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        loop {
            match stream.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(ListenerError::ReceiveFailed {
                        source,
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            }
        }
    }

    /// Close the socket if open. Idempotent and safe to call from any
    /// thread, including while another thread is blocked in [`receive`].
    ///
    /// Failures are logged and otherwise ignored.
    ///
    /// [`receive`]: ConnectionManager::receive
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub fn close(&self) {
        {
            let mut control = self.control();
            if let Some(stream) = control.stream.take() {
                match stream.shutdown(Shutdown::Both) {
                    Ok(()) => {}
                    // Peer already gone.
                    Err(e) if e.kind() == ErrorKind::NotConnected => {}
                    Err(e) => warn!(error = %e, "Socket shutdown failed"),
                }
                info!("Connection closed");
            }
            control.state = ConnectionState::Disconnected;
        }

        // A receive in progress holds the reader; it returns once the
        // shutdown above lands and the receive loop closes again.
        match self.reader.try_lock() {
            Ok(mut reader) => {
                reader.take();
            }
            Err(TryLockError::Poisoned(poisoned)) => {
                poisoned.into_inner().take();
            }
            Err(TryLockError::WouldBlock) => {}
        }
    }

    #[track_caller]
    fn open_stream(&self) -> CoreResult<TcpStream> {
        #[cfg(test)]
        std::thread::sleep(self.handshake_delay);

        let addresses: Vec<SocketAddr> = self
            .endpoint
            .to_socket_addrs()
            .map_err(|e| ListenerError::ResolveFailed {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?
            .collect();

        if addresses.is_empty() {
            return Err(ListenerError::ResolveFailed {
                endpoint: self.endpoint.clone(),
                reason: "no addresses".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut last_error = None;
        for address in addresses {
            let attempt = if self.connect_timeout.is_zero() {
                TcpStream::connect(address)
            } else {
                TcpStream::connect_timeout(&address, self.connect_timeout)
            };

            match attempt {
                Ok(stream) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!(error = %e, "Failed to disable Nagle on trigger socket");
                    }
                    return Ok(stream);
                }
                Err(e) => {
                    debug!(%address, error = %e, "Connection attempt failed");
                    last_error = Some(e);
                }
            }
        }

        Err(ListenerError::ConnectFailed {
            endpoint: self.endpoint.clone(),
            source: last_error.unwrap_or_else(|| io::Error::from(ErrorKind::NotConnected)),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(|e| {
            error!("Connection control lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    fn reader(&self) -> MutexGuard<'_, Option<TcpStream>> {
        self.reader.lock().unwrap_or_else(|e| {
            error!("Connection reader lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("endpoint", &self.endpoint)
            .field("connect_timeout", &self.connect_timeout)
            .field("state", &self.state())
            .finish()
    }
}
