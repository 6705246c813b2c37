//! Record-trigger Core Library
//!
//! Background TCP client that receives remote start/stop triggers and
//! forwards them to a host's recording controls.
//!
//! # Example
//!
//! ```no_run
//! use record_trigger_core::{ButtonSocketListener, CoreResult, RecordingControl};
//!
//! use std::{sync::Arc, thread::sleep, time::Duration};
//!
//! struct Button;
//!
//! impl RecordingControl for Button {
//!     fn start_recording(&self) {
//!         println!("recording");
//!     }
//!
//!     fn stop_recording(&self) {
//!         println!("stopped");
//!     }
//! }
//!
//! fn main() -> CoreResult<()> {
//!     let listener = ButtonSocketListener::new(Arc::new(Button))?;
//!
//!     sleep(Duration::from_secs(30));
//!     drop(listener);
//!     Ok(())
//! }
//! ```

mod dispatch;
mod error;
mod listener;
mod net;
mod protocol;

pub use {
    dispatch::{RecordingControl, StatsSnapshot, SystemClock, TimeSource},
    error::ListenerError,
    error::Result as CoreResult,
    listener::{
        ButtonSocketListener, DEFAULT_BACKOFF, LifecycleState, ListenerSettings, RemoteTrigger,
        sockets_supported,
    },
    net::{ConnectionManager, ConnectionState, DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT},
    protocol::{Command, FRAME_SIZE, FramingPolicy, Message, RECV_BUFFER_SIZE},
};

#[cfg(test)]
mod tests;
