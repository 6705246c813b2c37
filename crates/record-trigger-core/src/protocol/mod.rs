mod command;
mod framing;
mod message;

pub(crate) use framing::FrameAccumulator;

pub use {command::Command, framing::FramingPolicy, message::Message};

/// Exact size of one trigger frame on the wire.
///
/// The sender writes a C `{ int32; double }` record, so the `f64` sits on
/// an 8-byte boundary with four bytes of padding after the command code.
pub const FRAME_SIZE: usize = 16;

/// Capacity of the buffer handed to each blocking receive.
pub const RECV_BUFFER_SIZE: usize = 512;

pub(crate) const COMMAND_OFFSET: usize = 0;
pub(crate) const SEND_TIME_OFFSET: usize = 8;
