use crate::protocol::FRAME_SIZE;

use serde::{Deserialize, Serialize};

/// How receive results are cut into frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramingPolicy {
    /// Each receive result is one frame candidate. Anything that is not
    /// exactly one frame long is discarded, including coalesced frames.
    #[default]
    PerRead,
    /// Bytes are buffered across receives and every complete frame is
    /// yielded in arrival order.
    Accumulate,
}

/// Fixed-size frame reassembly for [`FramingPolicy::Accumulate`].
#[derive(Debug, Default)]
pub(crate) struct FrameAccumulator {
    buffer: Vec<u8>,
}

impl FrameAccumulator {
    pub(crate) fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(FRAME_SIZE * 4),
        }
    }

    /// Append received bytes and drain every complete frame.
    pub(crate) fn push(&mut self, data: &[u8]) -> Vec<[u8; FRAME_SIZE]> {
        self.buffer.extend_from_slice(data);

        let complete = self.buffer.len() / FRAME_SIZE;
        let mut frames = Vec::with_capacity(complete);
        for chunk in self.buffer.chunks_exact(FRAME_SIZE) {
            let mut frame = [0u8; FRAME_SIZE];
            frame.copy_from_slice(chunk);
            frames.push(frame);
        }
        self.buffer.drain(..complete * FRAME_SIZE);

        frames
    }

    /// Bytes of an incomplete frame still waiting for the rest.
    pub(crate) fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any partial frame; called when the connection is lost.
    pub(crate) fn clear(&mut self) {
        self.buffer.clear();
    }
}
