//! Incremental extraction of delimited JSON frames from a byte stream.
//!
//! The firmware terminates every frame with the literal `}\r\n`. A frame
//! is the substring from the last `{` at-or-before that terminator
//! through the terminator itself; whatever precedes it (boot noise, log
//! text, a half-received frame) is dropped. If the buffer grows past
//! [`MAX_FRAME_LEN`] without a terminator, the whole buffer is discarded:
//! losing data is accepted in exchange for forward progress.
//!
//! The search does not check brace balance, so a `}\r\n` sequence inside
//! a JSON string value desynchronizes framing. The firmware never emits
//! one inside telemetry strings, and the lossy recovery path eventually
//! clears a desynced buffer.

pub const FRAME_START: char = '{';
pub const FRAME_END: &str = "}\r\n";
pub const MAX_FRAME_LEN: usize = 512;

/// Accumulates stream chunks and yields complete frames. Owned by exactly
/// one transport; never shared across logical channels.
#[derive(Debug, Default)]
pub struct FrameBuf {
    buf: String,
}

impl FrameBuf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk. Applies the lossy overflow recovery.
    pub fn push(&mut self, chunk: &str) {
        self.buf.push_str(chunk);
        if self.buf.len() > MAX_FRAME_LEN {
            tracing::warn!("Buffer overflow, clearing buffer.");
            self.buf.clear();
        }
    }

    /// Extract the next complete frame, terminator included, consuming it
    /// and everything before it from the buffer.
    pub fn next_frame(&mut self) -> Option<String> {
        let end_idx = self.buf.find(FRAME_END)?;
        let start_idx = self.buf[..=end_idx].rfind(FRAME_START)?;
        let frame = self.buf[start_idx..end_idx + FRAME_END.len()].to_string();
        self.buf.drain(..end_idx + FRAME_END.len());
        Some(frame)
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
