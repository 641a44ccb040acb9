use crate::codec::{decode_frame, Frame, FRAME_SIZE, SYNC};
use crate::error::Result;

/// Find the next sync marker at or after `start`.
///
/// Returns the lowest index `i >= start` with `buf[i] == 0xAA` and
/// `buf[i + 1] == 0x55`, scanning only while both bytes are in bounds.
/// A lone trailing 0xAA therefore never matches.
pub fn find_sync(buf: &[u8], start: usize) -> Option<usize> {
    if buf.len() < 2 {
        return None;
    }
    (start..buf.len() - 1).find(|&i| buf[i] == SYNC[0] && buf[i + 1] == SYNC[1])
}

/// Decode the frame starting at `sync_offset`.
///
/// Errors with `InsufficientData` when fewer than 39 bytes remain: the
/// truncated trailing-frame case, which ends scanning rather than raising
/// an alert.
pub fn extract_frame(buf: &[u8], sync_offset: usize) -> Result<Frame> {
    decode_frame(buf.get(sync_offset..).unwrap_or_default())
}

/// One frame located in the stream, with its resynchronization cost.
#[derive(Debug, Clone, Copy)]
pub struct ScannedFrame {
    /// Byte offset of the frame's sync marker in the buffer.
    pub offset: usize,
    /// Bytes skipped as noise between the previous cursor and this frame.
    pub noise_skipped: usize,
    /// The decoded frame.
    pub frame: Frame,
}

/// Single linear pass over a finite byte buffer, yielding every frame that
/// aligns to a sync marker.
///
/// The cursor strictly increases on every yielded frame, so iteration
/// always terminates, and every byte of the buffer ends up accounted for:
/// `buf.len() == noise_bytes() + FRAME_SIZE * frames yielded` once the
/// iterator is exhausted.
#[derive(Debug)]
pub struct FrameScanner<'a> {
    buf: &'a [u8],
    cursor: usize,
    noise_bytes: usize,
    trailing_noise: usize,
}

impl<'a> FrameScanner<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            cursor: 0,
            noise_bytes: 0,
            trailing_noise: 0,
        }
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total bytes classified as noise so far, including the unsynced or
    /// truncated tail once the iterator is exhausted.
    pub fn noise_bytes(&self) -> usize {
        self.noise_bytes
    }

    /// Noise consumed after the last yielded frame (unsynced filler or a
    /// truncated trailing frame). Zero until the scan ends.
    pub fn trailing_noise(&self) -> usize {
        self.trailing_noise
    }

    fn finish(&mut self) -> Option<ScannedFrame> {
        let tail = self.buf.len() - self.cursor;
        self.noise_bytes += tail;
        self.trailing_noise += tail;
        self.cursor = self.buf.len();
        None
    }
}

impl Iterator for FrameScanner<'_> {
    type Item = ScannedFrame;

    fn next(&mut self) -> Option<ScannedFrame> {
        let offset = match find_sync(self.buf, self.cursor) {
            Some(offset) => offset,
            None => return self.finish(),
        };

        let Ok(frame) = extract_frame(self.buf, offset) else {
            // Truncated trailing frame: stop, the remainder is noise.
            return self.finish();
        };

        let noise_skipped = offset - self.cursor;
        if noise_skipped > 0 {
            tracing::trace!(offset, noise_skipped, "resynchronized after noise");
        }
        self.noise_bytes += noise_skipped;
        self.cursor = offset + FRAME_SIZE;

        Some(ScannedFrame {
            offset,
            noise_skipped,
            frame,
        })
    }
}
