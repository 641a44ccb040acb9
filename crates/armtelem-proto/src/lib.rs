//! Sync-marker framed telemetry for a 6-axis robotic arm.
//!
//! Every frame is a fixed 39 bytes on the wire:
//! - A 2-byte sync marker (0xAA 0x55) for stream resynchronization
//! - A 1-byte sequence counter (wraps 255 -> 0)
//! - Six axis blocks of three little-endian 16-bit fields each
//!   (position, velocity, current)
//!
//! There is no length field and no checksum; framing is purely
//! sync-marker-based, and the scanner treats anything that does not align
//! to a marker as noise rather than an error.

pub mod codec;
pub mod error;
pub mod scanner;
pub mod stats;

pub use codec::{
    decode_frame, encode_frame, AxisSample, Frame, AXIS_COUNT, AXIS_SIZE, FRAME_SIZE, HEADER_SIZE,
    SYNC,
};
pub use error::{FrameError, Result};
pub use scanner::{extract_frame, find_sync, FrameScanner, ScannedFrame};
pub use stats::{axis_in_alert, is_frame_valid, Analyzer, Statistics};
