use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Sync marker opening every frame: 0xAA then 0x55.
pub const SYNC: [u8; 2] = [0xAA, 0x55];

/// Number of axes carried in one frame.
pub const AXIS_COUNT: usize = 6;

/// Frame header: sync (2) + sequence (1) = 3 bytes.
pub const HEADER_SIZE: usize = 3;

/// One axis block: position + velocity + current, 2 bytes each.
pub const AXIS_SIZE: usize = 6;

/// Total wire size of one frame: 39 bytes, fixed.
pub const FRAME_SIZE: usize = HEADER_SIZE + AXIS_COUNT * AXIS_SIZE;

/// Telemetry for one axis at one instant, in raw wire units.
///
/// The codec accepts any 16-bit value in any field; physical plausibility
/// is data, not a decode concern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisSample {
    /// Position in hundredths of a degree.
    pub position: i16,
    /// Velocity in tenths of a degree per second.
    pub velocity: i16,
    /// Motor current in milliamperes.
    pub current: u16,
}

impl AxisSample {
    /// Position in degrees.
    pub fn position_degrees(&self) -> f32 {
        f32::from(self.position) / 100.0
    }

    /// Velocity in degrees per second.
    pub fn velocity_degrees_per_second(&self) -> f32 {
        f32::from(self.velocity) / 10.0
    }

    /// Current in amperes.
    pub fn current_amperes(&self) -> f32 {
        f32::from(self.current) / 1000.0
    }
}

/// One telemetry sample for all six axes at one sequence point.
///
/// Constructed transiently per encode tick or per scan iteration and never
/// mutated afterwards. The sync bytes are stored verbatim on decode so that
/// validity stays an explicit, separately testable check
/// ([`crate::stats::is_frame_valid`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Sync marker bytes, as seen on the wire.
    pub sync: [u8; 2],
    /// Producer-side counter, incremented modulo 256 per frame.
    pub sequence: u8,
    /// Axis 0..5 maps to physical axis 1..6.
    pub axes: [AxisSample; AXIS_COUNT],
}

impl Frame {
    /// Create a frame carrying the protocol sync marker.
    pub fn new(sequence: u8, axes: [AxisSample; AXIS_COUNT]) -> Self {
        Self {
            sync: SYNC,
            sequence,
            axes,
        }
    }

    /// Encode into a fixed 39-byte array.
    pub fn to_bytes(&self) -> [u8; FRAME_SIZE] {
        let mut buf = BytesMut::with_capacity(FRAME_SIZE);
        encode_frame(self, &mut buf);
        let mut out = [0u8; FRAME_SIZE];
        out.copy_from_slice(&buf);
        out
    }
}

/// Encode a frame into the wire format.
///
/// Wire layout (all multi-byte fields little-endian):
/// ```text
/// ┌──────────────┬──────────┬────────────────────────────────────┐
/// │ Sync (2B)    │ Seq (1B) │ 6 x axis block (6B each)           │
/// │ 0xAA 0x55    │ mod 256  │ position, velocity, current (i16,  │
/// │              │          │ i16, u16, low byte first)          │
/// └──────────────┴──────────┴────────────────────────────────────┘
/// ```
///
/// Fields are written byte by byte; the layout never depends on host
/// structure padding or endianness. Infallible: any frame value is
/// encodable.
pub fn encode_frame(frame: &Frame, dst: &mut BytesMut) {
    dst.reserve(FRAME_SIZE);
    dst.put_slice(&frame.sync);
    dst.put_u8(frame.sequence);
    for axis in &frame.axes {
        dst.put_i16_le(axis.position);
        dst.put_i16_le(axis.velocity);
        dst.put_u16_le(axis.current);
    }
}

/// Decode one frame from the first 39 bytes of `src`.
///
/// Errors with [`FrameError::InsufficientData`] when fewer than 39 bytes
/// are available. Sync bytes and sequence are read verbatim; no field is
/// range-checked.
pub fn decode_frame(src: &[u8]) -> Result<Frame> {
    if src.len() < FRAME_SIZE {
        return Err(FrameError::InsufficientData {
            available: src.len(),
            needed: FRAME_SIZE,
        });
    }

    let sync = [src[0], src[1]];
    let sequence = src[2];

    let mut axes = [AxisSample::default(); AXIS_COUNT];
    for (k, axis) in axes.iter_mut().enumerate() {
        let base = HEADER_SIZE + k * AXIS_SIZE;
        axis.position = i16::from_le_bytes([src[base], src[base + 1]]);
        axis.velocity = i16::from_le_bytes([src[base + 2], src[base + 3]]);
        axis.current = u16::from_le_bytes([src[base + 4], src[base + 5]]);
    }

    Ok(Frame {
        sync,
        sequence,
        axes,
    })
}
