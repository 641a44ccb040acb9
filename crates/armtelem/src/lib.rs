//! 6-axis robotic arm telemetry over an unreliable byte stream.
//!
//! armtelem pairs a producer and a consumer around one 39-byte wire
//! format: the simulator advances a continuous plant model and encodes
//! frames (optionally interleaved with desynchronization noise), and the
//! analyzer recovers frame boundaries from arbitrary byte input, decodes
//! axis data, and reports current-draw alerts plus stream statistics.
//!
//! # Crate Structure
//!
//! - [`proto`] — wire codec, stream scanner, statistics/alert engine
//! - [`sim`] — per-axis kinematic model and frame producer

/// Re-export wire protocol types.
pub mod proto {
    pub use armtelem_proto::*;
}

/// Re-export simulator types.
pub mod sim {
    pub use armtelem_sim::*;
}
