//! Plant model and frame producer for 6-axis arm telemetry.
//!
//! The simulator keeps continuous kinematic state per axis, advances it one
//! time-step per frame, and hands the resulting physical values to the wire
//! codec. Randomized behavior (target selection, current noise, alert and
//! noise injection) runs off one explicitly owned, seedable generator so a
//! fixed seed reproduces the byte stream exactly.

pub mod motion;
pub mod profile;
pub mod simulator;

pub use motion::AxisState;
pub use profile::{AxisProfile, ARM_AXES};
pub use simulator::{Simulator, SimulatorConfig};
