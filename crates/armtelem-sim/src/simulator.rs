use std::ops::RangeInclusive;
use std::time::Duration;

use armtelem_proto::{AxisSample, Frame, AXIS_COUNT, SYNC};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::motion::AxisState;
use crate::profile::{AxisProfile, ARM_AXES};

/// Injected over-current band, in milliamperes.
const ALERT_BAND_MA: RangeInclusive<f32> = 5500.0..=8000.0;
/// Noise bursts carry this many filler bytes.
const NOISE_BURST_LEN: RangeInclusive<usize> = 1..=10;

/// Producer-side configuration.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Frame rate in Hz; one simulation tick per frame.
    pub rate_hz: f32,
    /// Chance of emitting a noise burst before each frame.
    pub noise_probability: f64,
    /// Chance that one axis per frame carries an injected over-current.
    pub alert_probability: f64,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            rate_hz: 100.0,
            noise_probability: 0.05,
            alert_probability: 0.02,
            seed: None,
        }
    }
}

/// Continuous plant model for all six axes plus the frame sequence counter.
///
/// The simulator communicates with the analyzer only through the encoded
/// byte stream; nothing here is shared with the decode path.
pub struct Simulator {
    axes: [AxisState; AXIS_COUNT],
    profiles: [AxisProfile; AXIS_COUNT],
    sequence: u8,
    dt: f32,
    noise_probability: f64,
    alert_probability: f64,
    rng: StdRng,
}

impl Simulator {
    /// Simulator for the default arm profile. Probabilities are clamped to
    /// [0, 1]; rate validation is the caller's concern.
    pub fn new(config: &SimulatorConfig) -> Self {
        Self::with_profiles(config, ARM_AXES)
    }

    /// Simulator for custom axis limits.
    pub fn with_profiles(config: &SimulatorConfig, profiles: [AxisProfile; AXIS_COUNT]) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut axes = [AxisState::at_rest(&profiles[0]); AXIS_COUNT];
        for (axis, profile) in axes.iter_mut().zip(&profiles) {
            *axis = AxisState::at_rest(profile);
        }
        Self {
            axes,
            profiles,
            sequence: 0,
            dt: 1.0 / config.rate_hz,
            noise_probability: config.noise_probability.clamp(0.0, 1.0),
            alert_probability: config.alert_probability.clamp(0.0, 1.0),
            rng,
        }
    }

    /// Seconds of simulated time per frame.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f32(self.dt)
    }

    /// Advance every axis one tick and emit the resulting frame.
    ///
    /// The sequence counter wraps modulo 256. With the configured
    /// probability, one uniformly chosen axis has its encoded current
    /// overridden by a draw from the alert band, independent of the
    /// continuous model.
    pub fn next_frame(&mut self) -> Frame {
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);

        let injected_alert = if self.rng.gen_bool(self.alert_probability) {
            let axis = self.rng.gen_range(0..AXIS_COUNT);
            let current_ma = self.rng.gen_range(ALERT_BAND_MA) as u16;
            tracing::debug!(axis, current_ma, "injecting over-current alert");
            Some((axis, current_ma))
        } else {
            None
        };

        let mut samples = [AxisSample::default(); AXIS_COUNT];
        for (i, sample) in samples.iter_mut().enumerate() {
            self.axes[i].step(&self.profiles[i], self.dt, &mut self.rng);
            let state = &self.axes[i];
            *sample = AxisSample {
                position: (state.position_deg * 100.0) as i16,
                velocity: (state.velocity_deg_s * 10.0) as i16,
                current: (state.base_current_a * 1000.0) as u16,
            };
            if let Some((alert_axis, current_ma)) = injected_alert {
                if alert_axis == i {
                    sample.current = current_ma;
                }
            }
        }

        Frame::new(sequence, samples)
    }

    /// With the configured probability, emit a burst of desynchronization
    /// filler to send before the next frame. Any byte that would collide
    /// with a sync constant is forced to zero so noise can never open a
    /// spurious frame.
    pub fn noise_burst(&mut self) -> Option<Vec<u8>> {
        if !self.rng.gen_bool(self.noise_probability) {
            return None;
        }
        let len = self.rng.gen_range(NOISE_BURST_LEN);
        let mut bytes = vec![0u8; len];
        for b in &mut bytes {
            let v: u8 = self.rng.gen();
            *b = if v == SYNC[0] || v == SYNC[1] { 0x00 } else { v };
        }
        tracing::trace!(len, "emitting noise burst");
        Some(bytes)
    }
}

#[cfg(test)]
mod tests {
    use armtelem_proto::{decode_frame, is_frame_valid};

    use super::*;

    fn seeded(seed: u64, noise: f64, alert: f64) -> Simulator {
        Simulator::new(&SimulatorConfig {
            rate_hz: 100.0,
            noise_probability: noise,
            alert_probability: alert,
            seed: Some(seed),
        })
    }

    #[test]
    fn identical_seeds_reproduce_the_byte_stream() {
        let mut a = seeded(42, 0.3, 0.1);
        let mut b = seeded(42, 0.3, 0.1);

        for _ in 0..200 {
            assert_eq!(a.noise_burst(), b.noise_burst());
            assert_eq!(a.next_frame(), b.next_frame());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = seeded(1, 0.0, 0.0);
        let mut b = seeded(2, 0.0, 0.0);

        let differs = (0..100).any(|_| a.next_frame() != b.next_frame());
        assert!(differs);
    }

    #[test]
    fn sequence_wraps_modulo_256() {
        let mut sim = seeded(7, 0.0, 0.0);
        for expected in 0..=255u8 {
            assert_eq!(sim.next_frame().sequence, expected);
        }
        assert_eq!(sim.next_frame().sequence, 0);
    }

    #[test]
    fn frames_decode_and_stay_inside_profiles() {
        let mut sim = seeded(9, 0.0, 0.0);
        for _ in 0..2000 {
            let frame = sim.next_frame();
            assert!(is_frame_valid(&frame));
            let decoded = decode_frame(&frame.to_bytes()).unwrap();
            assert_eq!(decoded, frame);

            for (axis, profile) in decoded.axes.iter().zip(&ARM_AXES) {
                let pos = axis.position_degrees();
                // Wire rounding can land half a hundredth outside.
                assert!(pos >= profile.position_min_deg - 0.01);
                assert!(pos <= profile.position_max_deg + 0.01);
                assert!(
                    axis.velocity_degrees_per_second().abs()
                        <= profile.max_velocity_deg_s + 0.1
                );
            }
        }
    }

    #[test]
    fn alert_injection_lands_in_the_alert_band() {
        let mut sim = seeded(11, 0.0, 1.0);
        for _ in 0..50 {
            let frame = sim.next_frame();
            let in_band = frame
                .axes
                .iter()
                .filter(|axis| (5500..=8000).contains(&axis.current))
                .count();
            assert!(in_band >= 1, "expected an injected over-current");
        }
    }

    #[test]
    fn zero_alert_probability_keeps_currents_nominal() {
        let mut sim = seeded(13, 0.0, 0.0);
        for _ in 0..500 {
            let frame = sim.next_frame();
            for (axis, profile) in frame.axes.iter().zip(&ARM_AXES) {
                // 5% noise on top of nominal full-load current at most.
                let ceiling = profile.nominal_current_a * 1.05 * 1000.0;
                assert!(f32::from(axis.current) <= ceiling + 1.0);
            }
        }
    }

    #[test]
    fn noise_bursts_never_contain_sync_bytes() {
        let mut sim = seeded(17, 1.0, 0.0);
        let mut seen = 0;
        for _ in 0..200 {
            let burst = sim.noise_burst().expect("probability is 1.0");
            assert!((1..=10).contains(&burst.len()));
            assert!(burst.iter().all(|&b| b != SYNC[0] && b != SYNC[1]));
            seen += burst.len();
        }
        assert!(seen > 0);
    }

    #[test]
    fn zero_noise_probability_is_silent() {
        let mut sim = seeded(19, 0.0, 0.0);
        for _ in 0..100 {
            assert!(sim.noise_burst().is_none());
        }
    }
}
