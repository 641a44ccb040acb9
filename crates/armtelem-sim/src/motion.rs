use rand::Rng;

use crate::profile::AxisProfile;

/// Distance to target below which the axis may pick a new one.
const TARGET_REACHED_DEG: f32 = 1.0;
/// Per-tick chance of re-targeting once the target is reached.
const RETARGET_CHANCE: f64 = 0.02;
/// New targets stay inside this fraction of the axis range.
const TARGET_SPAN_RATIO: f32 = 0.8;
/// Proportional gain from position error to desired velocity.
const POSITION_GAIN: f32 = 2.0;
/// Idle current as a fraction of nominal.
const CURRENT_IDLE_RATIO: f32 = 0.1;
/// Speed-dependent current as a fraction of nominal at full speed.
const CURRENT_SPEED_RATIO: f32 = 0.9;
/// Zero-mean measurement noise amplitude relative to base current.
const CURRENT_NOISE_RATIO: f32 = 0.05;

/// Continuous kinematic state of one axis, in physical units. Mutated once
/// per simulation tick; the decode path never sees this type.
#[derive(Debug, Clone, Copy)]
pub struct AxisState {
    pub position_deg: f32,
    pub velocity_deg_s: f32,
    pub target_deg: f32,
    pub base_current_a: f32,
}

impl AxisState {
    /// Axis parked at zero, drawing idle current.
    pub fn at_rest(profile: &AxisProfile) -> Self {
        Self {
            position_deg: 0.0,
            velocity_deg_s: 0.0,
            target_deg: 0.0,
            base_current_a: profile.nominal_current_a * CURRENT_IDLE_RATIO,
        }
    }

    /// Advance the axis by one time-step of `dt` seconds.
    ///
    /// Velocity tracks the position error through a proportional
    /// controller, rate-limited to an acceleration of twice the rated
    /// speed per second. Position integrates velocity and stops
    /// inelastically at the joint limits.
    pub fn step<R: Rng>(&mut self, profile: &AxisProfile, dt: f32, rng: &mut R) {
        let mut error = self.target_deg - self.position_deg;

        if error.abs() < TARGET_REACHED_DEG && rng.gen_bool(RETARGET_CHANCE) {
            self.target_deg = rng.gen_range(
                profile.position_min_deg * TARGET_SPAN_RATIO
                    ..=profile.position_max_deg * TARGET_SPAN_RATIO,
            );
            error = self.target_deg - self.position_deg;
        }

        let v_max = profile.max_velocity_deg_s;
        let desired = (error * POSITION_GAIN).clamp(-v_max, v_max);

        let dv_max = 2.0 * v_max * dt;
        let dv = (desired - self.velocity_deg_s).clamp(-dv_max, dv_max);
        self.velocity_deg_s += dv;

        self.position_deg += self.velocity_deg_s * dt;
        if self.position_deg < profile.position_min_deg {
            self.position_deg = profile.position_min_deg;
            self.velocity_deg_s = 0.0;
        }
        if self.position_deg > profile.position_max_deg {
            self.position_deg = profile.position_max_deg;
            self.velocity_deg_s = 0.0;
        }

        let speed_ratio = self.velocity_deg_s.abs() / v_max;
        let base =
            profile.nominal_current_a * (CURRENT_IDLE_RATIO + CURRENT_SPEED_RATIO * speed_ratio);
        let noise = rng.gen_range(-CURRENT_NOISE_RATIO..=CURRENT_NOISE_RATIO) * base;
        self.base_current_a = (base + noise).max(0.0);
    }
}
