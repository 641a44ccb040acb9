use armtelem_proto::AXIS_COUNT;

/// Joint limits and drive characteristics for one arm axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisProfile {
    pub position_min_deg: f32,
    pub position_max_deg: f32,
    pub max_velocity_deg_s: f32,
    pub nominal_current_a: f32,
}

/// Kinematic limits of a typical industrial 6-axis arm: large slow base
/// joints up front, fast low-torque wrist joints at the end.
pub const ARM_AXES: [AxisProfile; AXIS_COUNT] = [
    AxisProfile {
        position_min_deg: -170.0,
        position_max_deg: 170.0,
        max_velocity_deg_s: 250.0,
        nominal_current_a: 8.0,
    },
    AxisProfile {
        position_min_deg: -90.0,
        position_max_deg: 110.0,
        max_velocity_deg_s: 250.0,
        nominal_current_a: 6.0,
    },
    AxisProfile {
        position_min_deg: -80.0,
        position_max_deg: 280.0,
        max_velocity_deg_s: 250.0,
        nominal_current_a: 4.0,
    },
    AxisProfile {
        position_min_deg: -190.0,
        position_max_deg: 190.0,
        max_velocity_deg_s: 430.0,
        nominal_current_a: 2.0,
    },
    AxisProfile {
        position_min_deg: -120.0,
        position_max_deg: 120.0,
        max_velocity_deg_s: 430.0,
        nominal_current_a: 2.0,
    },
    AxisProfile {
        position_min_deg: -360.0,
        position_max_deg: 360.0,
        max_velocity_deg_s: 630.0,
        nominal_current_a: 1.5,
    },
];
