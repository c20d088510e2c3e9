//! Reference poses with known-good outcomes

use core::f32::consts::{FRAC_PI_2, FRAC_PI_6, PI};

/// A known relative pose of the broadcasting robot.
#[derive(Debug, Clone, Copy)]
pub struct PoseScenario {
    pub name: &'static str,
    pub range_cm: f32,
    pub bearing: f32,
    pub heading: f32,
}

impl PoseScenario {
    /// Sensor 0 facing emitter 0 at 10 cm.
    pub const HEAD_ON: Self = Self {
        name: "head_on",
        range_cm: 10.0,
        bearing: -FRAC_PI_6,
        heading: PI,
    };

    /// Close enough to saturate the facing pair's neighbours.
    pub const CLOSE: Self = Self {
        name: "close",
        range_cm: 6.0,
        bearing: -FRAC_PI_6,
        heading: PI,
    };

    /// Straight ahead on the left, same orientation as us.
    pub const ABEAM: Self = Self {
        name: "abeam",
        range_cm: 10.0,
        bearing: FRAC_PI_2,
        heading: 0.0,
    };

    /// Rotated a third of a turn.
    pub const ROTATED: Self = Self {
        name: "rotated",
        range_cm: 10.0,
        bearing: FRAC_PI_6,
        heading: -2.0 * PI / 3.0,
    };

    pub const ALL_FACING: [Self; 4] = [Self::HEAD_ON, Self::CLOSE, Self::ABEAM, Self::ROTATED];
}
