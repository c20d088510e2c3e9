//! Hexagonal Emitter/Sensor Layout
//!
//! Each Droplet carries six IR emitter/sensor pairs on a ring around its
//! perimeter. Direction `k` points at `-π/6 - k·π/3` in the robot's own frame,
//! so direction 0 faces 30° clockwise of the x axis and the directions proceed
//! clockwise.
//!
//! ```text
//!              4  (+y)
//!         3          5
//!                +        → +x
//!         2          0
//!              1
//! ```
//!
//! All lengths are in centimetres, the unit the photometric model was fitted in.

use core::f32::consts::{FRAC_PI_2, FRAC_PI_6};

/// Number of emitter/sensor directions around the ring.
pub const DIRECTIONS: usize = 6;

/// Half of √3, the y (or x) component of the 30° basis vectors.
pub const SQRT3_OVER_2: f32 = 0.866_025_4;

/// Body radius of a Droplet (cm).
///
/// Published ranges are clamped to at least twice this value: two bodies
/// cannot be closer than touching.
pub const DROPLET_RADIUS_CM: f32 = 2.2;

/// Radius of the ring carrying the emitter/sensor pairs (cm).
pub const SENSOR_RING_RADIUS_CM: f32 = 2.0828;

/// Boresight angle of each direction in the robot frame (radians).
pub const BASIS_ANGLE: [f32; DIRECTIONS] = [
    -FRAC_PI_6,
    -FRAC_PI_2,
    -5.0 * FRAC_PI_6,
    5.0 * FRAC_PI_6,
    FRAC_PI_2,
    FRAC_PI_6,
];

/// Unit boresight vector of each sensor, used to weight the bearing sum.
pub const BEARING_BASIS: [[f32; 2]; DIRECTIONS] = [
    [SQRT3_OVER_2, -0.5],
    [0.0, -1.0],
    [-SQRT3_OVER_2, -0.5],
    [-SQRT3_OVER_2, 0.5],
    [0.0, 1.0],
    [SQRT3_OVER_2, 0.5],
];

/// Heading implied by a lit sensor/emitter pair, indexed by `(sensor - emitter) mod 6`.
///
/// When our sensor `s` sees the other robot's emitter `e` head-on, the other
/// robot is rotated by `π - (s - e)·π/3` relative to us.
pub const HEADING_BASIS: [[f32; 2]; DIRECTIONS] = [
    [-1.0, 0.0],
    [-0.5, SQRT3_OVER_2],
    [0.5, SQRT3_OVER_2],
    [1.0, 0.0],
    [0.5, -SQRT3_OVER_2],
    [-0.5, -SQRT3_OVER_2],
];
