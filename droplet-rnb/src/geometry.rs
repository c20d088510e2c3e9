//! Planar geometry of the emitter/sensor ring
//!
//! Positions are expressed in the receiving robot's frame, centimetres,
//! origin at its centre. The other robot sits at `center` and is rotated by
//! `heading`; its emitter `e` therefore lies at
//! `center + R·(cos(θe + heading), sin(θe + heading))` and points outward.

use core::f32::consts::{FRAC_PI_2, PI};
use core::ops::{Add, AddAssign, Mul, Neg, Sub};

use crate::constants::geometry::{
    BASIS_ANGLE, BEARING_BASIS, DIRECTIONS, HEADING_BASIS, SENSOR_RING_RADIUS_CM,
};
use crate::photometric::pretty_angle;

/// 2D vector in the robot frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    /// Forward component (cm)
    pub x: f32,
    /// Left component (cm)
    pub y: f32,
}

impl Vec2 {
    /// Origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Vector from components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector of length `magnitude` pointing at `angle`.
    pub fn from_polar(magnitude: f32, angle: f32) -> Self {
        Self {
            x: magnitude * libm::cosf(angle),
            y: magnitude * libm::sinf(angle),
        }
    }

    /// Euclidean length.
    pub fn norm(self) -> f32 {
        libm::hypotf(self.x, self.y)
    }

    /// Direction in `(-π, π]`.
    pub fn angle(self) -> f32 {
        libm::atan2f(self.y, self.x)
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Unit boresight of sensor `s`, our frame.
#[inline]
pub fn bearing_basis(s: usize) -> Vec2 {
    Vec2::new(BEARING_BASIS[s][0], BEARING_BASIS[s][1])
}

/// Heading implied by the pair (emitter `e`, sensor `s`) being lit head-on.
#[inline]
pub fn heading_basis(e: usize, s: usize) -> Vec2 {
    let k = (s + DIRECTIONS - e) % DIRECTIONS;
    Vec2::new(HEADING_BASIS[k][0], HEADING_BASIS[k][1])
}

/// Position of our sensor `s` relative to our centre.
#[inline]
pub fn sensor_position(s: usize) -> Vec2 {
    bearing_basis(s) * SENSOR_RING_RADIUS_CM
}

/// Position of the other robot's emitter `e` relative to its centre.
#[inline]
pub fn emitter_offset(e: usize, heading: f32) -> Vec2 {
    Vec2::from_polar(SENSOR_RING_RADIUS_CM, BASIS_ANGLE[e] + heading)
}

/// Nearest ring direction to `angle`.
///
/// Uses `(6 - ceil(3·angle/π)) mod 6`, which rounds onto the basis angles
/// `-π/6 - k·π/3`. Ties at the half-way angles go to the lower index of the
/// clockwise pair; changing this shifts which cell seeds the range guess.
pub fn nearest_direction(angle: f32) -> usize {
    let steps = libm::ceilf(3.0 * angle / PI) as i32;
    (DIRECTIONS as i32 - steps).rem_euclid(DIRECTIONS as i32) as usize
}

/// Whether an angular offset lies inside the ±π/2 field of view.
#[inline]
pub fn in_field_of_view(angle: f32) -> bool {
    angle.abs() <= FRAC_PI_2
}

/// Ray from the other robot's emitter `e` to our sensor `s`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRay {
    /// Angle of the ray off sensor `s`'s boresight
    pub alpha: f32,
    /// Angle of the ray off emitter `e`'s boresight
    pub beta: f32,
    /// Sensor-to-emitter vector
    pub span: Vec2,
}

impl CellRay {
    /// Trace the ray for cell `[e][s]` given the other robot's centre and heading.
    pub fn trace(center: Vec2, heading: f32, e: usize, s: usize) -> Self {
        let sensor = sensor_position(s);
        let emitter = center + emitter_offset(e, heading);
        let span = emitter - sensor;

        Self {
            alpha: pretty_angle(span.angle() - BASIS_ANGLE[s]),
            beta: pretty_angle((-span).angle() - BASIS_ANGLE[e] - heading),
            span,
        }
    }

    /// Both ends of the ray face each other within the field of view.
    pub fn in_view(&self) -> bool {
        in_field_of_view(self.alpha) && in_field_of_view(self.beta)
    }

    /// Sensor-to-emitter distance (cm).
    pub fn length(&self) -> f32 {
        self.span.norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_direction_hits_each_basis() {
        for k in 0..DIRECTIONS {
            assert_eq!(nearest_direction(BASIS_ANGLE[k]), k);
            assert_eq!(nearest_direction(BASIS_ANGLE[k] + 0.4), k);
            assert_eq!(nearest_direction(BASIS_ANGLE[k] - 0.4), k);
        }
    }

    #[test]
    fn nearest_direction_wraps_large_angles() {
        // bearing - heading - π can sit well below -π
        assert_eq!(nearest_direction(BASIS_ANGLE[1] - 2.0 * PI), 1);
        assert_eq!(nearest_direction(BASIS_ANGLE[4] + 2.0 * PI), 4);
    }

    #[test]
    fn head_on_ray_is_on_axis() {
        let bearing = BASIS_ANGLE[0];
        let center = Vec2::from_polar(10.0, bearing);
        let ray = CellRay::trace(center, PI, 0, 0);

        assert!(ray.alpha.abs() < 1e-4);
        assert!(ray.beta.abs() < 1e-4);
        assert!((ray.length() - (10.0 - 2.0 * SENSOR_RING_RADIUS_CM)).abs() < 1e-4);
        assert!(ray.in_view());
    }

    #[test]
    fn facing_away_is_out_of_view() {
        let center = Vec2::from_polar(10.0, BASIS_ANGLE[0]);
        // Heading 0: emitter 0 points the same way we look, away from us
        let ray = CellRay::trace(center, 0.0, 0, 0);
        assert!(!ray.in_view());
    }

    #[test]
    fn heading_basis_wraps() {
        assert_eq!(heading_basis(1, 1), Vec2::new(-1.0, 0.0));
        assert_eq!(heading_basis(5, 0), heading_basis(0, 1));
    }
}
