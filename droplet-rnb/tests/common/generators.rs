//! Synthetic brightness matrices built on the forward model

use droplet_rnb::confidence::full_expected_bright_mat;
use droplet_rnb::constants::geometry::{BASIS_ANGLE, DIRECTIONS};
use droplet_rnb::photometric::pretty_angle;
use droplet_rnb::BrightnessMatrix;

use super::harness::TestRng;

/// What a receiver would read for a robot at `range` cm, `bearing`, `heading`.
pub fn synthetic_matrix(range: f32, bearing: f32, heading: f32) -> BrightnessMatrix {
    let expected = full_expected_bright_mat(range, bearing, heading);
    let mut m = BrightnessMatrix::zeroed();
    for e in 0..DIRECTIONS {
        for s in 0..DIRECTIONS {
            m.set(e, s, libm::roundf(expected[e][s]) as i16);
        }
    }
    m
}

/// Same as [`synthetic_matrix`] with `±amplitude` of noise on the lit cells.
pub fn noisy_matrix(
    range: f32,
    bearing: f32,
    heading: f32,
    amplitude: f32,
    rng: &mut TestRng,
) -> BrightnessMatrix {
    let mut m = synthetic_matrix(range, bearing, heading);
    for e in 0..DIRECTIONS {
        for s in 0..DIRECTIONS {
            let v = m.get(e, s);
            if v > 0 {
                let noise = libm::roundf(rng.gen_range(-amplitude, amplitude)) as i16;
                m.set(e, s, v + noise);
            }
        }
    }
    m
}

/// Pose where our sensor `s` and the other robot's emitter `e` face each
/// other exactly: `(bearing, heading)`.
pub fn facing_pose(s: usize, e: usize) -> (f32, f32) {
    let bearing = BASIS_ANGLE[s];
    let heading = pretty_angle(bearing + core::f32::consts::PI - BASIS_ANGLE[e]);
    (bearing, heading)
}
