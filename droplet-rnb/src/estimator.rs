//! Pose Estimator
//!
//! Turns one brightness matrix into bearing, heading and range in three
//! passes:
//!
//! 1. **Bearing and heading** are weighted circular means over all 36 cells.
//!    Each reading votes for its sensor's boresight (bearing) and for the
//!    heading implied by its emitter/sensor pair facing each other.
//! 2. **Initial range** inverts the photometric model at the single cell the
//!    bearing and heading point at.
//! 3. **Refined range** re-traces every lit cell from the initial guess,
//!    inverts each one, and averages the resulting centre positions over the
//!    3×3 neighbourhood of the brightest cell with squared-brightness weights.
//!
//! No heap: per-cell candidates live in a fixed-capacity `heapless::Vec`.

use heapless::Vec;

use crate::config::RnbConfig;
use crate::constants::geometry::{BASIS_ANGLE, DIRECTIONS};
use crate::errors::{RnbError, RnbResult};
use crate::estimate::Pose;
use crate::geometry::{
    bearing_basis, emitter_offset, heading_basis, in_field_of_view, nearest_direction,
    sensor_position, CellRay, Vec2,
};
use crate::matrix::BrightnessMatrix;
use crate::photometric::{emitter_model, inverse_amplitude_model, pretty_angle, sensor_model};

const CELLS: usize = DIRECTIONS * DIRECTIONS;

/// Centre position implied by one cell.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    e: usize,
    s: usize,
    center: Vec2,
}

/// Weighted circular means of the matrix: `(bearing, heading)` in radians.
pub fn bearing_and_heading(matrix: &BrightnessMatrix) -> (f32, f32) {
    let mut bearing = Vec2::ZERO;
    let mut heading = Vec2::ZERO;

    for (e, s, v) in matrix.cells() {
        let v = v as f32;
        bearing += bearing_basis(s) * v;
        heading += heading_basis(e, s) * v;
    }

    (bearing.angle(), heading.angle())
}

/// Closed-form range guess (cm) from the pair the bearing and heading point at.
///
/// Sensor `nearest(bearing)` and emitter `nearest(bearing - heading - π)`
/// seed the guess.
pub fn initial_range_guess(matrix: &BrightnessMatrix, bearing: f32, heading: f32) -> RnbResult<f32> {
    let s = nearest_direction(bearing);
    let e = nearest_direction(bearing - heading - core::f32::consts::PI);
    initial_range_from_pair(matrix, e, s, bearing, heading)
}

/// Range guess (cm) seeded from an explicit emitter/sensor pair.
///
/// Fails with [`RnbError::FieldOfView`] when the pair cannot see along the
/// given bearing and heading.
pub fn initial_range_from_pair(
    matrix: &BrightnessMatrix,
    e: usize,
    s: usize,
    bearing: f32,
    heading: f32,
) -> RnbResult<f32> {
    let alpha = pretty_angle(bearing - BASIS_ANGLE[s]);
    let beta = pretty_angle(bearing - heading - BASIS_ANGLE[e] - core::f32::consts::PI);
    if !in_field_of_view(alpha) || !in_field_of_view(beta) {
        return Err(RnbError::FieldOfView { alpha, beta });
    }

    let gain = sensor_model(alpha) * emitter_model(beta);
    if !(gain > 0.0) {
        return Err(RnbError::ModelDomain { reason: "zero gain on seed pair" });
    }

    let span = inverse_amplitude_model(matrix.get(e, s) as f32 / gain)?;
    let center = sensor_position(s) + Vec2::from_polar(span, bearing) - emitter_offset(e, heading);
    Ok(center.norm())
}

/// Neighbourhood-averaged range (cm) around the initial guess.
///
/// `weight_floor` bounds both the neighbourhood energy and the weight carried
/// by cells that inverted cleanly; below it the result is
/// [`RnbError::DegenerateNeighborhood`].
pub fn refined_range(
    matrix: &BrightnessMatrix,
    initial_range: f32,
    bearing: f32,
    heading: f32,
    weight_floor: f32,
) -> RnbResult<f32> {
    let guess = Vec2::from_polar(initial_range, bearing);
    let mut candidates: Vec<Candidate, CELLS> = Vec::new();

    for (e, s, v) in matrix.cells() {
        if v <= 0 {
            continue;
        }
        let ray = CellRay::trace(guess, heading, e, s);
        if !ray.in_view() {
            continue;
        }
        let gain = sensor_model(ray.alpha) * emitter_model(ray.beta);
        if !(gain > 0.0) {
            continue;
        }
        let Ok(span) = inverse_amplitude_model(v as f32 / gain) else {
            continue;
        };
        let center = sensor_position(s)
            + Vec2::from_polar(span, ray.alpha + BASIS_ANGLE[s])
            - emitter_offset(e, heading);
        // 36 slots for 36 cells
        let _ = candidates.push(Candidate { e, s, center });
    }

    let (max_e, max_s) = matrix.brightest_cell();
    let neighbours = || {
        (0..3).flat_map(move |de| {
            (0..3).map(move |ds| {
                (
                    (max_e + de + DIRECTIONS - 1) % DIRECTIONS,
                    (max_s + ds + DIRECTIONS - 1) % DIRECTIONS,
                )
            })
        })
    };

    let frob_sq: f32 = neighbours()
        .map(|(e, s)| {
            let v = matrix.get(e, s) as f32;
            v * v
        })
        .sum();
    if !(frob_sq > weight_floor) {
        return Err(RnbError::DegenerateNeighborhood { weight: 0.0 });
    }

    let mut total = Vec2::ZERO;
    let mut weight_sum = 0.0f32;
    for (e, s) in neighbours() {
        if let Some(c) = candidates.iter().find(|c| c.e == e && c.s == s) {
            let v = matrix.get(e, s) as f32;
            let w = v * v / frob_sq;
            total += c.center * w;
            weight_sum += w;
        }
    }

    if !(weight_sum > weight_floor) {
        return Err(RnbError::DegenerateNeighborhood { weight: weight_sum });
    }

    rnb_debug!(
        "refined range from {} candidates, neighbourhood weight {}",
        candidates.len(),
        weight_sum
    );
    Ok((total * (1.0 / weight_sum)).norm())
}

/// Runs all three estimation passes with one configuration.
#[derive(Debug, Clone, Copy)]
pub struct PoseEstimator {
    weight_floor: f32,
}

impl PoseEstimator {
    /// Estimator using `config`'s neighbourhood weight floor.
    pub const fn new(config: &RnbConfig) -> Self {
        Self { weight_floor: config.neighborhood_weight_floor }
    }

    /// Estimate the pose of the robot that lit `matrix`.
    pub fn estimate(&self, matrix: &BrightnessMatrix) -> RnbResult<Pose> {
        let (bearing, heading) = bearing_and_heading(matrix);
        let initial_range = initial_range_guess(matrix, bearing, heading)?;
        let range = refined_range(matrix, initial_range, bearing, heading, self.weight_floor)?;

        Ok(Pose { bearing, heading, initial_range, range })
    }
}

impl Default for PoseEstimator {
    fn default() -> Self {
        Self::new(&RnbConfig::DEFAULT)
    }
}
