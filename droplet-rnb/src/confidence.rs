//! Confidence Scoring Against the Full Measurement
//!
//! ## Overview
//!
//! The estimator only looks at a handful of cells. To check that its answer
//! explains the whole measurement, the scorer runs the photometric model
//! forward from the candidate pose, predicting all 36 cells, and compares the
//! prediction against what was measured.
//!
//! ## Innovation
//!
//! Both matrices are scaled to unit Frobenius norm and compared cell by cell:
//!
//! ```text
//! innovation = Σ | M[e][s] / ‖M‖ - X[e][s] / ‖X‖ |
//! ```
//!
//! A perfect fit scores 0. A matrix compared against its own negation scores
//! `2·‖M‖₁/‖M‖₂`, which is exactly 2 when a single cell is lit and larger
//! otherwise. Overall brightness cancels out, so a wrong range on its own
//! barely moves the innovation; a wrong bearing or heading moves it a lot.
//!
//! ## Policy
//!
//! ```text
//! confidence = sqrt(signal_energy) / innovation²
//! ```
//!
//! - innovation > reject threshold: the cycle is dropped
//! - innovation > penalty threshold: confidence divided by the penalty factor
//! - non-finite confidence (perfect fit, negative energy): fallback value

use crate::config::RnbConfig;
use crate::constants::geometry::DIRECTIONS;
use crate::errors::{RnbError, RnbResult};
use crate::estimate::Pose;
use crate::geometry::{CellRay, Vec2};
use crate::matrix::BrightnessMatrix;
use crate::photometric::{amplitude_model, emitter_model, sensor_model};

/// Real-valued 6×6 grid, `[emitter][sensor]`.
pub type ExpectedMatrix = [[f32; DIRECTIONS]; DIRECTIONS];

/// Predicted brightness matrix for a robot at `range` cm, `bearing`, `heading`.
///
/// Cells whose ray falls outside either field of view are zero.
pub fn full_expected_bright_mat(range: f32, bearing: f32, heading: f32) -> ExpectedMatrix {
    let center = Vec2::from_polar(range, bearing);
    let mut expected = [[0.0; DIRECTIONS]; DIRECTIONS];

    for (e, row) in expected.iter_mut().enumerate() {
        for (s, cell) in row.iter_mut().enumerate() {
            let ray = CellRay::trace(center, heading, e, s);
            if ray.in_view() {
                *cell = sensor_model(ray.alpha)
                    * emitter_model(ray.beta)
                    * amplitude_model(ray.length());
            }
        }
    }

    expected
}

/// Measured matrix widened to `f32`.
pub fn measured_as_f32(matrix: &BrightnessMatrix) -> ExpectedMatrix {
    let mut out = [[0.0; DIRECTIONS]; DIRECTIONS];
    for (e, s, v) in matrix.cells() {
        out[e][s] = v as f32;
    }
    out
}

/// L1 distance between the Frobenius-normalised matrices.
///
/// A zero norm on either side has no direction to compare and is reported as
/// [`RnbError::ModelDomain`].
pub fn innovation(measured: &ExpectedMatrix, expected: &ExpectedMatrix) -> RnbResult<f32> {
    let measured_norm = frobenius(measured);
    let expected_norm = frobenius(expected);
    if !(measured_norm > 0.0) {
        return Err(RnbError::ModelDomain { reason: "measured matrix has zero norm" });
    }
    if !(expected_norm > 0.0) {
        return Err(RnbError::ModelDomain { reason: "expected matrix has zero norm" });
    }

    let mut sum = 0.0f32;
    for (m_row, x_row) in measured.iter().zip(expected.iter()) {
        for (m, x) in m_row.iter().zip(x_row.iter()) {
            sum += (m / measured_norm - x / expected_norm).abs();
        }
    }
    Ok(sum)
}

fn frobenius(matrix: &ExpectedMatrix) -> f32 {
    let sq: f32 = matrix.iter().flatten().map(|v| v * v).sum();
    libm::sqrtf(sq)
}

/// Outcome of scoring one pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    /// Range to publish, clamped to the configured floor (cm)
    pub range_cm: f32,
    /// Innovation of the pose against the measurement
    pub innovation: f32,
    /// Finite, non-negative trust score
    pub confidence: f32,
}

/// Applies the innovation and confidence policy from an [`RnbConfig`].
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceScorer {
    reject: f32,
    penalty: f32,
    penalty_factor: f32,
    fallback: f32,
    min_range_cm: f32,
}

impl ConfidenceScorer {
    /// Scorer with `config`'s thresholds.
    pub const fn new(config: &RnbConfig) -> Self {
        Self {
            reject: config.innovation_reject,
            penalty: config.innovation_penalty,
            penalty_factor: config.penalty_factor,
            fallback: config.fallback_confidence,
            min_range_cm: config.min_range_cm,
        }
    }

    /// Score `pose` against `matrix`.
    ///
    /// `signal_energy` is the cell sum from
    /// [`process_matrix`](crate::matrix::process_matrix).
    pub fn score(
        &self,
        matrix: &BrightnessMatrix,
        signal_energy: i32,
        pose: &Pose,
    ) -> RnbResult<Assessment> {
        let range_cm = pose.range.max(self.min_range_cm);
        let expected = full_expected_bright_mat(range_cm, pose.bearing, pose.heading);
        let innovation = innovation(&measured_as_f32(matrix), &expected)?;

        if innovation > self.reject {
            return Err(RnbError::HighInnovation { innovation, limit: self.reject });
        }

        let mut confidence = libm::sqrtf(signal_energy as f32) / (innovation * innovation);
        if innovation > self.penalty {
            confidence /= self.penalty_factor;
        }
        if !confidence.is_finite() || confidence < 0.0 {
            confidence = self.fallback;
        }

        Ok(Assessment { range_cm, innovation, confidence })
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(&RnbConfig::DEFAULT)
    }
}
