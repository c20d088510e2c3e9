//! Photometric model of the Droplet IR link
//!
//! Stateless functions mapping geometry to expected brightness and back:
//!
//! - [`sensor_model`]: receiver gain vs. angle off the sensor's boresight
//! - [`emitter_model`]: transmitter gain vs. angle off the emitter's boresight
//! - [`amplitude_model`]: on-axis intensity vs. distance
//! - [`inverse_amplitude_model`]: distance vs. observed on-axis intensity
//!
//! Angles are radians, distances centimetres. The inverse is the only fallible
//! function: intensities at or below the model's ambient floor have no
//! corresponding distance and are reported as [`RnbError::ModelDomain`].

use core::f32::consts::{PI, TAU};

use crate::constants::model::*;
use crate::errors::{RnbError, RnbResult};

/// Receiver gain for a ray arriving `alpha` radians off the sensor boresight.
///
/// Quartic roll-off near the axis, `0.125 / α⁴` in the transition band and
/// zero outside the field of view.
pub fn sensor_model(alpha: f32) -> f32 {
    let a = alpha.abs();
    if !(a < ANGULAR_CUTOFF_RAD) {
        0.0
    } else if a <= SENSOR_INNER_RAD {
        1.0 - pow4(a)
    } else {
        SENSOR_TAIL_COEFF / pow4(a)
    }
}

/// Emitter gain for a ray leaving `beta` radians off the emitter boresight.
pub fn emitter_model(beta: f32) -> f32 {
    let b = beta.abs();
    if !(b < ANGULAR_CUTOFF_RAD) {
        0.0
    } else if b <= EMITTER_INNER_RAD {
        EMITTER_PEAK + EMITTER_QUADRATIC * b * b - pow4(b)
    } else {
        EMITTER_TAIL_COEFF / pow4(b)
    }
}

/// Expected on-axis intensity at distance `r` (cm).
///
/// Flat at [`AMPLITUDE_SATURATION`] inside the near field, monotonically
/// decreasing beyond the fit centre.
pub fn amplitude_model(r: f32) -> f32 {
    if r <= NEAR_FIELD_CM {
        return AMPLITUDE_SATURATION;
    }
    let d = r - AMPLITUDE_CENTER_CM;
    AMPLITUDE_OFFSET + AMPLITUDE_SCALE / (AMPLITUDE_SPREAD + d * d)
}

/// Distance (cm) at which the on-axis intensity would be `lambda`.
///
/// Intensities at or above saturation map to the near-field floor. Anything
/// the fit cannot produce (non-finite, at or below the ambient offset) is a
/// domain error rather than a NaN.
pub fn inverse_amplitude_model(lambda: f32) -> RnbResult<f32> {
    if !lambda.is_finite() {
        return Err(RnbError::ModelDomain { reason: "non-finite intensity" });
    }
    if lambda >= AMPLITUDE_SATURATION {
        return Ok(NEAR_FIELD_CM);
    }

    let excess = lambda - AMPLITUDE_OFFSET;
    if excess <= 0.0 {
        return Err(RnbError::ModelDomain { reason: "intensity below ambient floor" });
    }

    let radicand = AMPLITUDE_SCALE / excess - AMPLITUDE_SPREAD;
    if !(radicand >= 0.0) {
        return Err(RnbError::ModelDomain { reason: "negative range radicand" });
    }

    Ok(libm::sqrtf(radicand) + AMPLITUDE_CENTER_CM)
}

/// Normalise an angle into `(-π, π]`.
pub fn pretty_angle(angle: f32) -> f32 {
    let wrapped = libm::fmodf(angle, TAU);
    if wrapped <= -PI {
        wrapped + TAU
    } else if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Radians to degrees.
#[inline]
pub fn rad_to_deg(angle: f32) -> f32 {
    angle * (180.0 / PI)
}

/// Degrees to radians.
#[inline]
pub fn deg_to_rad(angle: f32) -> f32 {
    angle * (PI / 180.0)
}

#[inline]
fn pow4(x: f32) -> f32 {
    let sq = x * x;
    sq * sq
}
