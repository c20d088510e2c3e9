//! Estimate Quality Thresholds
//!
//! Innovation is the L1 distance between the Frobenius-normalised measured
//! matrix and the matrix the candidate pose predicts. It is 0 for a perfect
//! fit and at least 2 for a matrix compared against its own negation.

// ===== INNOVATION =====

/// Innovation above which a cycle is rejected outright.
pub const INNOVATION_REJECT: f32 = 2.5;

/// Innovation above which the confidence is cut by [`CONFIDENCE_PENALTY_FACTOR`].
pub const INNOVATION_PENALTY: f32 = 2.0;

/// Divisor applied to the confidence of a poorly fitting estimate.
pub const CONFIDENCE_PENALTY_FACTOR: f32 = 10.0;

// ===== CONFIDENCE =====

/// Confidence published when the score is not a finite number.
pub const FALLBACK_CONFIDENCE: f32 = 0.01;

/// Minimum normalised neighbourhood weight needed to trust a refined range.
pub const NEIGHBORHOOD_WEIGHT_FLOOR: f32 = 1e-3;

// ===== SENSOR HEALTH =====

/// Consecutive silent cycles after which a sensor is reported faulty.
///
/// Matches the saturation value of the 4-bit per-sensor counter.
pub const SENSOR_SILENCE_LIMIT: u8 = 15;
