//! Photometric Model Coefficients
//!
//! Empirical fits of the Droplet IR hardware at full emitter power. The
//! combined intensity seen by a sensor is modelled as
//!
//! ```text
//! I(α, β, r) = S(α) · E(β) · A(r)
//! ```
//!
//! where `S` is the sensor's angular gain, `E` the emitter's angular profile
//! and `A` the on-axis intensity at distance `r` (cm).

// ===== ANGULAR RESPONSE =====

/// Angular offset beyond which neither sensor nor emitter responds (radians).
pub const ANGULAR_CUTOFF_RAD: f32 = 1.5;

/// Edge of the sensor's quartic roll-off region (radians).
pub const SENSOR_INNER_RAD: f32 = 0.62;

/// Sensor gain coefficient in the transition band, `k / α⁴`.
pub const SENSOR_TAIL_COEFF: f32 = 0.125;

/// Edge of the emitter's central lobe (radians).
pub const EMITTER_INNER_RAD: f32 = 0.72;

/// Emitter on-axis gain.
pub const EMITTER_PEAK: f32 = 0.94;

/// Emitter quadratic lobe coefficient.
pub const EMITTER_QUADRATIC: f32 = 0.5;

/// Emitter gain coefficient in the transition band, `k / β⁴`.
pub const EMITTER_TAIL_COEFF: f32 = 0.25;

// ===== DISTANCE RESPONSE =====
//
// A(r) = OFFSET + SCALE / (SPREAD + (r - CENTER)²)

/// Ambient floor of the amplitude fit.
pub const AMPLITUDE_OFFSET: f32 = 3.908_04;

/// Scale of the amplitude fit.
pub const AMPLITUDE_SCALE: f32 = 13_427.5;

/// Spread term of the amplitude fit (cm²).
pub const AMPLITUDE_SPREAD: f32 = 5.177_16;

/// Centre of the amplitude fit (cm).
pub const AMPLITUDE_CENTER_CM: f32 = 0.528_561;

/// Near-field limit (cm); the fit is flat below this distance.
pub const NEAR_FIELD_CM: f32 = 0.5;

/// Amplitude at and inside the near-field limit.
pub const AMPLITUDE_SATURATION: f32 = 2597.1;

/// Emitter power level the model was fitted at.
pub const FULL_EMITTER_POWER: u16 = 256;
