//! Constants for the RNB pipeline
//!
//! Compile-time defaults, grouped by domain:
//! - **Geometry**: hexagonal emitter/sensor layout and body dimensions
//! - **Model**: photometric model coefficients
//! - **Time**: acquisition timing budgets
//! - **Quality**: innovation, confidence and sensor-health thresholds
//!
//! Runtime overrides go through [`crate::config::RnbConfig`]; these values are
//! its defaults.

/// Hexagonal layout, basis tables and radii.
pub mod geometry;

/// Photometric model coefficients.
pub mod model;

/// Acquisition timing budgets.
pub mod time;

/// Innovation, confidence and health thresholds.
pub mod quality;

pub use geometry::{
    DIRECTIONS, BASIS_ANGLE, BEARING_BASIS, HEADING_BASIS,
    DROPLET_RADIUS_CM, SENSOR_RING_RADIUS_CM,
};

pub use time::{
    POST_BROADCAST_DELAY, POWER_SET_SETTLE, ILLUMINATION_WINDOW,
    SENSOR_SAMPLE_DURATION, INTER_TRANSMISSION_DELAY,
};

pub use quality::{
    INNOVATION_REJECT, INNOVATION_PENALTY, SENSOR_SILENCE_LIMIT,
};
