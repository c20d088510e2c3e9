//! Infrared range-and-bearing estimation for Droplet swarm robots
//!
//! Two robots measure each other with their six IR emitter/sensor pairs: one
//! broadcasts a request and lights its emitters in turn, the other samples
//! its sensors once per emitter into a 6×6 brightness matrix and inverts a
//! photometric model to get range, bearing and heading.
//!
//! Key constraints:
//! - `no_std`, no heap anywhere
//! - Hard timing: acquisition runs inside critical sections on busy-waits
//! - One cycle in flight per robot, shared with interrupt handlers
//!
//! ```no_run
//! use droplet_rnb::{RnbConfig, RnbController};
//!
//! static RNB: RnbController = RnbController::new(RnbConfig::DEFAULT);
//!
//! // After a broadcast from robot 0x2A was measured
//! if let Some(estimate) = RNB.take_last_estimate() {
//!     let _ = (estimate.range_mm, estimate.bearing_deg, estimate.heading_deg);
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod diag;

pub mod acquisition;
pub mod confidence;
pub mod config;
pub mod constants;
pub mod controller;
pub mod errors;
pub mod estimate;
pub mod estimator;
pub mod geometry;
pub mod mailbox;
pub mod matrix;
pub mod photometric;
pub mod traits;

// Public API
pub use config::{RnbConfig, RnbTiming};
pub use controller::{CycleState, RnbController};
pub use errors::{NotSafeToSend, RnbError, RnbResult};
pub use estimate::{Pose, RangeBearingEstimate};
pub use matrix::{BrightnessMatrix, SensorHealth};
pub use traits::{IrTransceiver, Scheduler};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
