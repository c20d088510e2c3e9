//! Error Types for Range-and-Bearing Cycle Failures
//!
//! ## Design Philosophy
//!
//! Every failure in the RNB pipeline is local to one cycle. A rejected cycle
//! leaves the previously published estimate untouched and the controller
//! returns to idle, ready for the next broadcast. Nothing here may halt the
//! robot, so errors are plain values:
//!
//! 1. **Small Size**: variants carry at most two `f32` values or a
//!    `&'static str`, so returning them from the estimation hot path is cheap.
//!
//! 2. **No Heap Allocation**: no `String`, only static reasons.
//!
//! 3. **Copy Semantics**: errors are `Copy` and can be stashed for later
//!    inspection by the caller without ownership juggling.
//!
//! ## Error Categories
//!
//! ### Acquisition
//! - `NotSafeToSend`: the IR driver refused to broadcast; the cycle is dropped
//!   before any shared state is touched
//! - `CycleInFlight`: another cycle already owns the controller
//! - `UnexpectedState`: a cycle step was invoked out of order
//! - `StaleMatrix`: estimation was asked to run without a freshly acquired matrix
//!
//! ### Estimation
//! - `FieldOfView`: the seed emitter/sensor pair lies outside ±π/2
//! - `ModelDomain`: the photometric model cannot be inverted for the observed intensity
//! - `DegenerateNeighborhood`: too little signal around the brightest cell to weight a range
//!
//! ### Validation
//! - `HighInnovation`: the estimate does not explain the full measurement
//!
//! ## Handling Strategy
//!
//! ```rust
//! use droplet_rnb::RnbError;
//!
//! fn on_cycle_result(result: Result<(), RnbError>) {
//!     match result {
//!         Ok(()) => {}
//!         Err(RnbError::CycleInFlight { .. }) => {
//!             // Someone else's broadcast is being measured; try again next period
//!         }
//!         Err(RnbError::HighInnovation { .. }) => {
//!             // Likely a reflection; nothing published, nothing to do
//!         }
//!         Err(_) => {
//!             // Everything else is equally recoverable at the next cycle
//!         }
//!     }
//! }
//! ```

use thiserror_no_std::Error;

use crate::controller::CycleState;

/// Result type for RNB operations
pub type RnbResult<T> = Result<T, RnbError>;

/// Refusal reported by the IR transceiver when the channel is not clear
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("IR transceiver is not safe to transmit")]
pub struct NotSafeToSend;

/// RNB cycle failures - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum RnbError {
    /// IR driver refused to transmit the broadcast request
    #[error("IR channel not safe to send, broadcast abandoned")]
    NotSafeToSend,

    /// A cycle is already running on this robot
    #[error("RNB cycle already in flight ({state:?})")]
    CycleInFlight {
        /// State of the cycle that holds the controller
        state: CycleState,
    },

    /// Cycle step invoked from the wrong state
    #[error("Expected cycle state {expected:?}, found {actual:?}")]
    UnexpectedState {
        /// State the step requires
        expected: CycleState,
        /// State the controller was actually in
        actual: CycleState,
    },

    /// No freshly acquired matrix is available for estimation
    #[error("Brightness matrix already consumed or never acquired")]
    StaleMatrix,

    /// Seed emitter/sensor pair falls outside the ±π/2 field of view
    #[error("Seed pair outside field of view (alpha {alpha}, beta {beta})")]
    FieldOfView {
        /// Sensor-side angular offset in radians
        alpha: f32,
        /// Emitter-side angular offset in radians
        beta: f32,
    },

    /// Photometric model evaluated outside its validity range
    #[error("Photometric model domain violation: {reason}")]
    ModelDomain {
        /// Which inversion failed
        reason: &'static str,
    },

    /// Brightest-cell neighbourhood carries too little weight to average
    #[error("Degenerate range neighbourhood (weight {weight})")]
    DegenerateNeighborhood {
        /// Accumulated normalised weight of the usable cells
        weight: f32,
    },

    /// Estimate is inconsistent with the full brightness matrix
    #[error("Innovation {innovation} exceeds limit {limit}")]
    HighInnovation {
        /// Normalised residual between measured and expected matrices
        innovation: f32,
        /// Configured rejection threshold
        limit: f32,
    },
}

impl From<NotSafeToSend> for RnbError {
    fn from(_: NotSafeToSend) -> Self {
        RnbError::NotSafeToSend
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RnbError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NotSafeToSend =>
                defmt::write!(fmt, "Not safe to send"),
            Self::CycleInFlight { state } =>
                defmt::write!(fmt, "Cycle in flight ({})", state),
            Self::UnexpectedState { expected, actual } =>
                defmt::write!(fmt, "Expected {}, found {}", expected, actual),
            Self::StaleMatrix =>
                defmt::write!(fmt, "Stale matrix"),
            Self::FieldOfView { alpha, beta } =>
                defmt::write!(fmt, "Out of FOV (alpha {}, beta {})", alpha, beta),
            Self::ModelDomain { reason } =>
                defmt::write!(fmt, "Model domain: {}", reason),
            Self::DegenerateNeighborhood { weight } =>
                defmt::write!(fmt, "Degenerate neighbourhood ({})", weight),
            Self::HighInnovation { innovation, limit } =>
                defmt::write!(fmt, "Innovation {} > {}", innovation, limit),
        }
    }
}
