//! Runtime configuration
//!
//! Defaults come from [`crate::constants`]; use the `with_*` methods to adjust
//! individual values. Every robot taking part in a cycle must share the same
//! [`RnbTiming`], otherwise receivers sample outside the illumination windows.

use fugit::MillisDurationU32;

use crate::constants::{geometry, model, quality, time};

/// Acquisition timing shared by broadcaster and receiver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RnbTiming {
    /// Request-to-power-set delay on the broadcaster
    pub post_broadcast_delay: MillisDurationU32,
    /// Settle time after setting emitter power
    pub power_set_settle: MillisDurationU32,
    /// Length of each emitter's illumination window
    pub illumination_window: MillisDurationU32,
    /// Duration of one six-sensor read
    pub sample_duration: MillisDurationU32,
    /// Dark gap between windows
    pub inter_transmission_delay: MillisDurationU32,
    /// Wire time of the request, subtracted on the receiver
    pub rx_latency_compensation: MillisDurationU32,
    /// Busy-wait poll step (µs)
    pub busy_wait_step_us: u32,
}

impl RnbTiming {
    /// Timing the Droplet hardware was tuned for.
    pub const DEFAULT: Self = Self {
        post_broadcast_delay: time::POST_BROADCAST_DELAY,
        power_set_settle: time::POWER_SET_SETTLE,
        illumination_window: time::ILLUMINATION_WINDOW,
        sample_duration: time::SENSOR_SAMPLE_DURATION,
        inter_transmission_delay: time::INTER_TRANSMISSION_DELAY,
        rx_latency_compensation: time::RX_LATENCY_COMPENSATION,
        busy_wait_step_us: time::BUSY_WAIT_STEP_US,
    };

    /// Offset into each window at which the receiver starts its read.
    pub fn sample_offset(&self) -> MillisDurationU32 {
        let slack = self.illumination_window.ticks().saturating_sub(self.sample_duration.ticks());
        MillisDurationU32::millis(slack / 2)
    }

    /// Settle delay as seen from the receiver's arrival timestamp.
    pub fn receiver_settle(&self) -> MillisDurationU32 {
        MillisDurationU32::millis(
            self.post_broadcast_delay
                .ticks()
                .saturating_sub(self.rx_latency_compensation.ticks()),
        )
    }

    /// Wall time of one full cycle from request to last gap.
    pub fn cycle_duration(&self) -> MillisDurationU32 {
        let per_direction = self.illumination_window + self.inter_transmission_delay;
        self.post_broadcast_delay + self.power_set_settle + per_direction * 6
    }
}

impl Default for RnbTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Estimation and publication policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RnbConfig {
    /// Emitter drive level used during the blast
    pub emitter_power: u16,
    /// Innovation above which a cycle is rejected
    pub innovation_reject: f32,
    /// Innovation above which the confidence is penalised
    pub innovation_penalty: f32,
    /// Confidence divisor applied past the penalty threshold
    pub penalty_factor: f32,
    /// Confidence published when the score is not finite
    pub fallback_confidence: f32,
    /// Published ranges below this are clamped up to it (cm)
    pub min_range_cm: f32,
    /// Minimum usable weight in the refined-range neighbourhood
    pub neighborhood_weight_floor: f32,
    /// Acquisition timing
    pub timing: RnbTiming,
}

impl RnbConfig {
    /// Defaults for the Droplet hardware.
    pub const DEFAULT: Self = Self {
        emitter_power: model::FULL_EMITTER_POWER,
        innovation_reject: quality::INNOVATION_REJECT,
        innovation_penalty: quality::INNOVATION_PENALTY,
        penalty_factor: quality::CONFIDENCE_PENALTY_FACTOR,
        fallback_confidence: quality::FALLBACK_CONFIDENCE,
        min_range_cm: 2.0 * geometry::DROPLET_RADIUS_CM,
        neighborhood_weight_floor: quality::NEIGHBORHOOD_WEIGHT_FLOOR,
        timing: RnbTiming::DEFAULT,
    };

    /// Override the emitter drive level.
    pub fn with_emitter_power(mut self, level: u16) -> Self {
        self.emitter_power = level;
        self
    }

    /// Override both innovation thresholds.
    ///
    /// The penalty threshold is kept at or below the reject threshold.
    pub fn with_innovation_limits(mut self, penalty: f32, reject: f32) -> Self {
        let reject = reject.abs();
        self.innovation_reject = reject;
        self.innovation_penalty = penalty.abs().min(reject);
        self
    }

    /// Override the minimum published range (cm).
    pub fn with_min_range(mut self, min_range_cm: f32) -> Self {
        self.min_range_cm = min_range_cm.max(0.0);
        self
    }

    /// Override the acquisition timing.
    pub fn with_timing(mut self, timing: RnbTiming) -> Self {
        self.timing = timing;
        self
    }
}

impl Default for RnbConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
