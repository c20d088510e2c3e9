//! Acquisition Timing Budgets
//!
//! Broadcaster and receiver run the same schedule without any handshake
//! beyond the initial request, so both sides must use identical values. One
//! full cycle occupies:
//!
//! ```text
//! settle + power set + 6 × (window + gap) = 30 + 2 + 6 × (16 + 10) = 188 ms
//! ```
//!
//! ```text
//! broadcaster   |--settle--|pw|==E0==|gap|==E1==|gap| ... |==E5==|gap|
//! receiver      |--settle--|pw|--S--.|gap|--S--.|gap| ... |--S--.|gap|
//!                                   ^ sample centred in each window
//! ```

use fugit::MillisDurationU32;

/// Delay between sending the RNB request and the start of the power-set phase.
///
/// Gives every listening robot time to decode the request and enter its
/// receiver loop.
pub const POST_BROADCAST_DELAY: MillisDurationU32 = MillisDurationU32::millis(30);

/// Time allowed for emitter power levels to settle after being set.
pub const POWER_SET_SETTLE: MillisDurationU32 = MillisDurationU32::millis(2);

/// Length of each emitter's illumination window.
pub const ILLUMINATION_WINDOW: MillisDurationU32 = MillisDurationU32::millis(16);

/// Time one instantaneous read of all six sensors takes.
///
/// The receiver starts its read `(window - sample) / 2` into the window so
/// the read is centred on the window's midpoint.
pub const SENSOR_SAMPLE_DURATION: MillisDurationU32 = MillisDurationU32::millis(6);

/// Dark gap between consecutive illumination windows.
pub const INTER_TRANSMISSION_DELAY: MillisDurationU32 = MillisDurationU32::millis(10);

/// Time the request spends on the wire before the receiver sees it.
///
/// The receiver measures its settle delay from arrival, so it waits this much
/// less than the broadcaster.
pub const RX_LATENCY_COMPENSATION: MillisDurationU32 = MillisDurationU32::millis(8);

/// Poll step used by the busy-wait loops (microseconds).
pub const BUSY_WAIT_STEP_US: u32 = 500;

/// Mask applied to the clock to build a cycle tag.
pub const CYCLE_TAG_MASK: u32 = 0xFFFF;
