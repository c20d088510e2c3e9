//! Scheduler Abstraction for the Droplet Runtime
//!
//! The RNB pipeline needs three things from the cooperative scheduler that
//! drives the robot: a monotonic millisecond clock, bounded busy-wait delays
//! and critical sections. Everything else about the task queue stays hidden.
//!
//! ## Clock Semantics
//!
//! `now_ms()` counts milliseconds since reset and wraps silently at `u32::MAX`
//! (about 49 days). Never compare absolute timestamps; always subtract with
//! [`u32::wrapping_sub`] and compare the difference, which is what
//! [`Scheduler::elapsed_since`] and [`Scheduler::wait_until_elapsed`] do.
//!
//! ## Critical Sections
//!
//! [`Scheduler::atomic`] runs a closure with interrupts disabled and restores
//! the previous interrupt state afterwards, including when the closure
//! returns an error. The default goes through the `critical-section` crate, so
//! any platform that registers a `critical-section` implementation gets the
//! right behaviour without overriding it. Sections nest.
//!
//! ## Example Implementation
//!
//! ```rust
//! use core::cell::Cell;
//! use droplet_rnb::traits::Scheduler;
//!
//! struct TickScheduler {
//!     micros: Cell<u64>,
//! }
//!
//! impl Scheduler for TickScheduler {
//!     fn now_ms(&self) -> u32 {
//!         (self.micros.get() / 1000) as u32
//!     }
//!
//!     fn delay_ms(&self, ms: u32) {
//!         self.micros.set(self.micros.get() + ms as u64 * 1000);
//!     }
//!
//!     fn delay_us(&self, us: u32) {
//!         self.micros.set(self.micros.get() + us as u64);
//!     }
//! }
//! ```

use fugit::MillisDurationU32;

/// Clock, delays and critical sections provided by the robot's scheduler.
pub trait Scheduler {
    /// Milliseconds since reset; wraps silently.
    fn now_ms(&self) -> u32;

    /// Block the calling context for at least `ms` milliseconds.
    fn delay_ms(&self, ms: u32);

    /// Block the calling context for at least `us` microseconds.
    fn delay_us(&self, us: u32);

    /// Run `f` with interrupts disabled.
    fn atomic<R>(&self, f: impl FnOnce() -> R) -> R {
        critical_section::with(|_| f())
    }

    /// Milliseconds elapsed since `start`, wrap-safe.
    fn elapsed_since(&self, start: u32) -> u32 {
        self.now_ms().wrapping_sub(start)
    }

    /// Busy-wait until `budget` has elapsed since `start`, polling every `step_us`.
    fn wait_until_elapsed(&self, start: u32, budget: MillisDurationU32, step_us: u32) {
        while self.elapsed_since(start) < budget.ticks() {
            self.delay_us(step_us);
        }
    }
}
