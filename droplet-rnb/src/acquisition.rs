//! Acquisition Sequencer
//!
//! Fills a brightness matrix with two robots in lock-step. The broadcaster
//! announces the cycle and then lights its six emitters one after another;
//! every robot that heard the announcement samples its six sensors once per
//! illumination window. There is no handshake after the request, so both
//! roles derive every deadline from the same [`RnbTiming`].
//!
//! ## Broadcaster
//!
//! ```text
//! broadcast request (tag = now & 0xFFFF)
//! block IR reception
//! wait settle (from send time)
//! set emitter power
//! ┌ critical section ──────────────────────────────┐
//! │ wait power settle                              │
//! │ for dir in 0..6: on, wait window, off, gap     │
//! └────────────────────────────────────────────────┘
//! unblock IR reception
//! ```
//!
//! ## Receiver
//!
//! ```text
//! wait settle - latency compensation (from arrival time)
//! ┌ critical section ──────────────────────────────┐
//! │ wait power settle                              │
//! │ for e in 0..6:                                 │
//! │   wait (window - sample) / 2, read row e       │
//! │   wait out window, gap                         │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! The receiver builds its matrix locally and hands it back whole; nothing
//! shared is touched until the caller commits it.

use crate::config::RnbTiming;
use crate::constants::geometry::DIRECTIONS;
use crate::constants::time::CYCLE_TAG_MASK;
use crate::errors::RnbResult;
use crate::matrix::BrightnessMatrix;
use crate::traits::{IrTransceiver, Scheduler, RNB_REQUEST_CODE};

/// Runs either side of the acquisition protocol with one timing table.
#[derive(Debug, Clone, Copy)]
pub struct AcquisitionSequencer {
    timing: RnbTiming,
}

impl AcquisitionSequencer {
    /// Sequencer using `timing`.
    pub const fn new(timing: RnbTiming) -> Self {
        Self { timing }
    }

    /// Timing table in use.
    pub fn timing(&self) -> &RnbTiming {
        &self.timing
    }

    /// Announce a cycle and run the illumination sequence.
    ///
    /// Returns the cycle tag sent with the request. If the transceiver refuses
    /// to send, nothing else happens and the refusal is returned.
    pub fn broadcast<S, I>(&self, sched: &S, ir: &mut I, power: u16) -> RnbResult<u16>
    where
        S: Scheduler,
        I: IrTransceiver,
    {
        let sent_at = sched.now_ms();
        let tag = (sent_at & CYCLE_TAG_MASK) as u16;
        ir.broadcast_command(RNB_REQUEST_CODE, tag)?;

        ir.set_reception_blocked(true);
        self.blast(sched, ir, sent_at, power);
        ir.set_reception_blocked(false);

        rnb_debug!("rnb blast done, tag {}", tag);
        Ok(tag)
    }

    fn blast<S, I>(&self, sched: &S, ir: &mut I, sent_at: u32, power: u16)
    where
        S: Scheduler,
        I: IrTransceiver,
    {
        let t = &self.timing;
        sched.wait_until_elapsed(sent_at, t.post_broadcast_delay, t.busy_wait_step_us);

        let power_set_at = sched.now_ms();
        ir.set_all_emitter_power(power);

        sched.atomic(|| {
            sched.wait_until_elapsed(power_set_at, t.power_set_settle, t.busy_wait_step_us);
            for dir in 0..DIRECTIONS {
                let window_start = sched.now_ms();
                ir.emitter_on(dir);
                sched.wait_until_elapsed(window_start, t.illumination_window, t.busy_wait_step_us);
                ir.emitter_off(dir);
                sched.delay_ms(t.inter_transmission_delay.ticks());
            }
        });
    }

    /// Sample one full matrix for a request that arrived at `received_at`.
    pub fn receive<S, I>(&self, sched: &S, ir: &mut I, received_at: u32) -> BrightnessMatrix
    where
        S: Scheduler,
        I: IrTransceiver,
    {
        let t = &self.timing;
        sched.wait_until_elapsed(received_at, t.receiver_settle(), t.busy_wait_step_us);

        sched.atomic(|| {
            let mut matrix = BrightnessMatrix::zeroed();
            let power_set_at = sched.now_ms();
            sched.wait_until_elapsed(power_set_at, t.power_set_settle, t.busy_wait_step_us);

            for e in 0..DIRECTIONS {
                let window_start = sched.now_ms();
                sched.wait_until_elapsed(window_start, t.sample_offset(), t.busy_wait_step_us);
                matrix.set_row(e, ir.read_all_sensors());
                sched.wait_until_elapsed(window_start, t.illumination_window, t.busy_wait_step_us);
                sched.delay_ms(t.inter_transmission_delay.ticks());
            }
            matrix
        })
    }
}

impl Default for AcquisitionSequencer {
    fn default() -> Self {
        Self::new(RnbTiming::DEFAULT)
    }
}
