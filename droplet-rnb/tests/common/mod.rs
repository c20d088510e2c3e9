//! Common test utilities for integration tests
//!
//! This module provides:
//! - Virtual-time scheduler and recording IR transceiver doubles
//! - Synthetic brightness matrices from the forward model
//! - Reference poses
//! - Tolerance assertions

#![allow(dead_code)]

pub mod generators;
pub mod harness;
pub mod scenarios;

use droplet_rnb::{RnbController, RangeBearingEstimate, RnbResult};

use harness::{MockIr, MockScheduler};

/// Run a full receiver cycle for `source_id` on `rnb`, reading `ir`.
pub fn receive_cycle(
    rnb: &RnbController,
    sched: &MockScheduler,
    ir: &mut MockIr,
    source_id: u16,
) -> RnbResult<RangeBearingEstimate> {
    let received_at = droplet_rnb::Scheduler::now_ms(sched);
    rnb.on_rnb_request(sched, ir, source_id, (received_at & 0xFFFF) as u16, received_at)
}
