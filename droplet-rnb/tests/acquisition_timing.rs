//! Integration tests for the acquisition protocol
//!
//! Tests the broadcaster and receiver schedules against a virtual clock:
//! - Order and timing of every transceiver call
//! - What runs with interrupts disabled
//! - Lock-step between the two roles
//! - Abandoning a broadcast the transceiver refuses

#![cfg(test)]

#[macro_use]
mod common;

use droplet_rnb::acquisition::AcquisitionSequencer;
use droplet_rnb::traits::{Scheduler, RNB_REQUEST_CODE};
use droplet_rnb::{BrightnessMatrix, CycleState, RnbConfig, RnbController, RnbError, RnbTiming};

use common::generators::synthetic_matrix;
use common::harness::{IrCall, MockIr, MockScheduler};

#[test]
fn test_broadcaster_call_order() {
    let sched = MockScheduler::starting_at(1000);
    let mut ir = MockIr::new(&sched);

    let tag = AcquisitionSequencer::default().broadcast(&sched, &mut ir, 256).unwrap();
    assert_eq!(tag, 1000);

    let mut expected = vec![
        IrCall::Broadcast { code: RNB_REQUEST_CODE, tag: 1000 },
        IrCall::Blocked(true),
        IrCall::Power(256),
    ];
    for dir in 0..6 {
        expected.push(IrCall::On(dir));
        expected.push(IrCall::Off(dir));
    }
    expected.push(IrCall::Blocked(false));

    assert_eq!(ir.calls(), expected);
}

#[test]
fn test_broadcaster_timing() {
    let sched = MockScheduler::starting_at(1000);
    let mut ir = MockIr::new(&sched);

    AcquisitionSequencer::default().broadcast(&sched, &mut ir, 256).unwrap();

    assert_eq!(ir.times_of(|c| matches!(c, IrCall::Power(_))), vec![1030]);
    let on: Vec<u32> = (0..6).map(|d| 1032 + 26 * d).collect();
    let off: Vec<u32> = on.iter().map(|t| t + 16).collect();
    assert_eq!(ir.times_of(|c| matches!(c, IrCall::On(_))), on);
    assert_eq!(ir.times_of(|c| matches!(c, IrCall::Off(_))), off);
    assert_eq!(ir.times_of(|c| *c == IrCall::Blocked(false)), vec![1188]);
}

#[test]
fn test_illumination_runs_with_interrupts_disabled() {
    let sched = MockScheduler::starting_at(0);
    let mut ir = MockIr::new(&sched);

    AcquisitionSequencer::default().broadcast(&sched, &mut ir, 256).unwrap();

    for event in ir.events() {
        let expect_critical = matches!(event.call, IrCall::On(_) | IrCall::Off(_));
        assert_eq!(event.in_critical, expect_critical, "{:?}", event);
    }
    assert_eq!(sched.atomic_sections(), 1);
}

#[test]
fn test_receiver_samples_mid_window() {
    let sched = MockScheduler::starting_at(2000);
    let matrix = synthetic_matrix(10.0, -0.5, 3.0);
    let mut ir = MockIr::new(&sched).serving(matrix);

    let got = AcquisitionSequencer::default().receive(&sched, &mut ir, 2000);

    assert_eq!(got, matrix);
    let reads: Vec<u32> = (0..6).map(|e| 2029 + 26 * e).collect();
    assert_eq!(ir.times_of(|c| *c == IrCall::Read), reads);
    assert!(ir.events().iter().all(|e| e.in_critical));
}

#[test]
fn test_roles_stay_in_lock_step() {
    let timing = RnbTiming::DEFAULT;
    let sequencer = AcquisitionSequencer::new(timing);

    let tx_sched = MockScheduler::starting_at(500);
    let mut tx = MockIr::new(&tx_sched);
    sequencer.broadcast(&tx_sched, &mut tx, 256).unwrap();
    let windows = tx.times_of(|c| matches!(c, IrCall::On(_)));

    // Request arrives after its time on the wire
    let arrival = 500 + timing.rx_latency_compensation.ticks();
    let rx_sched = MockScheduler::starting_at(arrival);
    let mut rx = MockIr::new(&rx_sched);
    sequencer.receive(&rx_sched, &mut rx, arrival);
    let reads = rx.times_of(|c| *c == IrCall::Read);

    let window = timing.illumination_window.ticks();
    let sample = timing.sample_duration.ticks();
    for (start, read) in windows.iter().zip(reads.iter()) {
        assert!(*read >= *start && read + sample <= start + window);
        assert_eq!(read + sample / 2, start + window / 2);
    }
}

#[test]
fn test_refused_broadcast_touches_nothing() {
    let sched = MockScheduler::starting_at(300);
    let rnb = RnbController::default();

    // Leave a matrix from an earlier cycle in the store
    let earlier = synthetic_matrix(10.0, -0.52, 3.14);
    let mut rx = MockIr::new(&sched).serving(earlier);
    let _ = common::receive_cycle(&rnb, &sched, &mut rx, 4);
    let before = sched.now_ms();

    let mut ir = MockIr::new(&sched).refusing();
    assert_eq!(rnb.broadcast_rnb_data(&sched, &mut ir), Err(RnbError::NotSafeToSend));

    assert!(ir.calls().is_empty());
    assert_eq!(sched.now_ms(), before);
    assert_eq!(rnb.last_matrix(), earlier);
    assert_eq!(rnb.state(), CycleState::Idle);
}

#[test]
fn test_controller_uses_configured_power() {
    let sched = MockScheduler::starting_at(0);
    let rnb = RnbController::new(RnbConfig::DEFAULT.with_emitter_power(180));
    let mut ir = MockIr::new(&sched);

    rnb.broadcast_rnb_data(&sched, &mut ir).unwrap();

    assert!(ir.calls().contains(&IrCall::Power(180)));
    assert_eq!(rnb.state(), CycleState::Idle);
    assert_eq!(rnb.last_matrix(), BrightnessMatrix::zeroed());
}

#[test]
fn test_tag_is_lower_clock_bits() {
    let sched = MockScheduler::starting_at(0x0003_1234);
    let mut ir = MockIr::new(&sched);

    let tag = AcquisitionSequencer::default().broadcast(&sched, &mut ir, 256).unwrap();
    assert_eq!(tag, 0x1234);
}
