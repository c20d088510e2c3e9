//! RNB Cycle Controller
//!
//! ## State Machine
//!
//! ```text
//!            broadcast_rnb_data                 (own turn)
//!   ┌──────► Broadcasting ───────────────────────────────┐
//!   │                                                    │
//! Idle ──► Acquiring ──► Estimating ──► publish / reject ─┤
//!   ▲   accept    collect         use_rnb_data           │
//!   └────────────────────────────────────────────────────┘
//! ```
//!
//! Exactly one cycle may be in flight. Entering `Broadcasting` or `Acquiring`
//! is a test-and-set inside a critical section, so an interrupt handler that
//! accepts an incoming request cannot race the main loop's own broadcast.
//! Leaving `Broadcasting` or `Estimating` always goes back to `Idle`, whether
//! the step succeeded or not.
//!
//! ## Usage
//!
//! ```rust,ignore
//! static RNB: RnbController = RnbController::new(RnbConfig::DEFAULT);
//!
//! // IR receive interrupt, on an 'r' command
//! let _ = RNB.accept_rnb_request(sender_id, cmd_tag, arrival_ms);
//!
//! // main loop
//! if RNB.state() == CycleState::Acquiring {
//!     RNB.collect_rnb_data(&sched, &mut ir)?;
//!     RNB.use_rnb_data()?;
//! }
//! if let Some(estimate) = RNB.take_last_estimate() {
//!     // hand to the swarm behaviour
//! }
//! ```

use core::cell::Cell;

use critical_section::Mutex;

use crate::acquisition::AcquisitionSequencer;
use crate::config::RnbConfig;
use crate::confidence::ConfidenceScorer;
use crate::errors::{RnbError, RnbResult};
use crate::estimate::RangeBearingEstimate;
use crate::estimator::PoseEstimator;
use crate::mailbox::EstimateMailbox;
use crate::matrix::{process_matrix, BrightnessMatrix, MatrixStore, SensorHealth};
use crate::traits::{IrTransceiver, Scheduler};

/// Where the controller is in an RNB cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleState {
    /// Ready to start a cycle
    #[default]
    Idle,
    /// Running our own illumination sequence
    Broadcasting,
    /// Sampling another robot's illumination sequence
    Acquiring,
    /// Matrix acquired, estimate not yet produced
    Estimating,
}

/// Incoming request being served.
#[derive(Debug, Clone, Copy)]
struct PendingRequest {
    source_id: u16,
    cycle_tag: u16,
    received_at: u32,
}

#[derive(Debug, Clone, Copy)]
struct CycleSlot {
    state: CycleState,
    request: Option<PendingRequest>,
}

impl CycleSlot {
    const IDLE: Self = Self { state: CycleState::Idle, request: None };
}

/// Owns one robot's RNB cycle and its published estimate.
///
/// All methods take `&self`; the controller is meant to live in a `static`
/// shared between interrupt handlers and the main loop.
pub struct RnbController {
    config: RnbConfig,
    sequencer: AcquisitionSequencer,
    estimator: PoseEstimator,
    scorer: ConfidenceScorer,
    cycle: Mutex<Cell<CycleSlot>>,
    matrices: MatrixStore,
    health: Mutex<Cell<SensorHealth>>,
    mailbox: EstimateMailbox,
}

/// Returns the controller to `Idle` when dropped.
struct IdleOnExit<'a> {
    controller: &'a RnbController,
}

impl Drop for IdleOnExit<'_> {
    fn drop(&mut self) {
        self.controller.finish();
    }
}

impl RnbController {
    /// Idle controller with no estimate.
    pub const fn new(config: RnbConfig) -> Self {
        Self {
            sequencer: AcquisitionSequencer::new(config.timing),
            estimator: PoseEstimator::new(&config),
            scorer: ConfidenceScorer::new(&config),
            config,
            cycle: Mutex::new(Cell::new(CycleSlot::IDLE)),
            matrices: MatrixStore::new(),
            health: Mutex::new(Cell::new(SensorHealth::new())),
            mailbox: EstimateMailbox::new(),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &RnbConfig {
        &self.config
    }

    /// Current cycle state.
    pub fn state(&self) -> CycleState {
        critical_section::with(|cs| self.cycle.borrow(cs).get().state)
    }

    /// Run our own broadcaster turn.
    ///
    /// Fails with [`RnbError::CycleInFlight`] if another cycle holds the
    /// controller, or [`RnbError::NotSafeToSend`] if the transceiver refused
    /// the request. Returns the cycle tag on success.
    pub fn broadcast_rnb_data<S, I>(&self, sched: &S, ir: &mut I) -> RnbResult<u16>
    where
        S: Scheduler,
        I: IrTransceiver,
    {
        self.begin(CycleState::Broadcasting, None)?;
        let _exit = IdleOnExit { controller: self };

        let result = self.sequencer.broadcast(sched, ir, self.config.emitter_power);
        if let Err(err) = &result {
            rnb_warn!("rnb broadcast abandoned: {}", err);
        }
        result
    }

    /// Claim the controller for a request from `source_id`.
    ///
    /// Safe to call from interrupt context. `received_at_ms` is the clock
    /// value when the request finished arriving.
    pub fn accept_rnb_request(&self, source_id: u16, cycle_tag: u16, received_at_ms: u32) -> RnbResult<()> {
        let request = PendingRequest { source_id, cycle_tag, received_at: received_at_ms };
        self.begin(CycleState::Acquiring, Some(request))?;
        self.matrices.invalidate();
        Ok(())
    }

    /// Sample the matrix for the accepted request.
    pub fn collect_rnb_data<S, I>(&self, sched: &S, ir: &mut I) -> RnbResult<()>
    where
        S: Scheduler,
        I: IrTransceiver,
    {
        let request = self.current_request(CycleState::Acquiring)?;
        let matrix = self.sequencer.receive(sched, ir, request.received_at);
        self.matrices.commit(matrix);
        self.advance(CycleState::Acquiring, CycleState::Estimating)
    }

    /// Estimate, score and publish from the collected matrix.
    ///
    /// The controller is back in `Idle` when this returns, whatever the
    /// outcome. On error nothing is published and the previous estimate is
    /// left as it was.
    pub fn use_rnb_data(&self) -> RnbResult<RangeBearingEstimate> {
        let request = self.current_request(CycleState::Estimating)?;
        let _exit = IdleOnExit { controller: self };

        let result = self.estimate(&request);
        match &result {
            Ok(estimate) => rnb_debug!("rnb estimate published: {:?}", estimate),
            Err(err) => rnb_info!("rnb cycle {} from {} rejected: {}", request.cycle_tag, request.source_id, err),
        }
        result
    }

    /// Accept, collect and use in one call.
    pub fn on_rnb_request<S, I>(
        &self,
        sched: &S,
        ir: &mut I,
        source_id: u16,
        cycle_tag: u16,
        received_at_ms: u32,
    ) -> RnbResult<RangeBearingEstimate>
    where
        S: Scheduler,
        I: IrTransceiver,
    {
        self.accept_rnb_request(source_id, cycle_tag, received_at_ms)?;
        self.collect_rnb_data(sched, ir)?;
        self.use_rnb_data()
    }

    /// Read and clear the newest unread estimate.
    pub fn take_last_estimate(&self) -> Option<RangeBearingEstimate> {
        self.mailbox.take()
    }

    /// Newest unread estimate, left unread.
    pub fn peek_last_estimate(&self) -> Option<RangeBearingEstimate> {
        self.mailbox.peek()
    }

    /// Most recently committed matrix, for debugging.
    pub fn last_matrix(&self) -> BrightnessMatrix {
        self.matrices.last()
    }

    /// Per-sensor silence counters.
    pub fn sensor_health(&self) -> SensorHealth {
        critical_section::with(|cs| self.health.borrow(cs).get())
    }

    fn estimate(&self, request: &PendingRequest) -> RnbResult<RangeBearingEstimate> {
        let matrix = self.matrices.take().ok_or(RnbError::StaleMatrix)?;
        rnb_debug!("rnb matrix tag {} from {}: {}", request.cycle_tag, request.source_id, matrix);

        // Only the Estimating holder gets here, so the read-modify-write is not raced
        let mut health = self.sensor_health();
        let summary = process_matrix(&matrix, &mut health);
        critical_section::with(|cs| self.health.borrow(cs).set(health));

        let pose = self.estimator.estimate(&matrix)?;
        let assessment = self.scorer.score(&matrix, summary.signal_energy, &pose)?;

        let estimate = RangeBearingEstimate::from_pose(
            request.source_id,
            assessment.range_cm,
            pose.bearing,
            pose.heading,
            assessment.confidence,
        );
        self.mailbox.publish(estimate);
        Ok(estimate)
    }

    fn begin(&self, next: CycleState, request: Option<PendingRequest>) -> RnbResult<()> {
        critical_section::with(|cs| {
            let cell = self.cycle.borrow(cs);
            let current = cell.get().state;
            if current != CycleState::Idle {
                return Err(RnbError::CycleInFlight { state: current });
            }
            cell.set(CycleSlot { state: next, request });
            Ok(())
        })
    }

    fn advance(&self, expected: CycleState, next: CycleState) -> RnbResult<()> {
        critical_section::with(|cs| {
            let cell = self.cycle.borrow(cs);
            let mut slot = cell.get();
            if slot.state != expected {
                return Err(RnbError::UnexpectedState { expected, actual: slot.state });
            }
            slot.state = next;
            cell.set(slot);
            Ok(())
        })
    }

    fn current_request(&self, expected: CycleState) -> RnbResult<PendingRequest> {
        let slot = critical_section::with(|cs| self.cycle.borrow(cs).get());
        match (slot.state, slot.request) {
            (state, Some(request)) if state == expected => Ok(request),
            (actual, _) => Err(RnbError::UnexpectedState { expected, actual }),
        }
    }

    fn finish(&self) {
        critical_section::with(|cs| self.cycle.borrow(cs).set(CycleSlot::IDLE));
    }
}

impl Default for RnbController {
    fn default() -> Self {
        Self::new(RnbConfig::DEFAULT)
    }
}
