//! Deterministic doubles for the scheduler and the IR transceiver
//!
//! Provides:
//! - A virtual microsecond clock that only moves when the code under test
//!   delays, so every deadline is reproducible
//! - Critical-section depth tracking, to check what ran with interrupts off
//! - A recording IR transceiver that serves sensor rows from a fixed matrix
//!   and can fire an "interrupt" hook on every driver call
//! - A xorshift noise source

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use droplet_rnb::errors::NotSafeToSend;
use droplet_rnb::traits::{IrTransceiver, Scheduler};
use droplet_rnb::BrightnessMatrix;

/// Virtual clock and critical-section bookkeeping shared by the doubles.
#[derive(Clone, Default)]
pub struct VirtualTime {
    micros: Rc<Cell<u64>>,
    depth: Rc<Cell<u32>>,
}

impl VirtualTime {
    pub fn now_ms(&self) -> u32 {
        (self.micros.get() / 1000) as u32
    }

    pub fn in_critical(&self) -> bool {
        self.depth.get() > 0
    }
}

/// Scheduler whose clock advances only through its own delays.
pub struct MockScheduler {
    time: VirtualTime,
    atomic_sections: Cell<u32>,
}

impl MockScheduler {
    pub fn starting_at(ms: u32) -> Self {
        let time = VirtualTime::default();
        time.micros.set(ms as u64 * 1000);
        Self { time, atomic_sections: Cell::new(0) }
    }

    /// Handle for doubles that need to timestamp their calls.
    pub fn time(&self) -> VirtualTime {
        self.time.clone()
    }

    /// Number of critical sections entered so far.
    pub fn atomic_sections(&self) -> u32 {
        self.atomic_sections.get()
    }

    pub fn advance_ms(&self, ms: u32) {
        self.delay_ms(ms);
    }
}

impl Scheduler for MockScheduler {
    fn now_ms(&self) -> u32 {
        self.time.now_ms()
    }

    fn delay_ms(&self, ms: u32) {
        self.time.micros.set(self.time.micros.get() + ms as u64 * 1000);
    }

    fn delay_us(&self, us: u32) {
        self.time.micros.set(self.time.micros.get() + us as u64);
    }

    fn atomic<R>(&self, f: impl FnOnce() -> R) -> R {
        self.atomic_sections.set(self.atomic_sections.get() + 1);
        self.time.depth.set(self.time.depth.get() + 1);
        let out = critical_section::with(|_| f());
        self.time.depth.set(self.time.depth.get() - 1);
        out
    }
}

/// One transceiver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrCall {
    Broadcast { code: u8, tag: u16 },
    Power(u16),
    On(usize),
    Off(usize),
    Read,
    Blocked(bool),
}

/// Transceiver call with the virtual time it happened at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrEvent {
    pub at_ms: u32,
    pub in_critical: bool,
    pub call: IrCall,
}

type Hook = Box<dyn FnMut(&IrEvent)>;

/// Recording transceiver serving sensor rows from a preset matrix.
pub struct MockIr {
    time: VirtualTime,
    matrix: BrightnessMatrix,
    reads: usize,
    refuse_send: bool,
    events: Rc<RefCell<Vec<IrEvent>>>,
    hook: Option<Hook>,
}

impl MockIr {
    pub fn new(sched: &MockScheduler) -> Self {
        Self {
            time: sched.time(),
            matrix: BrightnessMatrix::zeroed(),
            reads: 0,
            refuse_send: false,
            events: Rc::default(),
            hook: None,
        }
    }

    /// Serve row `k % 6` of `matrix` on the k-th read.
    pub fn serving(mut self, matrix: BrightnessMatrix) -> Self {
        self.matrix = matrix;
        self
    }

    /// Make `broadcast_command` report the channel busy.
    pub fn refusing(mut self) -> Self {
        self.refuse_send = true;
        self
    }

    /// Run `hook` after every recorded call, as an interrupt would.
    pub fn with_hook(mut self, hook: impl FnMut(&IrEvent) + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn events(&self) -> Vec<IrEvent> {
        self.events.borrow().clone()
    }

    pub fn calls(&self) -> Vec<IrCall> {
        self.events.borrow().iter().map(|e| e.call).collect()
    }

    pub fn times_of(&self, wanted: impl Fn(&IrCall) -> bool) -> Vec<u32> {
        self.events
            .borrow()
            .iter()
            .filter(|e| wanted(&e.call))
            .map(|e| e.at_ms)
            .collect()
    }

    fn record(&mut self, call: IrCall) {
        let event = IrEvent {
            at_ms: self.time.now_ms(),
            in_critical: self.time.in_critical(),
            call,
        };
        self.events.borrow_mut().push(event);
        if let Some(hook) = self.hook.as_mut() {
            hook(&event);
        }
    }
}

impl IrTransceiver for MockIr {
    fn broadcast_command(&mut self, code: u8, cycle_tag: u16) -> Result<(), NotSafeToSend> {
        if self.refuse_send {
            return Err(NotSafeToSend);
        }
        self.record(IrCall::Broadcast { code, tag: cycle_tag });
        Ok(())
    }

    fn set_all_emitter_power(&mut self, level: u16) {
        self.record(IrCall::Power(level));
    }

    fn emitter_on(&mut self, direction: usize) {
        self.record(IrCall::On(direction));
    }

    fn emitter_off(&mut self, direction: usize) {
        self.record(IrCall::Off(direction));
    }

    fn read_all_sensors(&mut self) -> [i16; 6] {
        let row = self.matrix.rows()[self.reads % 6];
        self.reads += 1;
        self.record(IrCall::Read);
        row
    }

    fn set_reception_blocked(&mut self, blocked: bool) {
        self.record(IrCall::Blocked(blocked));
    }
}

#[macro_export]
macro_rules! assert_within_tolerance {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        let diff = ($actual - $expected).abs();
        if diff > $tolerance {
            panic!(
                "Value {} not within tolerance {} of expected {} (diff: {})",
                $actual, $tolerance, $expected, diff
            );
        }
    };
}

/// Angles compared on the circle, so that π and -π agree.
#[macro_export]
macro_rules! assert_angle_near {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        let diff = droplet_rnb::photometric::pretty_angle($actual - $expected).abs();
        if diff > $tolerance {
            panic!(
                "Angle {} not within {} rad of {} (diff: {})",
                $actual, $tolerance, $expected, diff
            );
        }
    };
}

/// Deterministic random number generator for tests
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        // Xorshift algorithm
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / 16777216.0
    }

    pub fn gen_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}
