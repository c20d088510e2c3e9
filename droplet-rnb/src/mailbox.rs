//! Last-value-wins estimate slot
//!
//! Holds at most one unread [`RangeBearingEstimate`]. Publishing overwrites
//! any unread value; taking clears it. Both sides may run in interrupt
//! context.

use core::cell::Cell;

use critical_section::Mutex;

use crate::estimate::RangeBearingEstimate;

/// Single-slot, interrupt-safe mailbox for the newest estimate.
pub struct EstimateMailbox {
    slot: Mutex<Cell<Option<RangeBearingEstimate>>>,
}

impl EstimateMailbox {
    /// Empty mailbox.
    pub const fn new() -> Self {
        Self { slot: Mutex::new(Cell::new(None)) }
    }

    /// Store `estimate`, replacing any unread one.
    pub fn publish(&self, estimate: RangeBearingEstimate) {
        critical_section::with(|cs| self.slot.borrow(cs).set(Some(estimate)));
    }

    /// Read and clear the unread estimate.
    pub fn take(&self) -> Option<RangeBearingEstimate> {
        critical_section::with(|cs| self.slot.borrow(cs).take())
    }

    /// Read the unread estimate without clearing it.
    pub fn peek(&self) -> Option<RangeBearingEstimate> {
        critical_section::with(|cs| self.slot.borrow(cs).get())
    }
}

impl Default for EstimateMailbox {
    fn default() -> Self {
        Self::new()
    }
}
