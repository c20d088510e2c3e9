//! Brightness Matrix Store and Sensor Health Tracking
//!
//! ## Overview
//!
//! One RNB cycle produces a 6×6 grid of instantaneous IR readings,
//! `matrix[emitter][sensor]`: row `e` is captured while the other robot's
//! emitter `e` is lit, column `s` is our sensor `s`. Loops over the matrix are
//! always emitter-major:
//!
//! ```text
//! for e in 0..6 {
//!     for s in 0..6 {
//!         matrix[e][s] ...
//!     }
//! }
//! ```
//!
//! ## Freshness
//!
//! The store is shared between the acquisition path (which may run from an
//! interrupt-triggered task) and the estimator. Acquisition fills a local
//! matrix and commits it wholesale; the estimator takes it exactly once. A
//! matrix left over from an earlier cycle can never be estimated twice, and a
//! half-filled matrix is never visible.
//!
//! ## Sensor Health
//!
//! Each sensor owns a 4-bit counter packed into one `u32`:
//!
//! ```text
//! bit 31                                               bit 0
//! ┌────────┬────────┬──────┬──────┬──────┬──────┬──────┬──────┐
//! │ unused │ unused │  S5  │  S4  │  S3  │  S2  │  S1  │  S0  │
//! └────────┴────────┴──────┴──────┴──────┴──────┴──────┴──────┘
//! ```
//!
//! A column that is all zero bumps its counter, any reading resets it. When a
//! counter reaches 15 the sensor is reported and the counter starts over.
//! Faults are diagnostics only; estimation still runs on the remaining
//! sensors.

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;

use crate::constants::geometry::DIRECTIONS;
use crate::constants::quality::SENSOR_SILENCE_LIMIT;

/// Raw 6×6 IR brightness samples, `[emitter][sensor]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrightnessMatrix {
    cells: [[i16; DIRECTIONS]; DIRECTIONS],
}

impl BrightnessMatrix {
    /// All-zero matrix.
    pub const fn zeroed() -> Self {
        Self { cells: [[0; DIRECTIONS]; DIRECTIONS] }
    }

    /// Matrix from emitter-major rows.
    pub const fn from_rows(cells: [[i16; DIRECTIONS]; DIRECTIONS]) -> Self {
        Self { cells }
    }

    /// Reading of sensor `s` while emitter `e` was lit.
    #[inline]
    pub fn get(&self, e: usize, s: usize) -> i16 {
        self.cells[e][s]
    }

    /// Overwrite one cell.
    #[inline]
    pub fn set(&mut self, e: usize, s: usize, value: i16) {
        self.cells[e][s] = value;
    }

    /// Overwrite the row captured while emitter `e` was lit.
    pub fn set_row(&mut self, e: usize, row: [i16; DIRECTIONS]) {
        self.cells[e] = row;
    }

    /// Emitter-major rows.
    pub fn rows(&self) -> &[[i16; DIRECTIONS]; DIRECTIONS] {
        &self.cells
    }

    /// All cells as `(emitter, sensor, value)`, emitter-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, i16)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(e, row)| row.iter().enumerate().map(move |(s, &v)| (e, s, v)))
    }

    /// Position of the brightest cell; the first one wins ties.
    pub fn brightest_cell(&self) -> (usize, usize) {
        let mut best = (0, 0);
        let mut max = i16::MIN;
        for (e, s, v) in self.cells() {
            if v > max {
                max = v;
                best = (e, s);
            }
        }
        best
    }

    /// Whether sensor `s` read zero for every emitter.
    pub fn column_is_silent(&self, s: usize) -> bool {
        self.cells.iter().all(|row| row[s] == 0)
    }

    /// Sum of all 36 cells.
    pub fn total(&self) -> i32 {
        self.cells().map(|(_, _, v)| v as i32).sum()
    }
}

impl fmt::Display for BrightnessMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (e, row) in self.cells.iter().enumerate() {
            f.write_str("{")?;
            for (s, v) in row.iter().enumerate() {
                write!(f, "{}", v)?;
                if s + 1 < DIRECTIONS {
                    f.write_str(",")?;
                }
            }
            f.write_str("}")?;
            if e + 1 < DIRECTIONS {
                f.write_str(",")?;
            }
        }
        f.write_str("}")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BrightnessMatrix {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.cells)
    }
}

/// Consecutive-silence counters, one nibble per sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorHealth {
    counters: u32,
}

impl SensorHealth {
    /// All counters at zero.
    pub const fn new() -> Self {
        Self { counters: 0 }
    }

    /// Consecutive silent cycles recorded for sensor `s`.
    pub fn silent_cycles(&self, s: usize) -> u8 {
        ((self.counters >> (4 * s)) & 0xF) as u8
    }

    /// Fold one cycle's silent-column mask into the counters.
    ///
    /// Returns the mask of sensors that just reached the silence limit; their
    /// counters are reset.
    pub fn record(&mut self, silent_mask: u8) -> u8 {
        let mut faulted = 0u8;
        for s in 0..DIRECTIONS {
            let shift = 4 * s;
            if silent_mask & (1 << s) != 0 {
                self.counters += 1 << shift;
            } else {
                self.counters &= !(0xF << shift);
            }
            if self.silent_cycles(s) >= SENSOR_SILENCE_LIMIT {
                self.counters &= !(0xF << shift);
                faulted |= 1 << s;
            }
        }
        faulted
    }
}

/// Result of sweeping a freshly acquired matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixSummary {
    /// Sum of all cells, a rough measure of received signal
    pub signal_energy: i32,
    /// Sensors whose column was all zero this cycle
    pub silent_mask: u8,
    /// Sensors that just hit the silence limit
    pub faulted_mask: u8,
}

/// Sweep a completed matrix once: total its energy and update sensor health.
pub fn process_matrix(matrix: &BrightnessMatrix, health: &mut SensorHealth) -> MatrixSummary {
    let mut silent_mask = 0u8;
    for s in 0..DIRECTIONS {
        if matrix.column_is_silent(s) {
            silent_mask |= 1 << s;
        }
    }

    let faulted_mask = health.record(silent_mask);
    for s in 0..DIRECTIONS {
        if faulted_mask & (1 << s) != 0 {
            rnb_warn!("sensor {} silent for {} consecutive cycles", s, SENSOR_SILENCE_LIMIT);
        }
    }

    MatrixSummary {
        signal_energy: matrix.total(),
        silent_mask,
        faulted_mask,
    }
}

#[derive(Debug, Clone, Copy)]
struct StoreSlot {
    matrix: BrightnessMatrix,
    fresh: bool,
}

/// Interrupt-safe home of the most recent matrix.
pub struct MatrixStore {
    slot: Mutex<RefCell<StoreSlot>>,
}

impl MatrixStore {
    /// Empty store; nothing to take until the first commit.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(StoreSlot {
                matrix: BrightnessMatrix::zeroed(),
                fresh: false,
            })),
        }
    }

    /// Replace the stored matrix with a fully acquired one.
    pub fn commit(&self, matrix: BrightnessMatrix) {
        critical_section::with(|cs| {
            *self.slot.borrow_ref_mut(cs) = StoreSlot { matrix, fresh: true };
        });
    }

    /// Take the committed matrix if it has not been consumed yet.
    pub fn take(&self) -> Option<BrightnessMatrix> {
        critical_section::with(|cs| {
            let mut slot = self.slot.borrow_ref_mut(cs);
            if slot.fresh {
                slot.fresh = false;
                Some(slot.matrix)
            } else {
                None
            }
        })
    }

    /// Copy of the last committed matrix, consumed or not.
    pub fn last(&self) -> BrightnessMatrix {
        critical_section::with(|cs| self.slot.borrow_ref(cs).matrix)
    }

    /// Drop any unconsumed matrix.
    pub fn invalidate(&self) {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).fresh = false);
    }
}

impl Default for MatrixStore {
    fn default() -> Self {
        Self::new()
    }
}
