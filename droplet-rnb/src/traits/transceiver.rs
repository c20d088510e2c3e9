//! IR transceiver contract
//!
//! The driver owns the six emitter/sensor pairs. The RNB pipeline only needs
//! to broadcast a short request, drive individual emitters and grab an
//! instantaneous reading of all six sensors. Timing is the caller's business:
//! none of these calls may block longer than the hardware operation itself.

use crate::errors::NotSafeToSend;

/// Command code announcing an RNB cycle to every listening robot.
pub const RNB_REQUEST_CODE: u8 = b'r';

/// Six-direction IR transceiver.
pub trait IrTransceiver {
    /// Send `code` tagged with `cycle_tag` out of all six emitters.
    ///
    /// Returns [`NotSafeToSend`] when the channel is busy (an incoming
    /// message is being decoded or a transmission is still draining). The
    /// caller abandons the cycle in that case.
    fn broadcast_command(&mut self, code: u8, cycle_tag: u16) -> Result<(), NotSafeToSend>;

    /// Set the drive level of all six emitters.
    fn set_all_emitter_power(&mut self, level: u16);

    /// Light emitter `direction` continuously.
    fn emitter_on(&mut self, direction: usize);

    /// Turn emitter `direction` off.
    fn emitter_off(&mut self, direction: usize);

    /// One instantaneous, ambient-corrected reading of all six sensors.
    fn read_all_sensors(&mut self) -> [i16; 6];

    /// Ignore incoming IR traffic while our own emitters are blasting.
    ///
    /// Drivers without receive blocking can leave the default.
    fn set_reception_blocked(&mut self, _blocked: bool) {}
}
