//! Collaborator Contracts
//!
//! The RNB pipeline is hardware-agnostic. Everything it needs from the robot
//! comes through two traits:
//!
//! - [`scheduler`] - clock, busy-wait delays, critical sections
//! - [`transceiver`] - the six-direction IR driver
//!
//! Both use static dispatch: the controller's cycle methods are generic over
//! the concrete driver types, so firmware builds pay nothing for the
//! abstraction and host tests can substitute recording mocks.

pub mod scheduler;
pub mod transceiver;

pub use scheduler::Scheduler;
pub use transceiver::{IrTransceiver, RNB_REQUEST_CODE};
