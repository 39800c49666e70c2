//! Application core: mode logic with no I/O.
//!
//! This module contains the rules for the logger: mode orchestration,
//! the Active-mode lifecycle, the control/session layer and session
//! identity.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod control;
pub mod events;
pub mod lifecycle;
pub mod ports;
pub mod service;
pub mod session;
