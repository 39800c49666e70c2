//! Outbound application events.
//!
//! [`ModeService`](super::service::ModeService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide where they go (serial log, debug UART, test recorder).

use crate::app::session::SessionInfo;
use crate::fsm::Mode;

/// Structured events emitted by the mode core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Boot finished; carries the VBUS level sampled at boot.
    Booted { vbus_high: bool },

    /// The device moved between modes.
    ModeChanged { from: Mode, to: Mode },

    /// An Active-mode logging session began.
    SessionStarted(SessionInfo),

    /// An Active-mode logging session ended.  The counter has already
    /// advanced; `info` describes the session that just closed.
    SessionEnded(SessionInfo),

    /// The event queue rejected this many events since the last report.
    EventsDropped(u32),
}
