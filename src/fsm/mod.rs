//! Device mode state machine.
//!
//! ```text
//!            ButtonPressed / arm hold timer
//!            ButtonReleased / cancel hold timer
//!                 ┌───────┐
//!                 ▼       │
//!   ┌────────▶  SLEEP ────┘
//!   │           │   ▲  │
//!   │ VbusLow   │   │  │ TimerExpired / enter Active
//!   │           │   │  ▼
//!  USB ◀────────┘   └─ ACTIVE ──┐  ButtonPressed / arm
//!      VbusHigh       TimerExpired  ButtonReleased / cancel
//!                     / exit Active ◀┘
//! ```
//!
//! [`transition`] is a pure function of `(mode, event)`.  It names the side
//! effect to run but never runs it; [`ModeService`] executes the
//! [`Effect`] against the hardware ports.
//!
//! [`ModeService`]: crate::app::service::ModeService

use crate::events::Event;

/// Top-level operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Sleep,
    /// Logging session running.
    Active,
    /// USB power attached; the card is exposed to the host.
    Usb,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Sleep, Mode::Active, Mode::Usb];

    pub const fn name(self) -> &'static str {
        match self {
            Mode::Sleep => "Sleep",
            Mode::Active => "Active",
            Mode::Usb => "USB",
        }
    }
}

/// Side effect attached to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ArmHoldTimer,
    CancelHoldTimer,
    EnterActive,
    ExitActive,
    EnterUsb,
    ExitUsb,
}

/// Result of applying one event to a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: Mode,
    pub effect: Option<Effect>,
}

impl Transition {
    const fn stay(mode: Mode) -> Self {
        Self {
            next: mode,
            effect: None,
        }
    }

    const fn stay_with(mode: Mode, effect: Effect) -> Self {
        Self {
            next: mode,
            effect: Some(effect),
        }
    }

    const fn to(next: Mode, effect: Effect) -> Self {
        Self {
            next,
            effect: Some(effect),
        }
    }
}

/// The transition table.  Every `(mode, event)` pair not listed leaves the
/// mode unchanged with no effect.
pub const fn transition(mode: Mode, event: Event) -> Transition {
    match (mode, event) {
        (Mode::Sleep | Mode::Active, Event::ButtonPressed) => {
            Transition::stay_with(mode, Effect::ArmHoldTimer)
        }
        (Mode::Sleep | Mode::Active, Event::ButtonReleased) => {
            Transition::stay_with(mode, Effect::CancelHoldTimer)
        }
        (Mode::Sleep, Event::TimerExpired) => Transition::to(Mode::Active, Effect::EnterActive),
        (Mode::Sleep, Event::VbusHigh) => Transition::to(Mode::Usb, Effect::EnterUsb),
        (Mode::Active, Event::TimerExpired) => Transition::to(Mode::Sleep, Effect::ExitActive),
        (Mode::Usb, Event::VbusLow) => Transition::to(Mode::Sleep, Effect::ExitUsb),
        _ => Transition::stay(mode),
    }
}

/// Fold a sequence of events left-to-right, returning the final mode.
pub fn run<I: IntoIterator<Item = Event>>(start: Mode, events: I) -> Mode {
    events
        .into_iter()
        .fold(start, |mode, event| transition(mode, event).next)
}
