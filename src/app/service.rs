//! Mode service: the hexagonal core.
//!
//! [`ModeService`] owns the device mode, the per-boot session state and
//! the live Active/USB handles.  It is the only consumer of the
//! [`EventQueue`] and the only caller of the lifecycle functions, so mode
//! transitions are never concurrent with each other.
//!
//! ```text
//!  EventQueue ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │       ModeService         │
//!  DataReady ───▶ │  fsm · lifecycle · ctrl   │ ──▶ DeviceHardware
//!                 └──────────────────────────┘
//! ```
//!
//! All I/O flows through port traits injected at call sites, so the whole
//! service runs against mock adapters on the host.
//!
//! A returned [`Error`](crate::error::Error) is fatal.  The service must
//! not be driven again afterwards; the firmware halts.

use core::mem;

use log::{debug, error, info, warn};

use crate::config::HOLD_DURATION;
use crate::error::Result;
use crate::events::{Event, EventQueue};
use crate::fsm::{self, Effect, Mode};
use crate::sensors::DataReady;

use super::events::AppEvent;
use super::lifecycle::{self, ActiveSession, UsbSession};
use super::ports::{ControlHardware, DeviceHardware, EventSink, TimerId, TimerPort};
use super::session::Session;

// ───────────────────────────────────────────────────────────────
// Mode state
// ───────────────────────────────────────────────────────────────

/// Current mode together with the handle proving its lifecycle ran.
#[derive(Debug, Default)]
enum ModeState {
    #[default]
    Sleep,
    Active(ActiveSession),
    Usb(UsbSession),
}

impl ModeState {
    const fn mode(&self) -> Mode {
        match self {
            ModeState::Sleep => Mode::Sleep,
            ModeState::Active(_) => Mode::Active,
            ModeState::Usb(_) => Mode::Usb,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ModeService
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ModeService {
    state: ModeState,
    session: Session,
    transitions: u32,
}

impl ModeService {
    /// Service in Sleep mode with a fresh session counter.
    pub const fn new() -> Self {
        Self {
            state: ModeState::Sleep,
            session: Session::new(),
            transitions: 0,
        }
    }

    pub const fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The running logging session, if any.
    pub fn active(&self) -> Option<&ActiveSession> {
        match &self.state {
            ModeState::Active(a) => Some(a),
            _ => None,
        }
    }

    /// Mode changes since boot.
    pub const fn transitions(&self) -> u32 {
        self.transitions
    }

    // ── Boot ──────────────────────────────────────────────────

    /// Create the hold timer and, if USB power is already present, queue
    /// a synthetic `VbusHigh` so the first update enters USB mode.
    pub fn boot<const N: usize>(
        &mut self,
        vbus_high: bool,
        queue: &EventQueue<N>,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        timers.timer_create(TimerId::Hold);
        if vbus_high {
            if let Err(e) = queue.push(Event::VbusHigh) {
                warn!("mode: boot {e}");
            }
        }
        info!("mode: boot, vbus={}", if vbus_high { "high" } else { "low" });
        sink.emit(&AppEvent::Booted { vbus_high });
    }

    // ── Consumer loop ─────────────────────────────────────────

    /// Drain the queue, applying each event in arrival order.  Events
    /// pushed while the loop runs are processed before it returns.
    /// Returns the number of events consumed.
    pub fn update<const N: usize>(
        &mut self,
        queue: &EventQueue<N>,
        hw: &mut impl DeviceHardware,
        sink: &mut impl EventSink,
    ) -> Result<usize> {
        let mut consumed = 0;
        while let Some(event) = queue.pop() {
            self.handle(event, hw, sink)?;
            consumed += 1;
        }

        let dropped = queue.take_dropped();
        if dropped > 0 {
            warn!("mode: {dropped} event(s) dropped, queue full");
            sink.emit(&AppEvent::EventsDropped(dropped));
        }
        Ok(consumed)
    }

    /// Apply a single event.
    pub fn handle(
        &mut self,
        event: Event,
        hw: &mut impl DeviceHardware,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let from = self.mode();
        let t = fsm::transition(from, event);
        debug!("mode: {} + {event:?} -> {}", from.name(), t.next.name());

        match t.effect {
            None => {}
            Some(Effect::ArmHoldTimer) => hw.timer_start(TimerId::Hold, HOLD_DURATION),
            Some(Effect::CancelHoldTimer) => hw.timer_stop(TimerId::Hold),
            Some(effect) => self.switch(effect, hw, sink)?,
        }

        let to = self.mode();
        if to != from {
            self.transitions = self.transitions.wrapping_add(1);
            info!("mode: {} -> {}", from.name(), to.name());
            sink.emit(&AppEvent::ModeChanged { from, to });
        }
        debug_assert_eq!(to, t.next);
        Ok(())
    }

    /// Run a mode-changing effect.  On error the state is left at Sleep
    /// and the live handle (if any) is gone; the caller halts.
    fn switch(
        &mut self,
        effect: Effect,
        hw: &mut impl DeviceHardware,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let state = mem::take(&mut self.state);
        self.state = match (state, effect) {
            (ModeState::Sleep, Effect::EnterActive) => {
                let active = lifecycle::enter_active(hw, &mut self.session)?;
                sink.emit(&AppEvent::SessionStarted(*active.info()));
                ModeState::Active(active)
            }
            (ModeState::Active(active), Effect::ExitActive) => {
                let closed = lifecycle::exit_active(active, hw, &mut self.session)?;
                sink.emit(&AppEvent::SessionEnded(closed));
                ModeState::Sleep
            }
            (ModeState::Sleep, Effect::EnterUsb) => ModeState::Usb(lifecycle::enter_usb(hw)?),
            (ModeState::Usb(usb), Effect::ExitUsb) => {
                lifecycle::exit_usb(usb, hw)?;
                ModeState::Sleep
            }
            (state, effect) => {
                error!("mode: {effect:?} not valid in {}", state.mode().name());
                state
            }
        };
        Ok(())
    }

    // ── Control routing ───────────────────────────────────────

    /// Forward a subsystem data-ready notification.  Ignored outside
    /// Active mode.
    pub fn on_data_ready(&self, hw: &mut impl ControlHardware, kind: DataReady) {
        match &self.state {
            ModeState::Active(active) => active.controller().on_data_ready(hw, kind),
            _ => debug!("mode: {kind:?} ignored in {}", self.mode().name()),
        }
    }

    /// LED blink timer expired.
    pub fn on_led_timer(&self, hw: &mut impl ControlHardware) {
        if let ModeState::Active(active) = &self.state {
            active.controller().on_led_timer(hw);
        }
    }

    /// Route a timer-server expiry: the hold timer becomes a mode event,
    /// the blink timer goes to the control layer.
    pub fn on_timer<const N: usize>(
        &self,
        id: TimerId,
        queue: &EventQueue<N>,
        hw: &mut impl ControlHardware,
    ) {
        match id {
            TimerId::Hold => {
                if let Err(e) = queue.push(Event::TimerExpired) {
                    warn!("mode: hold expiry lost, {e}");
                }
            }
            TimerId::LedBlink => self.on_led_timer(hw),
        }
    }
}
