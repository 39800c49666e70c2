//! Single-shot software timer server.
//!
//! One periodic hardware tick (an `esp_timer` in the firmware, the test
//! itself on the host) drives a small bank of single-shot timers, one per
//! [`TimerId`].  Each [`tick`](SoftTimer::tick) returns the timers that
//! expired on it; the caller turns those into mode events or LED actions.
//!
//! ```text
//!   timer_create ──▶ Idle ──timer_start──▶ Armed ──tick×n──▶ Expired (reported once)
//!                     ▲                       │
//!                     └──────timer_stop───────┘
//! ```
//!
//! Durations are converted to ticks by rounding up, with a floor of one
//! tick, so a timer never fires early.

use embassy_time::Duration;
use heapless::Vec;
use log::{debug, warn};

use crate::app::ports::{TimerId, TimerPort};

/// Tick period used by the firmware.
pub const DEFAULT_TICK: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Deleted,
    Idle,
    Armed { remaining: u64 },
}

/// Bank of single-shot timers advanced by [`tick`](Self::tick).
#[derive(Debug)]
pub struct SoftTimer {
    period: Duration,
    slots: [Slot; TimerId::COUNT],
}

impl SoftTimer {
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            slots: [Slot::Deleted; TimerId::COUNT],
        }
    }

    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Number of ticks covering `duration`.  Rounds up, minimum one.
    pub fn ticks_for(&self, duration: Duration) -> u64 {
        let period = self.period.as_ticks().max(1);
        duration.as_ticks().div_ceil(period).max(1)
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        matches!(self.slots[id.as_index()], Slot::Armed { .. })
    }

    pub fn exists(&self, id: TimerId) -> bool {
        self.slots[id.as_index()] != Slot::Deleted
    }

    /// Advance every armed timer by one tick.  Returns the timers that
    /// expired on this tick; each expiry is reported exactly once.
    pub fn tick(&mut self) -> Vec<TimerId, { TimerId::COUNT }> {
        let mut expired = Vec::new();
        for id in [TimerId::Hold, TimerId::LedBlink] {
            let slot = &mut self.slots[id.as_index()];
            if let Slot::Armed { remaining } = slot {
                *remaining -= 1;
                if *remaining == 0 {
                    *slot = Slot::Idle;
                    // One entry per id; capacity equals the id count.
                    let _ = expired.push(id);
                }
            }
        }
        expired
    }
}

impl Default for SoftTimer {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}

impl TimerPort for SoftTimer {
    fn timer_create(&mut self, id: TimerId) {
        let slot = &mut self.slots[id.as_index()];
        if *slot == Slot::Deleted {
            *slot = Slot::Idle;
        }
    }

    fn timer_delete(&mut self, id: TimerId) {
        self.slots[id.as_index()] = Slot::Deleted;
    }

    fn timer_start(&mut self, id: TimerId, duration: Duration) {
        let remaining = self.ticks_for(duration);
        let slot = &mut self.slots[id.as_index()];
        if *slot == Slot::Deleted {
            warn!("timer: start of deleted {id:?} ignored");
            return;
        }
        debug!("timer: {id:?} armed for {remaining} ticks");
        *slot = Slot::Armed { remaining };
    }

    fn timer_stop(&mut self, id: TimerId) {
        let slot = &mut self.slots[id.as_index()];
        if let Slot::Armed { .. } = slot {
            *slot = Slot::Idle;
        }
    }
}
