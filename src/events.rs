//! Interrupt-driven mode event queue.
//!
//! Events are produced by:
//! - Button GPIO ISR (press / release edges)
//! - VBUS GPIO ISR (USB power present / removed)
//! - Hold-timer expiry callback
//! - Boot (synthetic `VbusHigh` when USB is already attached)
//!
//! They are consumed by the mode task, which drains the queue to empty
//! every time it is woken.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Button ISR  │────▶│              │     │              │
//! │ VBUS ISR    │────▶│  EventQueue  │────▶│  Mode task   │
//! │ Hold timer  │────▶│    (MPSC)    │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! Pushes come from GPIO ISRs and from the mode task itself (hold-timer
//! expiry), so a push can be preempted by another push.  The producer side
//! therefore claims its slot inside a critical section.  The single
//! consumer stays lock-free.

use core::sync::atomic::{AtomicU8, AtomicU32, AtomicUsize, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Mode-relevant hardware events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Event {
    ButtonPressed = 0,
    ButtonReleased = 1,
    /// The hold timer ran out while the button was down.
    TimerExpired = 2,
    /// USB power appeared.
    VbusHigh = 3,
    /// USB power went away.
    VbusLow = 4,
}

impl Event {
    pub const ALL: [Event; 5] = [
        Event::ButtonPressed,
        Event::ButtonReleased,
        Event::TimerExpired,
        Event::VbusHigh,
        Event::VbusLow,
    ];

    fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::ButtonPressed),
            1 => Some(Self::ButtonReleased),
            2 => Some(Self::TimerExpired),
            3 => Some(Self::VbusHigh),
            4 => Some(Self::VbusLow),
            _ => None,
        }
    }
}

/// Returned by [`EventQueue::push`] when the ring is full.  Carries the
/// rejected event back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull(pub Event);

impl core::fmt::Display for QueueFull {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "event queue full, dropped {:?}", self.0)
    }
}

// ── Ring buffer ───────────────────────────────────────────────
//
// ISRs and the timer path write (produce), the mode task reads (consumes).
// Producers serialise on a critical section around the write index; the
// consumer owns the read index and only loads the write index.

/// Fixed-capacity multi-producer / single-consumer event ring.
///
/// The ring has `N` slots and holds at most `N - 1` events: it is empty
/// iff `read == write` and full iff `(write + 1) % N == read`.  A push
/// onto a full ring is rejected (the newest event is dropped and counted);
/// the queued events are never overwritten.
pub struct EventQueue<const N: usize> {
    slots: [AtomicU8; N],
    read: AtomicUsize,
    write: AtomicUsize,
    dropped: AtomicU32,
    ready: Signal<CriticalSectionRawMutex, ()>,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        const { assert!(N >= 2, "event ring needs at least two slots") };
        Self {
            slots: [const { AtomicU8::new(0) }; N],
            read: AtomicUsize::new(0),
            write: AtomicUsize::new(0),
            dropped: AtomicU32::new(0),
            ready: Signal::new(),
        }
    }

    /// Maximum number of pending events.
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Append an event and wake the consumer.
    /// Safe to call from ISR and task context alike (no allocation).
    pub fn push(&self, event: Event) -> Result<(), QueueFull> {
        let accepted = critical_section::with(|_| {
            let write = self.write.load(Ordering::Relaxed);
            let read = self.read.load(Ordering::Acquire);
            let next = (write + 1) % N;

            if next == read {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            }

            self.slots[write].store(event as u8, Ordering::Relaxed);
            self.write.store(next, Ordering::Release);
            true
        });

        if !accepted {
            return Err(QueueFull(event));
        }
        self.ready.signal(());
        Ok(())
    }

    /// Remove the oldest event.  Returns `None` when the queue is empty.
    /// Single consumer only.
    pub fn pop(&self) -> Option<Event> {
        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let raw = self.slots[read].load(Ordering::Relaxed);
        self.read.store((read + 1) % N, Ordering::Release);

        Event::from_u8(raw)
    }

    pub fn is_empty(&self) -> bool {
        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Acquire);
        read == write
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        (write + N - read) % N
    }

    /// Events rejected since the last call.  Resets the counter.
    pub fn take_dropped(&self) -> u32 {
        self.dropped.swap(0, Ordering::Relaxed)
    }

    /// Wake the consumer without enqueuing anything.  Used by the timer
    /// tick so expiries are serviced promptly.
    pub fn wake(&self) {
        self.ready.signal(());
    }

    /// Wait until at least one push or wake has happened since the last
    /// wake-up.
    pub async fn wait(&self) {
        self.ready.wait().await;
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
