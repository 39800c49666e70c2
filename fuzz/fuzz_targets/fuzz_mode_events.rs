//! Fuzz target: `ModeService` event handling
//!
//! The first two bytes pick a device configuration, the first bit of the
//! third says whether USB power is present at boot, and every remaining
//! byte is one event.  Events are delivered in batches that fit the queue.
//!
//! Invariants checked:
//! - No panics and no fatal errors on the host board
//! - Final mode equals a left fold of the transition table
//! - VCC rail is powered exactly while Active
//!
//! cargo fuzz run fuzz_mode_events

#![no_main]

use std::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use libfuzzer_sys::fuzz_target;

// Host critical-section implementation for the queue's wake signal.
use critical_section as _;

use skylog::adapters::detached::Detached;
use skylog::adapters::device::DeviceAdapter;
use skylog::adapters::gpio::BoardPins;
use skylog::adapters::log_sink::LogEventSink;
use skylog::app::service::ModeService;
use skylog::config::{DeviceConfig, EVENT_QUEUE_LEN};
use skylog::drivers::hw_semaphore::{HwSemaphore, SEMAPHORE_BANK};
use skylog::drivers::rng::HwRng;
use skylog::drivers::soft_timer::SoftTimer;
use skylog::drivers::status_led::StatusLed;
use skylog::events::{Event, EventQueue};
use skylog::fsm::{self, Mode};
use skylog::pins::Pin;

#[derive(Default)]
struct Level(bool);

impl ErrorType for Level {
    type Error = Infallible;
}

impl OutputPin for Level {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0 = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0 = true;
        Ok(())
    }
}

static SEMAPHORES: HwSemaphore<SEMAPHORE_BANK> = HwSemaphore::new();

fuzz_target!(|data: &[u8]| {
    let [lo, hi, boot, events @ ..] = data else {
        return;
    };

    let bits = u16::from_le_bytes([*lo, *hi]) % DeviceConfig::COMBINATIONS;
    let config = DeviceConfig::from_bits(bits);
    let vbus_high = boot & 1 != 0;
    let events: Vec<Event> = events
        .iter()
        .map(|b| Event::ALL[usize::from(*b) % Event::ALL.len()])
        .collect();

    let mut hw = DeviceAdapter::new(
        BoardPins::new(core::array::from_fn(|_| Level::default())),
        StatusLed::new(Level::default(), Level::default(), Level::default()),
        SoftTimer::default(),
        &SEMAPHORES,
        HwRng::with_seed(0xf022),
        Detached::new(config),
    );
    let queue = EventQueue::<EVENT_QUEUE_LEN>::new();
    let mut sink = LogEventSink::new();
    let mut svc = ModeService::new();
    svc.boot(vbus_high, &queue, &mut hw, &mut sink);

    let start = if vbus_high { Mode::Usb } else { Mode::Sleep };
    if vbus_high {
        svc.update(&queue, &mut hw, &mut sink).unwrap();
    }

    for batch in events.chunks(EVENT_QUEUE_LEN - 1) {
        for &event in batch {
            queue.push(event).unwrap();
        }
        assert_eq!(svc.update(&queue, &mut hw, &mut sink).unwrap(), batch.len());
        assert_eq!(hw.pins().output(Pin::VccEn).0, svc.mode() == Mode::Active);
    }

    assert_eq!(svc.mode(), fsm::run(start, events));
});
