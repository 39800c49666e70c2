//! Skylog Firmware: main entry point
//!
//! Hexagonal architecture with an interrupt-fed event queue.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  DeviceAdapter                      LogEventSink               │
//! │  (pins · LED · timers · RNG ·       (EventSink)                │
//! │   semaphore · detached subsystems)                             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              ModeService (pure logic)                  │    │
//! │  │  fsm · lifecycle · control · session                   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Button / VBUS ISRs ──▶ EventQueue ◀── 10 ms timer tick        │
//! └────────────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

use core::sync::atomic::{AtomicU32, Ordering};

use anyhow::Result;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Input, InterruptType, Output, PinDriver, Pull};
use esp_idf_svc::sys::gpio_get_level;
use esp_idf_svc::timer::EspTaskTimerService;
use futures_lite::future::block_on;
use log::{error, info, warn};

use skylog::adapters::detached::Detached;
use skylog::adapters::device::DeviceAdapter;
use skylog::adapters::gpio::BoardPins;
use skylog::adapters::log_sink::LogEventSink;
use skylog::app::service::ModeService;
use skylog::config::{DeviceConfig, EVENT_QUEUE_LEN};
use skylog::drivers::hw_semaphore::{HwSemaphore, SEMAPHORE_BANK};
use skylog::drivers::rng::HwRng;
use skylog::drivers::soft_timer::{DEFAULT_TICK, SoftTimer};
use skylog::drivers::status_led::StatusLed;
use skylog::events::{Event, EventQueue};
use skylog::pins::{self, Pin};

// ── Shared with interrupt context ─────────────────────────────

static QUEUE: EventQueue<EVENT_QUEUE_LEN> = EventQueue::new();
static SEMAPHORES: HwSemaphore<SEMAPHORE_BANK> = HwSemaphore::new();
static TICKS: AtomicU32 = AtomicU32::new(0);

type Out = PinDriver<'static, AnyOutputPin, Output>;
type In = PinDriver<'static, AnyIOPin, Input>;

fn output(gpio: i32) -> Result<Out> {
    // SAFETY: each GPIO number is claimed exactly once, here at boot.
    let pin = unsafe { AnyOutputPin::new(gpio) };
    Ok(PinDriver::output(pin)?)
}

fn edge_input(gpio: i32, pull: Pull, on_edge: fn()) -> Result<In> {
    // SAFETY: as for `output`.
    let mut pin = PinDriver::input(unsafe { AnyIOPin::new(gpio) })?;
    pin.set_pull(pull)?;
    pin.set_interrupt_type(InterruptType::AnyEdge)?;
    // SAFETY: the callback only pushes onto the ISR-safe queue.
    unsafe { pin.subscribe(on_edge)? };
    pin.enable_interrupt()?;
    Ok(pin)
}

fn level(gpio: i32) -> bool {
    // SAFETY: reading an input level has no side effects.
    unsafe { gpio_get_level(gpio) != 0 }
}

fn push_from_isr(event: Event) {
    // Overflow is counted by the queue and reported by the mode task.
    let _ = QUEUE.push(event);
}

fn on_button_edge() {
    // Button is active LOW.
    push_from_isr(if level(pins::BUTTON_GPIO) {
        Event::ButtonReleased
    } else {
        Event::ButtonPressed
    });
}

fn on_vbus_edge() {
    push_from_isr(if level(pins::VBUS_DIV_GPIO) {
        Event::VbusHigh
    } else {
        Event::VbusLow
    });
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Skylog v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Board outputs ──────────────────────────────────────
    let board = BoardPins::new([
        output(Pin::ChargeEnLo.gpio())?,
        output(Pin::ChargeEnHi.gpio())?,
        output(Pin::GnssSafebootN.gpio())?,
        output(Pin::VccEn.gpio())?,
        output(Pin::MmcNcs.gpio())?,
        output(Pin::VbatEn.gpio())?,
        output(Pin::MicEn.gpio())?,
    ]);
    let led = StatusLed::new(
        output(pins::LED_R_GPIO)?,
        output(pins::LED_G_GPIO)?,
        output(pins::LED_B_GPIO)?,
    );

    let mut hw = DeviceAdapter::new(
        board,
        led,
        SoftTimer::new(DEFAULT_TICK),
        &SEMAPHORES,
        HwRng::new(),
        Detached::new(DeviceConfig::default()),
    );
    let mut sink = LogEventSink::new();
    let mut mode = ModeService::new();

    // ── 3. Boot: sample VBUS before interrupts can race it ────
    mode.boot(level(pins::VBUS_DIV_GPIO), &QUEUE, &mut hw, &mut sink);

    let mut button = edge_input(pins::BUTTON_GPIO, Pull::Up, on_button_edge)?;
    let mut vbus = edge_input(pins::VBUS_DIV_GPIO, Pull::Floating, on_vbus_edge)?;

    // ── 4. Timer server tick ──────────────────────────────────
    let timer_service = EspTaskTimerService::new()?;
    let tick = timer_service.timer(|| {
        TICKS.fetch_add(1, Ordering::Relaxed);
        QUEUE.wake();
    })?;
    tick.every(core::time::Duration::from_micros(DEFAULT_TICK.as_micros()))?;

    info!("System ready. Entering event loop.");

    // ── 5. Event loop ─────────────────────────────────────────
    loop {
        // The GPIO driver disarms an input after each edge.  Re-arm before
        // handling so an edge during a long Active entry or exit still
        // reaches the queue.
        if let Err(e) = button.enable_interrupt() {
            warn!("button: re-arm failed ({})", e);
        }
        if let Err(e) = vbus.enable_interrupt() {
            warn!("vbus: re-arm failed ({})", e);
        }

        for _ in 0..TICKS.swap(0, Ordering::Relaxed) {
            for id in hw.timers_mut().tick() {
                mode.on_timer(id, &QUEUE, &mut hw);
            }
        }

        if let Err(e) = mode.update(&QUEUE, &mut hw, &mut sink) {
            error!("Fatal: {}, halting", e);
            #[allow(clippy::empty_loop)]
            loop {}
        }

        block_on(QUEUE.wait());
    }
}
