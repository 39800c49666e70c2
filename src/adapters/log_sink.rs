//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (ESP-IDF logger on the device, which goes to UART /
//! USB-CDC).  A BLE or file-backed adapter would implement the same
//! trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Booted { vbus_high } => {
                info!("BOOT  | vbus={}", if *vbus_high { "high" } else { "low" });
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {} -> {}", from.name(), to.name());
            }
            AppEvent::SessionStarted(s) => {
                info!("SESS  | start #{} id={}", s.counter, s.id.to_hex());
            }
            AppEvent::SessionEnded(s) => {
                info!("SESS  | end #{} id={}", s.counter, s.id.to_hex());
            }
            AppEvent::EventsDropped(n) => {
                warn!("QUEUE | {} event(s) dropped", n);
            }
        }
    }
}
