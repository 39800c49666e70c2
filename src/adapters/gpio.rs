//! Board GPIO adapter.
//!
//! Implements [`PinPort`] over one `embedded-hal` output per logical
//! [`Pin`].  On ESP-IDF the outputs are `PinDriver`s; on the host any
//! `OutputPin` works, which is how the tests drive it.
//!
//! `embedded-hal` has no notion of reconfiguring a pin, so
//! `configure_output` / `release_pin` track the mode here: a released pin
//! is driven low once and then refuses writes until configured again.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::PinPort;
use crate::error::{Error, Result};
use crate::pins::Pin;

/// Pins that start out released and must be configured before use.
const CONFIGURED_ON_DEMAND: [Pin; 1] = [Pin::MmcNcs];

pub struct BoardPins<P> {
    outputs: [P; Pin::COUNT],
    released: [bool; Pin::COUNT],
}

impl<P: OutputPin> BoardPins<P> {
    /// `outputs` is indexed by [`Pin::as_index`].
    pub fn new(outputs: [P; Pin::COUNT]) -> Self {
        let mut released = [false; Pin::COUNT];
        for pin in CONFIGURED_ON_DEMAND {
            released[pin.as_index()] = true;
        }
        Self { outputs, released }
    }

    pub fn is_released(&self, pin: Pin) -> bool {
        self.released[pin.as_index()]
    }

    pub fn output(&self, pin: Pin) -> &P {
        &self.outputs[pin.as_index()]
    }
}

impl<P: OutputPin> PinPort for BoardPins<P> {
    fn write_pin(&mut self, pin: Pin, state: PinState) -> Result<()> {
        // The card chip-select is latched high before it becomes an
        // output; everything else must be configured.
        if self.released[pin.as_index()] && pin != Pin::MmcNcs {
            warn!("gpio: write to released {pin}");
            return Err(Error::Gpio(pin));
        }
        self.outputs[pin.as_index()]
            .set_state(state)
            .map_err(|_| Error::Gpio(pin))
    }

    fn configure_output(&mut self, pin: Pin) -> Result<()> {
        self.released[pin.as_index()] = false;
        Ok(())
    }

    fn release_pin(&mut self, pin: Pin) -> Result<()> {
        self.outputs[pin.as_index()]
            .set_low()
            .map_err(|_| Error::Gpio(pin))?;
        self.released[pin.as_index()] = true;
        Ok(())
    }
}
