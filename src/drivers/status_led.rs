//! RGB status LED driver.
//!
//! Three GPIOs drive discrete R/G/B LEDs (or a common-cathode RGB LED).
//! The selected colour is remembered while the LED is dark so `on`
//! restores it.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: the channels are `PinDriver` outputs.
//! On host/test: any `embedded-hal` `OutputPin`.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::{LedColour, LedPort};

pub struct StatusLed<P> {
    red: P,
    green: P,
    blue: P,
    colour: LedColour,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(red: P, green: P, blue: P) -> Self {
        Self {
            red,
            green,
            blue,
            colour: LedColour::Green,
            lit: false,
        }
    }

    pub fn colour(&self) -> LedColour {
        self.colour
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    fn apply(&mut self) {
        let level = |c: LedColour| PinState::from(self.lit && self.colour == c);
        let (r, g, b) = (level(LedColour::Red), level(LedColour::Green), level(LedColour::Blue));
        let ok = self.red.set_state(r).is_ok()
            & self.green.set_state(g).is_ok()
            & self.blue.set_state(b).is_ok();
        if !ok {
            warn!("led: channel write failed");
        }
    }
}

impl<P: OutputPin> LedPort for StatusLed<P> {
    fn set_colour(&mut self, colour: LedColour) {
        self.colour = colour;
        self.apply();
    }

    fn led_on(&mut self) {
        self.lit = true;
        self.apply();
    }

    fn led_off(&mut self) {
        self.lit = false;
        self.apply();
    }
}
