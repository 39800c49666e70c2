//! Hardware random number generator.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: words come from `esp_random()`, which is fed by the RF
//! subsystem's entropy source.
//! On host/test: a xorshift generator seeded at construction, so tests
//! get distinct but reproducible identifiers.
//!
//! The generator refuses to produce words unless it has been initialised
//! and tracks which kernel clock it was left on.

use log::debug;

use crate::app::ports::{RngClock, RngPort};
use crate::error::{Error, Result, RngOp};

pub struct HwRng {
    running: bool,
    clock: RngClock,
    #[cfg(not(target_os = "espidf"))]
    state: u32,
}

impl HwRng {
    #[cfg(target_os = "espidf")]
    pub fn new() -> Self {
        Self {
            running: false,
            clock: RngClock::Clk48,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self::with_seed(0x2545_f491)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn with_seed(seed: u32) -> Self {
        Self {
            running: false,
            clock: RngClock::Clk48,
            state: seed.max(1),
        }
    }

    pub fn clock(&self) -> RngClock {
        self.clock
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(target_os = "espidf")]
    fn draw(&mut self) -> u32 {
        // SAFETY: esp_random has no preconditions.
        unsafe { esp_idf_svc::sys::esp_random() }
    }

    #[cfg(not(target_os = "espidf"))]
    fn draw(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl Default for HwRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngPort for HwRng {
    fn rng_init(&mut self) -> Result<()> {
        if self.running {
            return Err(Error::Rng(RngOp::Init));
        }
        self.running = true;
        Ok(())
    }

    fn rng_next(&mut self) -> Result<u32> {
        if !self.running {
            return Err(Error::Rng(RngOp::Generate));
        }
        Ok(self.draw())
    }

    fn rng_deinit(&mut self) -> Result<()> {
        if !self.running {
            return Err(Error::Rng(RngOp::Deinit));
        }
        self.running = false;
        Ok(())
    }

    fn rng_select_clock(&mut self, clock: RngClock) -> Result<()> {
        if self.running {
            return Err(Error::Rng(RngOp::ClockSelect));
        }
        debug!("rng: kernel clock {clock:?}");
        self.clock = clock;
        Ok(())
    }
}
