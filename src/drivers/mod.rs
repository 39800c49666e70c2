//! Board drivers: timers, cross-core arbitration, indicator and RNG.

pub mod hw_semaphore;
pub mod rng;
pub mod soft_timer;
pub mod status_led;
