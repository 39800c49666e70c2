//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                 | Connects to                  |
//! |------------|----------------------------|------------------------------|
//! | `device`   | every port (composite)     | board pins, LED, timers, RNG |
//! | `gpio`     | PinPort                    | `embedded-hal` outputs       |
//! | `detached` | Storage, Config, sensors,  | log-only stand-ins           |
//! |            | audio, log writer, USB     |                              |
//! | `log_sink` | EventSink                  | Serial log output            |

pub mod detached;
pub mod device;
pub mod gpio;
pub mod log_sink;
