//! Unified error types for the logger core.
//!
//! Every error in here is fatal: the lifecycle code propagates it with `?`
//! up to [`ModeService`](crate::app::service::ModeService), and the firmware
//! entry point halts the device.  Nothing is retried.  All variants are
//! `Copy` so they can be logged and returned without allocation.

use core::fmt;

use crate::app::ports::ConfigError;
use crate::pins::Pin;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The hardware random source failed during session-ID generation.
    Rng(RngOp),
    /// A GPIO write, configure or release was rejected by the driver.
    Gpio(Pin),
    /// Filesystem layer or card operation failed.
    Storage(StorageOp),
    /// `/config.txt` could not be read or parsed.
    Config(ConfigError),
    /// A shared peripheral (ADC, UART) failed to init or deinit.
    Peripheral(Peripheral),
    /// USB mode entry or exit failed.
    Usb(UsbOp),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rng(op) => write!(f, "rng: {op} failed"),
            Self::Gpio(pin) => write!(f, "gpio: {pin} rejected"),
            Self::Storage(op) => write!(f, "storage: {op} failed"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Peripheral(p) => write!(f, "peripheral: {p} failed"),
            Self::Usb(op) => write!(f, "usb: {op} failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Operation tags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngOp {
    Init,
    Generate,
    Deinit,
    ClockSelect,
}

impl fmt::Display for RngOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Generate => write!(f, "generate"),
            Self::Deinit => write!(f, "deinit"),
            Self::ClockSelect => write!(f, "clock select"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    /// Filesystem layer bring-up.
    Init,
    Mount,
    Unmount,
    /// Filesystem layer teardown.
    Deinit,
    /// SPI bus teardown after the card is released.
    BusDeinit,
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "filesystem init"),
            Self::Mount => write!(f, "mount"),
            Self::Unmount => write!(f, "unmount"),
            Self::Deinit => write!(f, "filesystem deinit"),
            Self::BusDeinit => write!(f, "SPI deinit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peripheral {
    AdcInit,
    AdcDeinit,
    UartInit,
    UartDeinit,
}

impl fmt::Display for Peripheral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcInit => write!(f, "ADC init"),
            Self::AdcDeinit => write!(f, "ADC deinit"),
            Self::UartInit => write!(f, "UART init"),
            Self::UartDeinit => write!(f, "UART deinit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsbOp {
    Enter,
    Exit,
}

impl fmt::Display for UsbOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enter => write!(f, "enter"),
            Self::Exit => write!(f, "exit"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Core-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
