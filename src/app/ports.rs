//! Port traits: the hexagonal boundary between the mode core and the
//! board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ModeService / lifecycle / control
//! ```
//!
//! Drivers for GPIO, storage, sensors, audio, logging and USB implement
//! these traits.  The core consumes them via generics and never touches
//! hardware directly.
//!
//! ## Failure contract
//!
//! Ports that return [`Result`](crate::error::Result) report HAL-level
//! pass/fail.  The core treats every `Err` as fatal.  Subsystem start/stop
//! and log writes are fire-and-forget and return nothing.

use embassy_time::Duration;
use embedded_hal::digital::PinState;

use crate::app::events::AppEvent;
use crate::app::session::SessionInfo;
use crate::config::DeviceConfig;
use crate::error::Result;
use crate::pins::Pin;
use crate::sensors::{BaroData, GnssData, GnssTime, HumData, ImuData, MagData};

// ───────────────────────────────────────────────────────────────
// Board GPIO
// ───────────────────────────────────────────────────────────────

/// Output pins driven directly by the lifecycle.
pub trait PinPort {
    /// Drive `pin` to `state`.
    fn write_pin(&mut self, pin: Pin, state: PinState) -> Result<()>;

    /// Configure `pin` as a push-pull output, no pull, low slew.
    fn configure_output(&mut self, pin: Pin) -> Result<()>;

    /// Return `pin` to its reset (analog / high-impedance) state.
    fn release_pin(&mut self, pin: Pin) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Cross-core arbitration and random source
// ───────────────────────────────────────────────────────────────

/// Hardware semaphore shared between the two cores.
pub trait SemaphorePort {
    /// Spin until semaphore `id` is granted to this core.
    fn sem_lock(&mut self, id: usize);

    /// Release semaphore `id`.  Releasing an unheld semaphore is a no-op.
    fn sem_release(&mut self, id: usize);
}

/// Kernel clock feeding the random number generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngClock {
    /// 48 MHz shared clock, the source the radio core expects.
    Clk48,
    /// Low-speed internal oscillator.
    Lsi,
}

/// True random number generator.  Must only be driven while the RNG
/// semaphore is held.
pub trait RngPort {
    /// Configure and clock the RNG.
    fn rng_init(&mut self) -> Result<()>;

    /// Produce one 32-bit random word.
    fn rng_next(&mut self) -> Result<u32>;

    /// Switch the RNG and its clock off.
    fn rng_deinit(&mut self) -> Result<()>;

    /// Select the RNG kernel clock.
    fn rng_select_clock(&mut self, clock: RngClock) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Storage and configuration
// ───────────────────────────────────────────────────────────────

/// microSD card behind the filesystem layer.
pub trait StoragePort {
    fn init_filesystem(&mut self) -> Result<()>;

    /// Mount the card at the volume root.
    fn mount(&mut self) -> Result<()>;

    fn unmount(&mut self) -> Result<()>;

    fn deinit_filesystem(&mut self) -> Result<()>;

    /// Release the SPI bus the card sits on.
    fn deinit_bus(&mut self) -> Result<()>;
}

/// Loads the capability snapshot from the mounted card.
pub trait ConfigPort {
    fn load(&mut self, path: &str) -> core::result::Result<DeviceConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Shared peripherals
// ───────────────────────────────────────────────────────────────

/// Peripherals shared by several subsystems.
pub trait PeripheralPort {
    /// ADC used by battery and microphone sensing.
    fn init_adc(&mut self) -> Result<()>;
    fn deinit_adc(&mut self) -> Result<()>;

    /// UART the GNSS receiver talks on.
    fn init_uart(&mut self) -> Result<()>;
    fn deinit_uart(&mut self) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Subsystems
// ───────────────────────────────────────────────────────────────

/// Continuously sampled sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sensor {
    Imu,
    Baro,
    Hum,
    Mag,
    /// Shared polling driver that services baro, hum and mag.
    Poller,
}

/// Start/stop control for the continuously sampled sensors.
pub trait SensorControlPort {
    fn sensor_start(&mut self, sensor: Sensor);
    fn sensor_stop(&mut self, sensor: Sensor);
}

/// GNSS receiver.  Initialised on every Active entry, then either started
/// or explicitly put to sleep.
pub trait GnssPort {
    fn gnss_init(&mut self);
    fn gnss_start(&mut self);
    fn gnss_stop(&mut self);
    fn gnss_deinit(&mut self);
}

/// Tone request for the audio subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub start_hz: u32,
    pub end_hz: u32,
    /// `None` plays until the next tone request or audio deinit.
    pub duration_ms: Option<u32>,
    /// Attenuation steps below full scale.
    pub attenuation: u8,
}

impl Tone {
    /// Continuous 220 Hz tone played on Active entry in tone mode.
    pub const ACTIVE: Tone = Tone {
        start_hz: 220,
        end_hz: 220,
        duration_ms: None,
        attenuation: 0,
    };
}

pub trait AudioPort {
    fn audio_init(&mut self);
    fn audio_deinit(&mut self);
    fn beep(&mut self, tone: Tone);
}

// ───────────────────────────────────────────────────────────────
// Control layer collaborators
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedColour {
    Red,
    Green,
    Blue,
}

/// Single status indicator.
pub trait LedPort {
    fn set_colour(&mut self, colour: LedColour);
    fn led_on(&mut self);
    fn led_off(&mut self);
}

/// Single-shot timers owned by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Distinguishes a button tap from a long press.
    Hold,
    /// Dark period of the GNSS time-lock blink.
    LedBlink,
}

impl TimerId {
    pub const COUNT: usize = 2;

    pub const fn as_index(self) -> usize {
        match self {
            TimerId::Hold => 0,
            TimerId::LedBlink => 1,
        }
    }
}

/// Timer server.  Every timer is single-shot: after `timer_start` it
/// expires once unless `timer_stop` (or `timer_delete`) comes first.
/// Restarting an armed timer re-arms it with the new duration.
pub trait TimerPort {
    fn timer_create(&mut self, id: TimerId);
    fn timer_delete(&mut self, id: TimerId);
    fn timer_start(&mut self, id: TimerId, duration: Duration);
    fn timer_stop(&mut self, id: TimerId);
}

/// Spoken / audible feedback driven by GNSS fixes.
pub trait AudioControlPort {
    fn audio_control_init(&mut self);
    fn audio_control_deinit(&mut self);
    fn audio_control_update(&mut self, data: &GnssData);
}

/// Session log writer.  Writes are fire-and-forget.
pub trait LogPort {
    fn log_init(&mut self, session: &SessionInfo);
    fn log_deinit(&mut self, session: &SessionInfo);
    fn write_baro(&mut self, data: &BaroData);
    fn write_hum(&mut self, data: &HumData);
    fn write_mag(&mut self, data: &MagData);
    fn write_gnss(&mut self, data: &GnssData);
    fn write_gnss_time(&mut self, time: &GnssTime);
    fn write_imu(&mut self, data: &ImuData);
}

/// `GetData` accessors: latest snapshot held by each subsystem.
pub trait SensorDataPort {
    fn baro_data(&self) -> BaroData;
    fn hum_data(&self) -> HumData;
    fn mag_data(&self) -> MagData;
    fn gnss_data(&self) -> GnssData;
    fn gnss_time(&self) -> GnssTime;
    fn imu_data(&self) -> ImuData;
}

// ───────────────────────────────────────────────────────────────
// USB
// ───────────────────────────────────────────────────────────────

/// USB mass-storage mode.
pub trait UsbPort {
    fn usb_enter(&mut self) -> Result<()>;
    fn usb_exit(&mut self) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Event sink
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Port bundles
// ───────────────────────────────────────────────────────────────

/// Everything the control/session layer drives.
pub trait ControlHardware: LedPort + TimerPort + AudioControlPort + LogPort + SensorDataPort {}

impl<T> ControlHardware for T where
    T: LedPort + TimerPort + AudioControlPort + LogPort + SensorDataPort
{
}

/// Everything the Active-mode lifecycle drives.
pub trait ActiveHardware:
    PinPort
    + SemaphorePort
    + RngPort
    + StoragePort
    + ConfigPort
    + PeripheralPort
    + SensorControlPort
    + GnssPort
    + AudioPort
    + ControlHardware
{
}

impl<T> ActiveHardware for T where
    T: PinPort
        + SemaphorePort
        + RngPort
        + StoragePort
        + ConfigPort
        + PeripheralPort
        + SensorControlPort
        + GnssPort
        + AudioPort
        + ControlHardware
{
}

/// The full board as seen by [`ModeService`](super::service::ModeService).
pub trait DeviceHardware: ActiveHardware + UsbPort {}

impl<T> DeviceHardware for T where T: ActiveHardware + UsbPort {}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No configuration file on the card.
    NotFound,
    /// File present but unparseable.
    Corrupted,
    /// A value failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the filesystem.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
