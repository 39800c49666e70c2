//! Device configuration and fixed timing parameters.
//!
//! [`DeviceConfig`] is the read-only capability snapshot loaded from
//! `/config.txt` at every Active-mode entry.  The core consults it at each
//! lifecycle and routing decision but never mutates it.

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

/// Path of the configuration file on the microSD card.
pub const CONFIG_PATH: &str = "/config.txt";

/// How long the button must be held to toggle Active mode.
pub const HOLD_DURATION: Duration = Duration::from_millis(1000);

/// How long the indicator stays dark after a GNSS time-lock.
pub const LED_BLINK_DURATION: Duration = Duration::from_millis(900);

/// Ring length of the mode event queue.  One slot separates full from
/// empty, so at most `EVENT_QUEUE_LEN - 1` events can be pending.
pub const EVENT_QUEUE_LEN: usize = 4;

/// Hardware semaphore guarding the random number generator.
pub const RNG_SEMAPHORE_ID: usize = 0;

/// Number of 32-bit words in a session identifier.
pub const SESSION_ID_WORDS: usize = 6;

/// Capability flags read from the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    // --- Audio ---
    /// Audio subsystem enabled.
    pub enable_audio: bool,
    /// Audible tone mode.  Excludes spoken GNSS feedback.
    pub enable_tone: bool,

    // --- Analog front-end ---
    /// Battery voltage sensing.
    pub enable_vbat: bool,
    /// Microphone level sensing.
    pub enable_mic: bool,

    // --- Sensors ---
    pub enable_imu: bool,
    pub enable_gnss: bool,
    pub enable_baro: bool,
    pub enable_hum: bool,
    pub enable_mag: bool,

    // --- Logging ---
    /// Write sensor data to the session log.
    pub enable_logging: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            enable_audio: true,
            enable_tone: true,
            enable_vbat: true,
            enable_mic: false,
            enable_imu: true,
            enable_gnss: true,
            enable_baro: true,
            enable_hum: true,
            enable_mag: true,
            enable_logging: true,
        }
    }
}

impl DeviceConfig {
    /// Everything off.  Lifecycle still powers rails, storage and GNSS init.
    pub const fn minimal() -> Self {
        Self {
            enable_audio: false,
            enable_tone: false,
            enable_vbat: false,
            enable_mic: false,
            enable_imu: false,
            enable_gnss: false,
            enable_baro: false,
            enable_hum: false,
            enable_mag: false,
            enable_logging: false,
        }
    }

    /// Build a config from a 10-bit mask, one bit per flag in declaration
    /// order (bit 0 = audio ... bit 9 = logging).
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            enable_audio: bits & (1 << 0) != 0,
            enable_tone: bits & (1 << 1) != 0,
            enable_vbat: bits & (1 << 2) != 0,
            enable_mic: bits & (1 << 3) != 0,
            enable_imu: bits & (1 << 4) != 0,
            enable_gnss: bits & (1 << 5) != 0,
            enable_baro: bits & (1 << 6) != 0,
            enable_hum: bits & (1 << 7) != 0,
            enable_mag: bits & (1 << 8) != 0,
            enable_logging: bits & (1 << 9) != 0,
        }
    }

    /// Number of distinct flag combinations.
    pub const COMBINATIONS: u16 = 1 << 10;

    /// The ADC is shared by battery and microphone sensing and is brought
    /// up once if either needs it.
    pub const fn needs_analog_front_end(&self) -> bool {
        self.enable_vbat || self.enable_mic
    }

    /// The sensor-polling driver is shared by the barometer, humidity and
    /// magnetometer subsystems.
    pub const fn needs_sensor_polling(&self) -> bool {
        self.enable_baro || self.enable_hum || self.enable_mag
    }

    /// Whether the startup tone is played.
    pub const fn plays_tone(&self) -> bool {
        self.enable_audio && self.enable_tone
    }

    /// GNSS fixes drive audio-control feedback only when audio is on and
    /// tone mode is off.
    pub const fn gnss_audio_feedback(&self) -> bool {
        self.enable_audio && !self.enable_tone
    }
}
