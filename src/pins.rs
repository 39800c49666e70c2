//! GPIO assignments for the logger main board.
//!
//! Single source of truth for every pin the mode core drives directly.
//! Sensor buses (SPI, I2C, UART) belong to their subsystem drivers and are
//! not listed here.

use core::fmt;

// ---------------------------------------------------------------------------
// Charger (BQ2407x current-limit select)
// ---------------------------------------------------------------------------

/// Charge current select, low bit.
pub const CHG_EN_LO_GPIO: i32 = 38;
/// Charge current select, high bit.
pub const CHG_EN_HI_GPIO: i32 = 39;

// ---------------------------------------------------------------------------
// Power rails
// ---------------------------------------------------------------------------

/// GNSS module SAFEBOOT_N. Must be HIGH before VCC comes up or the
/// receiver boots into its safe-boot loader.
pub const GNSS_SAFEBOOT_N_GPIO: i32 = 40;
/// Switched VCC rail feeding the microSD card and every sensor.
pub const VCC_EN_GPIO: i32 = 41;

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// microSD chip select (active LOW, idles HIGH).
pub const MMC_NCS_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// Analog front-end enables
// ---------------------------------------------------------------------------

/// Battery voltage divider enable.
pub const VBAT_EN_GPIO: i32 = 4;
/// Microphone bias enable.
pub const MIC_EN_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Status LED (common cathode)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 6;
pub const LED_G_GPIO: i32 = 7;
pub const LED_B_GPIO: i32 = 8;

// ---------------------------------------------------------------------------
// Inputs (sampled by the interrupt layer)
// ---------------------------------------------------------------------------

/// VBUS divider: HIGH while USB power is present.
pub const VBUS_DIV_GPIO: i32 = 2;
/// Front-panel button, active LOW.
pub const BUTTON_GPIO: i32 = 0;

/// Output pins the Active-mode lifecycle drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pin {
    ChargeEnLo,
    ChargeEnHi,
    GnssSafebootN,
    VccEn,
    MmcNcs,
    VbatEn,
    MicEn,
}

impl Pin {
    pub const COUNT: usize = 7;

    /// Every output pin, in table order.
    pub const ALL: [Pin; Pin::COUNT] = [
        Pin::ChargeEnLo,
        Pin::ChargeEnHi,
        Pin::GnssSafebootN,
        Pin::VccEn,
        Pin::MmcNcs,
        Pin::VbatEn,
        Pin::MicEn,
    ];

    /// Board GPIO number.
    pub const fn gpio(self) -> i32 {
        match self {
            Pin::ChargeEnLo => CHG_EN_LO_GPIO,
            Pin::ChargeEnHi => CHG_EN_HI_GPIO,
            Pin::GnssSafebootN => GNSS_SAFEBOOT_N_GPIO,
            Pin::VccEn => VCC_EN_GPIO,
            Pin::MmcNcs => MMC_NCS_GPIO,
            Pin::VbatEn => VBAT_EN_GPIO,
            Pin::MicEn => MIC_EN_GPIO,
        }
    }

    /// Dense index for lookups into [`Pin::ALL`]-sized tables.
    pub const fn as_index(self) -> usize {
        match self {
            Pin::ChargeEnLo => 0,
            Pin::ChargeEnHi => 1,
            Pin::GnssSafebootN => 2,
            Pin::VccEn => 3,
            Pin::MmcNcs => 4,
            Pin::VbatEn => 5,
            Pin::MicEn => 6,
        }
    }

    /// Schematic net name.
    pub const fn name(self) -> &'static str {
        match self {
            Pin::ChargeEnLo => "CHG_EN_LO",
            Pin::ChargeEnHi => "CHG_EN_HI",
            Pin::GnssSafebootN => "GNSS_SAFEBOOT_N",
            Pin::VccEn => "VCC_EN",
            Pin::MmcNcs => "MMC_NCS",
            Pin::VbatEn => "VBAT_EN",
            Pin::MicEn => "MIC_EN",
        }
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (GPIO{})", self.name(), self.gpio())
    }
}
