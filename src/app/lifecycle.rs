//! Active-mode and USB-mode lifecycles.
//!
//! Entering Active mode brings the board up in a fixed order; leaving it
//! tears everything down in exactly the reverse order.
//!
//! ```text
//!  enter_active                              exit_active
//!  ─────────────────────────────             ─────────────────────────────
//!  session id (RNG, once per boot)
//!  CHG_EN_LO low, CHG_EN_HI high    ◀──────▶ CHG_EN_HI high, CHG_EN_LO high
//!  GNSS_SAFEBOOT_N high             ◀──────▶ GNSS_SAFEBOOT_N low
//!  VCC_EN high                      ◀──────▶ VCC_EN low
//!  MMC_NCS high + output            ◀──────▶ MMC_NCS released
//!  filesystem init                  ◀──────▶ filesystem deinit + SPI deinit
//!  mount                            ◀──────▶ unmount
//!  load /config.txt
//!  control init                     ◀──────▶ control deinit (counter += 1)
//!  audio init, tone                 ◀──────▶ audio deinit
//!  VBAT_EN high                     ◀──────▶ VBAT_EN low
//!  MIC_EN high                      ◀──────▶ MIC_EN low
//!  ADC init (vbat || mic)           ◀──────▶ ADC deinit
//!  IMU start                        ◀──────▶ IMU stop
//!  UART init                        ◀──────▶ UART deinit
//!  GNSS init, start | stop          ◀──────▶ GNSS deinit
//!  baro, hum, mag start             ◀──────▶ mag, hum, baro stop
//!  sensor poller (baro||hum||mag)   ◀──────▶ sensor poller stop
//! ```
//!
//! Shared drivers (ADC, sensor poller) start only after every subsystem
//! that uses them has made its enable decision, and start once.
//!
//! Every HAL error is fatal and returned as-is.  There is no rollback: a
//! failure part-way through leaves the board as it is and the caller
//! halts.
//!
//! [`ActiveSession`] and [`UsbSession`] can only be built by their enter
//! functions and are consumed by the matching exit, so an exit can never
//! run without its entry.

use embedded_hal::digital::PinState;
use log::info;

use crate::app::control::Controller;
use crate::app::ports::{ActiveHardware, Sensor, Tone, UsbPort};
use crate::app::session::{Session, SessionInfo};
use crate::config::{CONFIG_PATH, DeviceConfig};
use crate::error::Result;
use crate::pins::Pin;

/// Proof that Active mode is up.  Holds the configuration snapshot that
/// was loaded on entry; teardown decisions use the same snapshot.
#[derive(Debug)]
#[must_use = "dropping an ActiveSession leaves the board powered; pass it to exit_active"]
pub struct ActiveSession {
    controller: Controller,
}

impl ActiveSession {
    pub const fn config(&self) -> &DeviceConfig {
        self.controller.config()
    }

    pub const fn info(&self) -> &SessionInfo {
        self.controller.session()
    }

    pub const fn controller(&self) -> &Controller {
        &self.controller
    }
}

/// Proof that USB mode is up.
#[derive(Debug)]
#[must_use = "pass the UsbSession to exit_usb"]
pub struct UsbSession {
    _private: (),
}

/// Bring the board up for a logging session.
pub fn enter_active<H: ActiveHardware>(
    hw: &mut H,
    session: &mut Session,
) -> Result<ActiveSession> {
    session.ensure_id(hw)?;

    // Power and charge control.
    hw.write_pin(Pin::ChargeEnLo, PinState::Low)?;
    hw.write_pin(Pin::ChargeEnHi, PinState::High)?;
    hw.write_pin(Pin::GnssSafebootN, PinState::High)?;
    hw.write_pin(Pin::VccEn, PinState::High)?;

    // Card chip-select idles high before the pin becomes an output.
    hw.write_pin(Pin::MmcNcs, PinState::High)?;
    hw.configure_output(Pin::MmcNcs)?;

    hw.init_filesystem()?;
    hw.mount()?;

    let config = hw.load(CONFIG_PATH)?;
    info!("active: config {config:?}");

    let controller = Controller::init(hw, config, session.info()?);

    if config.enable_audio {
        hw.audio_init();
    }
    if config.plays_tone() {
        hw.beep(Tone::ACTIVE);
    }
    if config.enable_vbat {
        hw.write_pin(Pin::VbatEn, PinState::High)?;
    }
    if config.enable_mic {
        hw.write_pin(Pin::MicEn, PinState::High)?;
    }
    if config.needs_analog_front_end() {
        hw.init_adc()?;
    }
    if config.enable_imu {
        hw.sensor_start(Sensor::Imu);
    }

    hw.init_uart()?;

    hw.gnss_init();
    if config.enable_gnss {
        hw.gnss_start();
    } else {
        hw.gnss_stop();
    }

    if config.enable_baro {
        hw.sensor_start(Sensor::Baro);
    }
    if config.enable_hum {
        hw.sensor_start(Sensor::Hum);
    }
    if config.enable_mag {
        hw.sensor_start(Sensor::Mag);
    }
    if config.needs_sensor_polling() {
        hw.sensor_start(Sensor::Poller);
    }

    info!("active: up");
    Ok(ActiveSession { controller })
}

/// Tear the board down.  Returns the identity of the session that closed.
pub fn exit_active<H: ActiveHardware>(
    active: ActiveSession,
    hw: &mut H,
    session: &mut Session,
) -> Result<SessionInfo> {
    let config = *active.config();

    if config.needs_sensor_polling() {
        hw.sensor_stop(Sensor::Poller);
    }
    if config.enable_mag {
        hw.sensor_stop(Sensor::Mag);
    }
    if config.enable_hum {
        hw.sensor_stop(Sensor::Hum);
    }
    if config.enable_baro {
        hw.sensor_stop(Sensor::Baro);
    }

    hw.gnss_deinit();
    hw.deinit_uart()?;

    if config.enable_imu {
        hw.sensor_stop(Sensor::Imu);
    }
    if config.needs_analog_front_end() {
        hw.deinit_adc()?;
    }
    if config.enable_mic {
        hw.write_pin(Pin::MicEn, PinState::Low)?;
    }
    if config.enable_vbat {
        hw.write_pin(Pin::VbatEn, PinState::Low)?;
    }
    if config.enable_audio {
        hw.audio_deinit();
    }

    let closed = active.controller.deinit(hw, session);

    hw.unmount()?;
    hw.deinit_filesystem()?;
    hw.deinit_bus()?;
    hw.release_pin(Pin::MmcNcs)?;

    hw.write_pin(Pin::VccEn, PinState::Low)?;
    hw.write_pin(Pin::GnssSafebootN, PinState::Low)?;

    // Charging back under hardware control.
    hw.write_pin(Pin::ChargeEnHi, PinState::High)?;
    hw.write_pin(Pin::ChargeEnLo, PinState::High)?;

    info!("active: down");
    Ok(closed)
}

/// Hand the card to the USB host.
pub fn enter_usb<H: UsbPort>(hw: &mut H) -> Result<UsbSession> {
    hw.usb_enter()?;
    info!("usb: up");
    Ok(UsbSession { _private: () })
}

pub fn exit_usb<H: UsbPort>(usb: UsbSession, hw: &mut H) -> Result<()> {
    let UsbSession { _private: () } = usb;
    hw.usb_exit()?;
    info!("usb: down");
    Ok(())
}
