//! Control/session layer.
//!
//! Lives for exactly one Active-mode activation.  [`Controller::init`]
//! lights the indicator and opens the session log, [`Controller::deinit`]
//! closes it and advances the session counter.  In between, every
//! subsystem data-ready notification is routed here:
//!
//! ```text
//!   Baro / Hum / Mag / Imu ──▶ log            (if logging)
//!   Gnss                  ──▶ audio control  (if audio && !tone)
//!                         └─▶ log            (if logging)
//!   GnssTime              ──▶ LED off + arm blink timer
//!                         └─▶ log            (if logging)
//!   blink timer expiry    ──▶ LED on
//! ```
//!
//! No buffering: one notification is one write attempt.

use log::{debug, info};

use crate::app::ports::{ControlHardware, LedColour, TimerId};
use crate::app::session::{Session, SessionInfo};
use crate::config::{DeviceConfig, LED_BLINK_DURATION};
use crate::sensors::DataReady;

/// Indicator colour while a session is running.
pub const ACTIVE_COLOUR: LedColour = LedColour::Green;

/// Running control layer.  Only [`init`](Self::init) builds one and
/// [`deinit`](Self::deinit) consumes it.
#[derive(Debug)]
pub struct Controller {
    config: DeviceConfig,
    session: SessionInfo,
}

impl Controller {
    pub fn init<H: ControlHardware>(hw: &mut H, config: DeviceConfig, session: SessionInfo) -> Self {
        hw.set_colour(ACTIVE_COLOUR);
        hw.led_on();
        hw.timer_create(TimerId::LedBlink);

        if config.enable_audio {
            hw.audio_control_init();
        }
        if config.enable_logging {
            hw.log_init(&session);
        }

        info!(
            "control: session #{} ({}) opened, logging={}",
            session.counter, session.id, config.enable_logging
        );
        Self { config, session }
    }

    /// Tear down and advance the session counter.  Returns the identity of
    /// the session that just closed.
    pub fn deinit<H: ControlHardware>(self, hw: &mut H, session: &mut Session) -> SessionInfo {
        hw.timer_delete(TimerId::LedBlink);
        hw.led_off();

        if self.config.enable_audio {
            hw.audio_control_deinit();
        }
        if self.config.enable_logging {
            hw.log_deinit(&self.session);
        }

        session.advance();
        info!(
            "control: session #{} closed, next #{}",
            self.session.counter,
            session.counter()
        );
        self.session
    }

    pub const fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub const fn session(&self) -> &SessionInfo {
        &self.session
    }

    /// Route one data-ready notification.
    pub fn on_data_ready<H: ControlHardware>(&self, hw: &mut H, kind: DataReady) {
        let logging = self.config.enable_logging;
        match kind {
            DataReady::Baro => {
                if logging {
                    hw.write_baro(&hw.baro_data());
                }
            }
            DataReady::Hum => {
                if logging {
                    hw.write_hum(&hw.hum_data());
                }
            }
            DataReady::Mag => {
                if logging {
                    hw.write_mag(&hw.mag_data());
                }
            }
            DataReady::Imu => {
                if logging {
                    hw.write_imu(&hw.imu_data());
                }
            }
            DataReady::Gnss => {
                let data = hw.gnss_data();
                if self.config.gnss_audio_feedback() {
                    hw.audio_control_update(&data);
                }
                if logging {
                    hw.write_gnss(&data);
                }
            }
            DataReady::GnssTime => {
                hw.led_off();
                hw.timer_start(TimerId::LedBlink, LED_BLINK_DURATION);
                debug!("control: time lock, blink");
                if logging {
                    hw.write_gnss_time(&hw.gnss_time());
                }
            }
        }
    }

    /// Blink timer expiry: end of the dark period.
    pub fn on_led_timer<H: ControlHardware>(&self, hw: &mut H) {
        hw.led_on();
    }
}
