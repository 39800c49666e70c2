//! Stand-ins for subsystems whose drivers live outside this crate.
//!
//! The card filesystem, sensor drivers, audio, session log writer and
//! USB mass-storage stack are separate components.  Until they are wired
//! in, [`Detached`] answers their ports: it keeps just enough state to
//! reject out-of-order calls (mount before filesystem init, config read
//! from an unmounted card, deinit of a peripheral that never came up) and
//! logs everything else.
//!
//! No sensor driver feeds it, so every snapshot reads as zeroes.

use log::{debug, info};

use crate::app::ports::{
    AudioControlPort, AudioPort, ConfigError, ConfigPort, GnssPort, LogPort, PeripheralPort,
    Sensor, SensorControlPort, SensorDataPort, StoragePort, Tone, UsbPort,
};
use crate::app::session::SessionInfo;
use crate::config::DeviceConfig;
use crate::error::{Error, Peripheral, Result, StorageOp, UsbOp};
use crate::sensors::{BaroData, GnssData, GnssTime, HumData, ImuData, MagData};

#[derive(Debug, Default)]
pub struct Detached {
    config: DeviceConfig,
    fs_ready: bool,
    mounted: bool,
    adc_up: bool,
    uart_up: bool,
    usb_attached: bool,
}

impl Detached {
    /// `config` is what the card would contain.
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl StoragePort for Detached {
    fn init_filesystem(&mut self) -> Result<()> {
        self.fs_ready = true;
        Ok(())
    }

    fn mount(&mut self) -> Result<()> {
        if !self.fs_ready {
            return Err(Error::Storage(StorageOp::Mount));
        }
        self.mounted = true;
        info!("storage: mounted 0:/");
        Ok(())
    }

    fn unmount(&mut self) -> Result<()> {
        if !self.mounted {
            return Err(Error::Storage(StorageOp::Unmount));
        }
        self.mounted = false;
        Ok(())
    }

    fn deinit_filesystem(&mut self) -> Result<()> {
        if self.mounted {
            return Err(Error::Storage(StorageOp::Deinit));
        }
        self.fs_ready = false;
        Ok(())
    }

    fn deinit_bus(&mut self) -> Result<()> {
        if self.fs_ready {
            return Err(Error::Storage(StorageOp::BusDeinit));
        }
        Ok(())
    }
}

impl ConfigPort for Detached {
    fn load(&mut self, path: &str) -> core::result::Result<DeviceConfig, ConfigError> {
        if !self.mounted {
            return Err(ConfigError::IoError);
        }
        debug!("config: {path} served from defaults");
        Ok(self.config)
    }
}

impl PeripheralPort for Detached {
    fn init_adc(&mut self) -> Result<()> {
        if self.adc_up {
            return Err(Error::Peripheral(Peripheral::AdcInit));
        }
        self.adc_up = true;
        Ok(())
    }

    fn deinit_adc(&mut self) -> Result<()> {
        if !self.adc_up {
            return Err(Error::Peripheral(Peripheral::AdcDeinit));
        }
        self.adc_up = false;
        Ok(())
    }

    fn init_uart(&mut self) -> Result<()> {
        if self.uart_up {
            return Err(Error::Peripheral(Peripheral::UartInit));
        }
        self.uart_up = true;
        Ok(())
    }

    fn deinit_uart(&mut self) -> Result<()> {
        if !self.uart_up {
            return Err(Error::Peripheral(Peripheral::UartDeinit));
        }
        self.uart_up = false;
        Ok(())
    }
}

impl SensorControlPort for Detached {
    fn sensor_start(&mut self, sensor: Sensor) {
        debug!("sensor: {sensor:?} start");
    }

    fn sensor_stop(&mut self, sensor: Sensor) {
        debug!("sensor: {sensor:?} stop");
    }
}

impl GnssPort for Detached {
    fn gnss_init(&mut self) {
        debug!("gnss: init");
    }
    fn gnss_start(&mut self) {
        debug!("gnss: start");
    }
    fn gnss_stop(&mut self) {
        debug!("gnss: sleep");
    }
    fn gnss_deinit(&mut self) {
        debug!("gnss: deinit");
    }
}

impl AudioPort for Detached {
    fn audio_init(&mut self) {
        debug!("audio: init");
    }
    fn audio_deinit(&mut self) {
        debug!("audio: deinit");
    }
    fn beep(&mut self, tone: Tone) {
        debug!("audio: tone {}..{} Hz", tone.start_hz, tone.end_hz);
    }
}

impl AudioControlPort for Detached {
    fn audio_control_init(&mut self) {}
    fn audio_control_deinit(&mut self) {}
    fn audio_control_update(&mut self, data: &GnssData) {
        debug!("audio control: fix with {} sv", data.num_sv);
    }
}

impl LogPort for Detached {
    fn log_init(&mut self, session: &SessionInfo) {
        info!("log: open session #{} {}", session.counter, session.id.to_hex());
    }
    fn log_deinit(&mut self, session: &SessionInfo) {
        info!("log: close session #{}", session.counter);
    }
    fn write_baro(&mut self, _data: &BaroData) {}
    fn write_hum(&mut self, _data: &HumData) {}
    fn write_mag(&mut self, _data: &MagData) {}
    fn write_gnss(&mut self, _data: &GnssData) {}
    fn write_gnss_time(&mut self, _time: &GnssTime) {}
    fn write_imu(&mut self, _data: &ImuData) {}
}

impl SensorDataPort for Detached {
    fn baro_data(&self) -> BaroData {
        BaroData::default()
    }
    fn hum_data(&self) -> HumData {
        HumData::default()
    }
    fn mag_data(&self) -> MagData {
        MagData::default()
    }
    fn gnss_data(&self) -> GnssData {
        GnssData::default()
    }
    fn gnss_time(&self) -> GnssTime {
        GnssTime::default()
    }
    fn imu_data(&self) -> ImuData {
        ImuData::default()
    }
}

impl UsbPort for Detached {
    fn usb_enter(&mut self) -> Result<()> {
        if self.usb_attached {
            return Err(Error::Usb(UsbOp::Enter));
        }
        self.usb_attached = true;
        Ok(())
    }

    fn usb_exit(&mut self) -> Result<()> {
        if !self.usb_attached {
            return Err(Error::Usb(UsbOp::Exit));
        }
        self.usb_attached = false;
        Ok(())
    }
}
