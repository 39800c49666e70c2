//! Device adapter: bridges the board to the domain port traits.
//!
//! Owns the board pins, status LED, timer server and RNG, shares the
//! cross-core semaphore bank, and delegates the externally-driven
//! subsystems to [`Detached`].  This is the one value the firmware hands
//! to [`ModeService`](crate::app::service::ModeService) as its
//! `DeviceHardware`.

use embassy_time::Duration;
use embedded_hal::digital::{OutputPin, PinState};

use crate::adapters::detached::Detached;
use crate::adapters::gpio::BoardPins;
use crate::app::ports::{
    AudioControlPort, AudioPort, ConfigError, ConfigPort, GnssPort, LedColour, LedPort, LogPort,
    PeripheralPort, PinPort, RngClock, RngPort, SemaphorePort, Sensor, SensorControlPort,
    SensorDataPort, StoragePort, TimerId, TimerPort, Tone, UsbPort,
};
use crate::app::session::SessionInfo;
use crate::config::DeviceConfig;
use crate::drivers::hw_semaphore::{HwSemaphore, SEMAPHORE_BANK};
use crate::drivers::rng::HwRng;
use crate::drivers::soft_timer::SoftTimer;
use crate::drivers::status_led::StatusLed;
use crate::error::Result;
use crate::pins::Pin;
use crate::sensors::{BaroData, GnssData, GnssTime, HumData, ImuData, MagData};

/// Concrete adapter that combines all hardware behind port traits.
pub struct DeviceAdapter<P> {
    pins: BoardPins<P>,
    led: StatusLed<P>,
    timers: SoftTimer,
    semaphores: &'static HwSemaphore<SEMAPHORE_BANK>,
    rng: HwRng,
    detached: Detached,
}

impl<P: OutputPin> DeviceAdapter<P> {
    pub fn new(
        pins: BoardPins<P>,
        led: StatusLed<P>,
        timers: SoftTimer,
        semaphores: &'static HwSemaphore<SEMAPHORE_BANK>,
        rng: HwRng,
        detached: Detached,
    ) -> Self {
        Self {
            pins,
            led,
            timers,
            semaphores,
            rng,
            detached,
        }
    }

    /// Timer server, for the periodic tick.
    pub fn timers_mut(&mut self) -> &mut SoftTimer {
        &mut self.timers
    }

    pub fn pins(&self) -> &BoardPins<P> {
        &self.pins
    }

    pub fn led(&self) -> &StatusLed<P> {
        &self.led
    }

    pub fn detached_mut(&mut self) -> &mut Detached {
        &mut self.detached
    }
}

// ── Board ─────────────────────────────────────────────────────

impl<P: OutputPin> PinPort for DeviceAdapter<P> {
    fn write_pin(&mut self, pin: Pin, state: PinState) -> Result<()> {
        self.pins.write_pin(pin, state)
    }

    fn configure_output(&mut self, pin: Pin) -> Result<()> {
        self.pins.configure_output(pin)
    }

    fn release_pin(&mut self, pin: Pin) -> Result<()> {
        self.pins.release_pin(pin)
    }
}

impl<P> SemaphorePort for DeviceAdapter<P> {
    fn sem_lock(&mut self, id: usize) {
        self.semaphores.lock(id);
    }

    fn sem_release(&mut self, id: usize) {
        self.semaphores.release(id);
    }
}

impl<P> RngPort for DeviceAdapter<P> {
    fn rng_init(&mut self) -> Result<()> {
        self.rng.rng_init()
    }

    fn rng_next(&mut self) -> Result<u32> {
        self.rng.rng_next()
    }

    fn rng_deinit(&mut self) -> Result<()> {
        self.rng.rng_deinit()
    }

    fn rng_select_clock(&mut self, clock: RngClock) -> Result<()> {
        self.rng.rng_select_clock(clock)
    }
}

impl<P: OutputPin> LedPort for DeviceAdapter<P> {
    fn set_colour(&mut self, colour: LedColour) {
        self.led.set_colour(colour);
    }

    fn led_on(&mut self) {
        self.led.led_on();
    }

    fn led_off(&mut self) {
        self.led.led_off();
    }
}

impl<P> TimerPort for DeviceAdapter<P> {
    fn timer_create(&mut self, id: TimerId) {
        self.timers.timer_create(id);
    }

    fn timer_delete(&mut self, id: TimerId) {
        self.timers.timer_delete(id);
    }

    fn timer_start(&mut self, id: TimerId, duration: Duration) {
        self.timers.timer_start(id, duration);
    }

    fn timer_stop(&mut self, id: TimerId) {
        self.timers.timer_stop(id);
    }
}

// ── Delegated subsystems ──────────────────────────────────────

impl<P> StoragePort for DeviceAdapter<P> {
    fn init_filesystem(&mut self) -> Result<()> {
        self.detached.init_filesystem()
    }

    fn mount(&mut self) -> Result<()> {
        self.detached.mount()
    }

    fn unmount(&mut self) -> Result<()> {
        self.detached.unmount()
    }

    fn deinit_filesystem(&mut self) -> Result<()> {
        self.detached.deinit_filesystem()
    }

    fn deinit_bus(&mut self) -> Result<()> {
        self.detached.deinit_bus()
    }
}

impl<P> ConfigPort for DeviceAdapter<P> {
    fn load(&mut self, path: &str) -> core::result::Result<DeviceConfig, ConfigError> {
        self.detached.load(path)
    }
}

impl<P> PeripheralPort for DeviceAdapter<P> {
    fn init_adc(&mut self) -> Result<()> {
        self.detached.init_adc()
    }

    fn deinit_adc(&mut self) -> Result<()> {
        self.detached.deinit_adc()
    }

    fn init_uart(&mut self) -> Result<()> {
        self.detached.init_uart()
    }

    fn deinit_uart(&mut self) -> Result<()> {
        self.detached.deinit_uart()
    }
}

impl<P> SensorControlPort for DeviceAdapter<P> {
    fn sensor_start(&mut self, sensor: Sensor) {
        self.detached.sensor_start(sensor);
    }

    fn sensor_stop(&mut self, sensor: Sensor) {
        self.detached.sensor_stop(sensor);
    }
}

impl<P> GnssPort for DeviceAdapter<P> {
    fn gnss_init(&mut self) {
        self.detached.gnss_init();
    }

    fn gnss_start(&mut self) {
        self.detached.gnss_start();
    }

    fn gnss_stop(&mut self) {
        self.detached.gnss_stop();
    }

    fn gnss_deinit(&mut self) {
        self.detached.gnss_deinit();
    }
}

impl<P> AudioPort for DeviceAdapter<P> {
    fn audio_init(&mut self) {
        self.detached.audio_init();
    }

    fn audio_deinit(&mut self) {
        self.detached.audio_deinit();
    }

    fn beep(&mut self, tone: Tone) {
        self.detached.beep(tone);
    }
}

impl<P> AudioControlPort for DeviceAdapter<P> {
    fn audio_control_init(&mut self) {
        self.detached.audio_control_init();
    }

    fn audio_control_deinit(&mut self) {
        self.detached.audio_control_deinit();
    }

    fn audio_control_update(&mut self, data: &GnssData) {
        self.detached.audio_control_update(data);
    }
}

impl<P> LogPort for DeviceAdapter<P> {
    fn log_init(&mut self, session: &SessionInfo) {
        self.detached.log_init(session);
    }

    fn log_deinit(&mut self, session: &SessionInfo) {
        self.detached.log_deinit(session);
    }

    fn write_baro(&mut self, data: &BaroData) {
        self.detached.write_baro(data);
    }

    fn write_hum(&mut self, data: &HumData) {
        self.detached.write_hum(data);
    }

    fn write_mag(&mut self, data: &MagData) {
        self.detached.write_mag(data);
    }

    fn write_gnss(&mut self, data: &GnssData) {
        self.detached.write_gnss(data);
    }

    fn write_gnss_time(&mut self, time: &GnssTime) {
        self.detached.write_gnss_time(time);
    }

    fn write_imu(&mut self, data: &ImuData) {
        self.detached.write_imu(data);
    }
}

impl<P> SensorDataPort for DeviceAdapter<P> {
    fn baro_data(&self) -> BaroData {
        self.detached.baro_data()
    }

    fn hum_data(&self) -> HumData {
        self.detached.hum_data()
    }

    fn mag_data(&self) -> MagData {
        self.detached.mag_data()
    }

    fn gnss_data(&self) -> GnssData {
        self.detached.gnss_data()
    }

    fn gnss_time(&self) -> GnssTime {
        self.detached.gnss_time()
    }

    fn imu_data(&self) -> ImuData {
        self.detached.imu_data()
    }
}

impl<P> UsbPort for DeviceAdapter<P> {
    fn usb_enter(&mut self) -> Result<()> {
        self.detached.usb_enter()
    }

    fn usb_exit(&mut self) -> Result<()> {
        self.detached.usb_exit()
    }
}
