//! Active-mode lifecycle ordering against the recording mock.

use embedded_hal::digital::PinState;

use skylog::app::lifecycle::{ActiveSession, enter_active, exit_active};
use skylog::app::ports::{LedColour, RngClock, Sensor, TimerId, Tone};
use skylog::app::session::Session;
use skylog::config::{DeviceConfig, RNG_SEMAPHORE_ID};
use skylog::error::{Error, Peripheral, RngOp};
use skylog::pins::Pin;

use crate::mock_hw::{Call, MockHardware};

/// Physical resource a call acts on.  RNG, semaphore and config reads
/// have no teardown counterpart and map to `None`.
fn resource(call: &Call) -> Option<&'static str> {
    Some(match call {
        Call::WritePin(pin, _) | Call::ConfigureOutput(pin) | Call::ReleasePin(pin) => pin.name(),
        Call::InitFilesystem | Call::DeinitFilesystem | Call::DeinitBus => "filesystem",
        Call::Mount | Call::Unmount => "mount",
        Call::InitAdc | Call::DeinitAdc => "adc",
        Call::InitUart | Call::DeinitUart => "uart",
        Call::SensorStart(s) | Call::SensorStop(s) => match s {
            Sensor::Imu => "imu",
            Sensor::Baro => "baro",
            Sensor::Hum => "hum",
            Sensor::Mag => "mag",
            Sensor::Poller => "poller",
        },
        Call::GnssInit | Call::GnssStart | Call::GnssStop | Call::GnssDeinit => "gnss",
        Call::AudioInit | Call::AudioDeinit | Call::Beep(_) => "audio",
        Call::SetColour(_)
        | Call::LedOn
        | Call::LedOff
        | Call::TimerCreate(TimerId::LedBlink)
        | Call::TimerDelete(TimerId::LedBlink)
        | Call::AudioControlInit
        | Call::AudioControlDeinit
        | Call::LogInit(_)
        | Call::LogDeinit(_) => "control",
        _ => return None,
    })
}

fn resources(calls: &[Call]) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = calls.iter().filter_map(resource).collect();
    out.dedup();
    out
}

fn enter(config: DeviceConfig) -> (MockHardware, Session, ActiveSession) {
    let mut hw = MockHardware::with_config(config);
    let mut session = Session::new();
    let active = enter_active(&mut hw, &mut session).expect("enter");
    (hw, session, active)
}

// ── Round trip ────────────────────────────────────────────────

#[test]
fn teardown_mirrors_setup_for_every_flag_combination() {
    for bits in 0..DeviceConfig::COMBINATIONS {
        let config = DeviceConfig::from_bits(bits);
        let (mut hw, mut session, active) = enter(config);
        let setup = resources(&hw.calls);
        hw.clear();

        exit_active(active, &mut hw, &mut session).expect("exit");
        let teardown = resources(&hw.calls);

        let mut expected = setup.clone();
        expected.reverse();
        assert_eq!(teardown, expected, "config {config:?}");
        assert_eq!(session.counter(), 1);
    }
}

#[test]
fn shared_drivers_start_once_after_their_users() {
    for bits in 0..DeviceConfig::COMBINATIONS {
        let config = DeviceConfig::from_bits(bits);
        let (hw, _, _active) = enter(config);

        let adc = hw.count(Call::InitAdc);
        assert_eq!(adc, usize::from(config.needs_analog_front_end()));
        if adc == 1 {
            let at = hw.position(Call::InitAdc).unwrap();
            for pin in [Pin::VbatEn, Pin::MicEn] {
                if let Some(p) = hw.position(Call::WritePin(pin, PinState::High)) {
                    assert!(p < at, "{pin} enabled after ADC init");
                }
            }
        }

        let poller = hw.count(Call::SensorStart(Sensor::Poller));
        assert_eq!(poller, usize::from(config.needs_sensor_polling()));
        if poller == 1 {
            assert_eq!(hw.calls.last(), Some(&Call::SensorStart(Sensor::Poller)));
        }
    }
}

// ── Entry order ───────────────────────────────────────────────

#[test]
fn entry_sequence_with_everything_enabled() {
    let mut config = DeviceConfig::from_bits(DeviceConfig::COMBINATIONS - 1);
    config.enable_tone = false;
    let (hw, _, _active) = enter(config);

    let rng = RNG_SEMAPHORE_ID;
    let mut expected = vec![Call::SemLock(rng), Call::RngInit];
    expected.extend([Call::RngNext; 6]);
    expected.extend([
        Call::RngDeinit,
        Call::RngClock(RngClock::Clk48),
        Call::SemRelease(rng),
        Call::WritePin(Pin::ChargeEnLo, PinState::Low),
        Call::WritePin(Pin::ChargeEnHi, PinState::High),
        Call::WritePin(Pin::GnssSafebootN, PinState::High),
        Call::WritePin(Pin::VccEn, PinState::High),
        Call::WritePin(Pin::MmcNcs, PinState::High),
        Call::ConfigureOutput(Pin::MmcNcs),
        Call::InitFilesystem,
        Call::Mount,
        Call::LoadConfig,
        Call::SetColour(LedColour::Green),
        Call::LedOn,
        Call::TimerCreate(TimerId::LedBlink),
        Call::AudioControlInit,
        Call::LogInit(0),
        Call::AudioInit,
        Call::WritePin(Pin::VbatEn, PinState::High),
        Call::WritePin(Pin::MicEn, PinState::High),
        Call::InitAdc,
        Call::SensorStart(Sensor::Imu),
        Call::InitUart,
        Call::GnssInit,
        Call::GnssStart,
        Call::SensorStart(Sensor::Baro),
        Call::SensorStart(Sensor::Hum),
        Call::SensorStart(Sensor::Mag),
        Call::SensorStart(Sensor::Poller),
    ]);
    assert_eq!(hw.calls, expected);
}

#[test]
fn exit_sequence_with_everything_enabled() {
    let config = DeviceConfig::from_bits(DeviceConfig::COMBINATIONS - 1);
    let (mut hw, mut session, active) = enter(config);
    hw.clear();
    let closed = exit_active(active, &mut hw, &mut session).unwrap();

    assert_eq!(closed.counter, 0);
    assert_eq!(
        hw.calls,
        vec![
            Call::SensorStop(Sensor::Poller),
            Call::SensorStop(Sensor::Mag),
            Call::SensorStop(Sensor::Hum),
            Call::SensorStop(Sensor::Baro),
            Call::GnssDeinit,
            Call::DeinitUart,
            Call::SensorStop(Sensor::Imu),
            Call::DeinitAdc,
            Call::WritePin(Pin::MicEn, PinState::Low),
            Call::WritePin(Pin::VbatEn, PinState::Low),
            Call::AudioDeinit,
            Call::TimerDelete(TimerId::LedBlink),
            Call::LedOff,
            Call::AudioControlDeinit,
            Call::LogDeinit(0),
            Call::Unmount,
            Call::DeinitFilesystem,
            Call::DeinitBus,
            Call::ReleasePin(Pin::MmcNcs),
            Call::WritePin(Pin::VccEn, PinState::Low),
            Call::WritePin(Pin::GnssSafebootN, PinState::Low),
            Call::WritePin(Pin::ChargeEnHi, PinState::High),
            Call::WritePin(Pin::ChargeEnLo, PinState::High),
        ]
    );
}

#[test]
fn tone_plays_only_in_tone_mode() {
    for (audio, tone, beeps) in [(true, true, 1), (true, false, 0), (false, true, 0)] {
        let mut config = DeviceConfig::minimal();
        config.enable_audio = audio;
        config.enable_tone = tone;
        let (hw, _, _active) = enter(config);
        assert_eq!(hw.count(Call::Beep(Tone::ACTIVE)), beeps, "audio={audio} tone={tone}");
    }
}

#[test]
fn gnss_is_initialised_then_put_to_sleep_when_disabled() {
    let (hw, _, _active) = enter(DeviceConfig::minimal());
    let init = hw.position(Call::GnssInit).unwrap();
    let stop = hw.position(Call::GnssStop).unwrap();
    assert!(init < stop);
    assert_eq!(hw.count(Call::GnssStart), 0);
    assert_eq!(hw.count(Call::InitUart), 1, "UART comes up regardless");
}

// ── Failures ──────────────────────────────────────────────────

#[test]
fn rng_failure_releases_the_semaphore() {
    let mut hw = MockHardware::new();
    hw.fail_on = Some(Call::RngNext);
    let mut session = Session::new();

    let err = enter_active(&mut hw, &mut session).unwrap_err();
    assert_eq!(err, Error::Rng(RngOp::Generate));
    assert_eq!(hw.calls.last(), Some(&Call::SemRelease(RNG_SEMAPHORE_ID)));
    assert_eq!(hw.count(Call::WritePin(Pin::ChargeEnLo, PinState::Low)), 0);
}

#[test]
fn deinit_failure_during_exit_is_fatal() {
    let (mut hw, mut session, active) = enter(DeviceConfig::default());
    hw.fail_on = Some(Call::DeinitAdc);
    let err = exit_active(active, &mut hw, &mut session).unwrap_err();
    assert_eq!(err, Error::Peripheral(Peripheral::AdcDeinit));
    assert_eq!(hw.count(Call::Unmount), 0);
}

#[test]
fn pin_failure_names_the_pin() {
    let mut hw = MockHardware::new();
    hw.fail_on = Some(Call::WritePin(Pin::VccEn, PinState::High));
    let mut session = Session::new();
    assert_eq!(
        enter_active(&mut hw, &mut session).unwrap_err(),
        Error::Gpio(Pin::VccEn)
    );
    assert_eq!(hw.count(Call::InitFilesystem), 0);
}
