//! Data-ready routing and LED blink behaviour of the control layer.

use skylog::app::ports::{LedColour, TimerId};
use skylog::config::DeviceConfig;
use skylog::events::Event;
use skylog::fsm::Mode;
use skylog::sensors::DataReady;

use crate::mock_hw::Call;
use crate::rig::Rig;

fn active_with(config: DeviceConfig) -> Rig {
    let mut rig = Rig::boot_with(false, config);
    rig.long_press().expect("enter active");
    assert_eq!(rig.mode(), Mode::Active);
    rig.hw.clear();
    rig
}

fn route(rig: &mut Rig, kind: DataReady) {
    rig.svc.on_data_ready(&mut rig.hw, kind);
}

// ── Routing ───────────────────────────────────────────────────

#[test]
fn each_notification_is_one_log_write_when_logging() {
    let mut rig = active_with(DeviceConfig::default());
    let expected = [
        (DataReady::Baro, Call::WriteBaro),
        (DataReady::Hum, Call::WriteHum),
        (DataReady::Mag, Call::WriteMag),
        (DataReady::Imu, Call::WriteImu),
        (DataReady::Gnss, Call::WriteGnss),
        (DataReady::GnssTime, Call::WriteGnssTime),
    ];
    for (kind, write) in expected {
        rig.hw.clear();
        route(&mut rig, kind);
        assert_eq!(rig.hw.log_writes(), 1, "{kind:?}");
        assert_eq!(rig.hw.count(write), 1, "{kind:?}");
    }
}

#[test]
fn logging_disabled_writes_nothing() {
    let mut config = DeviceConfig::default();
    config.enable_logging = false;
    let mut rig = active_with(config);

    for kind in DataReady::ALL {
        route(&mut rig, kind);
    }
    assert_eq!(rig.hw.log_writes(), 0);
    // The time-lock blink is not gated on logging.
    assert_eq!(rig.hw.count(Call::TimerStart(TimerId::LedBlink, 900)), 1);
}

#[test]
fn gnss_feeds_audio_control_only_without_tone() {
    for (audio, tone, updates) in [(true, false, 1), (true, true, 0), (false, false, 0)] {
        let mut config = DeviceConfig::default();
        config.enable_audio = audio;
        config.enable_tone = tone;
        let mut rig = active_with(config);

        route(&mut rig, DataReady::Gnss);
        assert_eq!(
            rig.hw.count(Call::AudioControlUpdate),
            updates,
            "audio={audio} tone={tone}"
        );
        assert_eq!(rig.hw.count(Call::WriteGnss), 1);
    }
}

#[test]
fn gnss_audio_update_precedes_log_write() {
    let mut config = DeviceConfig::default();
    config.enable_tone = false;
    let mut rig = active_with(config);

    route(&mut rig, DataReady::Gnss);
    assert_eq!(rig.hw.calls, vec![Call::AudioControlUpdate, Call::WriteGnss]);
}

// ── LED blink ─────────────────────────────────────────────────

#[test]
fn time_lock_blinks_the_indicator() {
    let mut rig = active_with(DeviceConfig::default());

    route(&mut rig, DataReady::GnssTime);
    assert_eq!(
        rig.hw.calls,
        vec![
            Call::LedOff,
            Call::TimerStart(TimerId::LedBlink, 900),
            Call::WriteGnssTime,
        ]
    );

    rig.hw.clear();
    rig.svc.on_timer(TimerId::LedBlink, &rig.queue, &mut rig.hw);
    assert_eq!(rig.hw.calls, vec![Call::LedOn]);
    assert!(rig.queue.is_empty());
}

#[test]
fn repeated_time_lock_restarts_the_blink() {
    let mut rig = active_with(DeviceConfig::minimal());
    route(&mut rig, DataReady::GnssTime);
    route(&mut rig, DataReady::GnssTime);
    assert_eq!(rig.hw.count(Call::TimerStart(TimerId::LedBlink, 900)), 2);
    assert_eq!(rig.hw.count(Call::LedOn), 0);
}

#[test]
fn hold_expiry_becomes_a_mode_event() {
    let mut rig = active_with(DeviceConfig::default());
    rig.svc.on_timer(TimerId::Hold, &rig.queue, &mut rig.hw);
    assert!(rig.hw.calls.is_empty());
    assert_eq!(rig.queue.pop(), Some(Event::TimerExpired));
}

// ── Outside Active ────────────────────────────────────────────

#[test]
fn notifications_are_ignored_outside_active() {
    for vbus in [false, true] {
        let mut rig = Rig::boot(vbus);
        rig.update().unwrap();
        rig.hw.clear();

        for kind in DataReady::ALL {
            route(&mut rig, kind);
        }
        rig.svc.on_led_timer(&mut rig.hw);
        assert!(rig.hw.calls.is_empty(), "mode {:?}", rig.mode());
    }
}

#[test]
fn notifications_stop_after_exit() {
    let mut rig = active_with(DeviceConfig::default());
    rig.long_press().unwrap();
    assert_eq!(rig.mode(), Mode::Sleep);
    rig.hw.clear();

    route(&mut rig, DataReady::Baro);
    assert_eq!(rig.hw.log_writes(), 0);
}

// ── Session log ───────────────────────────────────────────────

#[test]
fn log_opens_and_closes_with_the_session_counter() {
    let mut rig = Rig::boot(false);
    rig.long_press().unwrap();
    rig.long_press().unwrap();
    rig.long_press().unwrap();

    let log: Vec<_> = rig
        .hw
        .calls
        .iter()
        .filter(|c| matches!(c, Call::LogInit(_) | Call::LogDeinit(_)))
        .copied()
        .collect();
    assert_eq!(log, vec![Call::LogInit(0), Call::LogDeinit(0), Call::LogInit(1)]);
}

#[test]
fn indicator_is_green_while_active_and_dark_after() {
    let mut rig = Rig::boot(false);
    rig.long_press().unwrap();
    assert_eq!(rig.hw.count(Call::SetColour(LedColour::Green)), 1);
    assert_eq!(rig.hw.count(Call::LedOn), 1);

    rig.long_press().unwrap();
    assert_eq!(rig.hw.count(Call::LedOff), 1);
    assert_eq!(rig.hw.count(Call::TimerDelete(TimerId::LedBlink)), 1);
}
