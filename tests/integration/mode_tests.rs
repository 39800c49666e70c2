//! Mode state machine scenarios driven through the full service.

use skylog::app::events::AppEvent;
use skylog::app::ports::{ConfigError, TimerId};
use skylog::config::{DeviceConfig, EVENT_QUEUE_LEN};
use skylog::error::{Error, StorageOp, UsbOp};
use skylog::events::Event;
use skylog::fsm::Mode;

use crate::mock_hw::Call;
use crate::rig::Rig;

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_creates_hold_timer_and_reports() {
    let rig = Rig::boot(false);
    assert_eq!(rig.mode(), Mode::Sleep);
    assert_eq!(rig.hw.calls, vec![Call::TimerCreate(TimerId::Hold)]);
    assert_eq!(rig.sink.events, vec![AppEvent::Booted { vbus_high: false }]);
    assert!(rig.queue.is_empty());
}

#[test]
fn empty_queue_performs_no_transitions() {
    let mut rig = Rig::boot(false);
    rig.hw.clear();
    assert_eq!(rig.update(), Ok(0));
    assert!(rig.hw.calls.is_empty());
    assert_eq!(rig.svc.transitions(), 0);
}

// ── Scenario 1: tap ───────────────────────────────────────────

#[test]
fn short_tap_in_sleep_changes_nothing() {
    let mut rig = Rig::boot(false);
    rig.deliver(Event::ButtonPressed).unwrap();
    rig.deliver(Event::ButtonReleased).unwrap();

    assert_eq!(rig.mode(), Mode::Sleep);
    assert_eq!(
        rig.hw.calls,
        vec![
            Call::TimerCreate(TimerId::Hold),
            Call::TimerStart(TimerId::Hold, 1000),
            Call::TimerStop(TimerId::Hold),
        ]
    );
    assert!(rig.hw.lifecycle_calls().is_empty());
}

#[test]
fn release_without_press_only_cancels() {
    for start_active in [false, true] {
        let mut rig = Rig::boot(false);
        if start_active {
            rig.long_press().unwrap();
        }
        let mode = rig.mode();
        rig.hw.clear();

        rig.deliver(Event::ButtonReleased).unwrap();
        assert_eq!(rig.mode(), mode);
        assert_eq!(rig.hw.calls, vec![Call::TimerStop(TimerId::Hold)]);
    }
}

// ── Scenario 2: long press enters Active ──────────────────────

#[test]
fn hold_expiry_in_sleep_enters_active_once() {
    let mut rig = Rig::boot(false);
    rig.deliver(Event::ButtonPressed).unwrap();
    rig.deliver(Event::TimerExpired).unwrap();

    assert_eq!(rig.mode(), Mode::Active);
    assert_eq!(rig.hw.count(Call::Mount), 1);
    assert_eq!(rig.hw.count(Call::LoadConfig), 1);
    assert!(rig.svc.active().is_some());
    assert!(rig.sink.events.contains(&AppEvent::ModeChanged {
        from: Mode::Sleep,
        to: Mode::Active
    }));
}

// ── Scenario 3: long press exits Active ───────────────────────

#[test]
fn hold_expiry_in_active_exits_once_and_advances_counter() {
    let mut rig = Rig::boot(false);
    rig.long_press().unwrap();
    assert_eq!(rig.svc.session().counter(), 0);

    rig.deliver(Event::ButtonPressed).unwrap();
    rig.deliver(Event::TimerExpired).unwrap();

    assert_eq!(rig.mode(), Mode::Sleep);
    assert_eq!(rig.hw.count(Call::Unmount), 1);
    assert_eq!(rig.svc.session().counter(), 1);
    assert!(rig.svc.active().is_none());
}

#[test]
fn session_events_bracket_each_activation() {
    let mut rig = Rig::boot(false);
    rig.long_press().unwrap();
    rig.long_press().unwrap();

    let sessions: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::SessionStarted(s) => Some(("start", s.counter)),
            AppEvent::SessionEnded(s) => Some(("end", s.counter)),
            _ => None,
        })
        .collect();
    assert_eq!(sessions, vec![("start", 0), ("end", 0)]);
}

// ── Scenario 4/5: USB ─────────────────────────────────────────

#[test]
fn boot_with_vbus_high_enters_usb_without_button() {
    let mut rig = Rig::boot(true);
    assert_eq!(rig.queue.len(), 1);
    rig.update().unwrap();

    assert_eq!(rig.mode(), Mode::Usb);
    assert_eq!(rig.hw.count(Call::UsbEnter), 1);
    assert_eq!(rig.hw.count(Call::TimerStart(TimerId::Hold, 1000)), 0);
}

#[test]
fn usb_exit_and_reentry_are_symmetric() {
    let mut rig = Rig::boot(true);
    rig.update().unwrap();

    rig.deliver(Event::VbusLow).unwrap();
    assert_eq!(rig.mode(), Mode::Sleep);
    assert_eq!(rig.hw.count(Call::UsbExit), 1);

    rig.deliver(Event::VbusHigh).unwrap();
    assert_eq!(rig.mode(), Mode::Usb);
    assert_eq!(rig.hw.count(Call::UsbEnter), 2);
}

#[test]
fn usb_ignores_button_and_timer() {
    let mut rig = Rig::boot(true);
    rig.update().unwrap();
    rig.hw.clear();

    rig.deliver(Event::ButtonPressed).unwrap();
    rig.deliver(Event::TimerExpired).unwrap();
    rig.deliver(Event::ButtonReleased).unwrap();
    rig.deliver(Event::VbusHigh).unwrap();

    assert_eq!(rig.mode(), Mode::Usb);
    assert!(rig.hw.calls.is_empty());
}

#[test]
fn active_ignores_vbus() {
    let mut rig = Rig::boot(false);
    rig.long_press().unwrap();
    rig.hw.clear();

    rig.deliver(Event::VbusHigh).unwrap();
    rig.deliver(Event::VbusLow).unwrap();
    assert_eq!(rig.mode(), Mode::Active);
    assert!(rig.hw.calls.is_empty());
}

// ── Queue ─────────────────────────────────────────────────────

#[test]
fn events_apply_in_arrival_order_within_one_update() {
    let mut rig = Rig::boot(false);
    rig.push(Event::ButtonPressed);
    rig.push(Event::TimerExpired);
    rig.push(Event::ButtonReleased);
    assert_eq!(rig.update(), Ok(3));
    assert_eq!(rig.mode(), Mode::Active);
}

#[test]
fn overflow_rejects_newest_and_is_reported() {
    let mut rig = Rig::boot(false);
    let capacity = EVENT_QUEUE_LEN - 1;
    for _ in 0..capacity {
        rig.push(Event::ButtonReleased);
    }
    assert!(rig.queue.push(Event::TimerExpired).is_err());

    assert_eq!(rig.update(), Ok(capacity));
    assert_eq!(rig.mode(), Mode::Sleep, "rejected TimerExpired never ran");
    assert_eq!(rig.sink.events.last(), Some(&AppEvent::EventsDropped(1)));
}

// ── Fatal errors ──────────────────────────────────────────────

#[test]
fn mount_failure_is_fatal_and_stops_the_sequence() {
    let mut rig = Rig::boot(false);
    rig.hw.fail_on = Some(Call::Mount);
    rig.deliver(Event::ButtonPressed).unwrap();
    rig.push(Event::TimerExpired);

    assert_eq!(rig.update(), Err(Error::Storage(StorageOp::Mount)));
    assert_eq!(rig.hw.count(Call::LoadConfig), 0);
    assert_eq!(rig.hw.calls.last(), Some(&Call::Mount));
    assert_ne!(rig.mode(), Mode::Active);
}

#[test]
fn config_read_failure_is_fatal() {
    let mut rig = Rig::boot(false);
    rig.hw.fail_on = Some(Call::LoadConfig);
    rig.hw.config_error = ConfigError::Corrupted;
    rig.deliver(Event::ButtonPressed).unwrap();
    rig.push(Event::TimerExpired);

    assert_eq!(rig.update(), Err(Error::Config(ConfigError::Corrupted)));
    assert_eq!(rig.hw.count(Call::LedOn), 0, "control layer never started");
}

#[test]
fn usb_entry_failure_is_fatal() {
    let mut rig = Rig::boot(true);
    rig.hw.fail_on = Some(Call::UsbEnter);
    assert_eq!(rig.update(), Err(Error::Usb(UsbOp::Enter)));
}

#[test]
fn failing_event_leaves_later_events_queued() {
    let mut rig = Rig::boot(false);
    rig.hw.fail_on = Some(Call::Mount);
    rig.push(Event::TimerExpired);
    rig.push(Event::ButtonPressed);

    assert!(rig.update().is_err());
    assert_eq!(rig.queue.len(), 1);
}

// ── Session identity ──────────────────────────────────────────

#[test]
fn session_id_is_drawn_once_and_reused() {
    let mut rig = Rig::boot_with(false, DeviceConfig::minimal());
    rig.long_press().unwrap();
    rig.long_press().unwrap();
    rig.long_press().unwrap();

    assert_eq!(rig.hw.count(Call::RngInit), 1);
    assert_eq!(rig.hw.count(Call::RngNext), 6);

    let ids: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::SessionStarted(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0].id, ids[1].id);
    assert_eq!((ids[0].counter, ids[1].counter), (0, 1));
    assert_eq!(rig.svc.session().counter(), 1);
}

#[test]
fn counter_advances_once_per_exit() {
    let mut rig = Rig::boot_with(false, DeviceConfig::minimal());
    for n in 1..=5 {
        rig.long_press().unwrap();
        rig.long_press().unwrap();
        assert_eq!(rig.svc.session().counter(), n);
    }
    assert_eq!(rig.svc.transitions(), 10);
}
