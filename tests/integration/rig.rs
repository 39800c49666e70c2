//! A booted [`ModeService`] wired to the mock adapters.

use skylog::app::service::ModeService;
use skylog::config::{DeviceConfig, EVENT_QUEUE_LEN};
use skylog::error::Result;
use skylog::events::{Event, EventQueue};
use skylog::fsm::Mode;

use crate::mock_hw::{MockHardware, RecordingSink};

pub struct Rig {
    pub svc: ModeService,
    pub queue: EventQueue<EVENT_QUEUE_LEN>,
    pub hw: MockHardware,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn boot(vbus_high: bool) -> Self {
        Self::boot_with(vbus_high, DeviceConfig::default())
    }

    pub fn boot_with(vbus_high: bool, config: DeviceConfig) -> Self {
        let mut rig = Self {
            svc: ModeService::new(),
            queue: EventQueue::new(),
            hw: MockHardware::with_config(config),
            sink: RecordingSink::new(),
        };
        rig.svc
            .boot(vbus_high, &rig.queue, &mut rig.hw, &mut rig.sink);
        rig
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push(event).expect("queue full");
    }

    pub fn update(&mut self) -> Result<usize> {
        self.svc.update(&self.queue, &mut self.hw, &mut self.sink)
    }

    /// Push one event and drain.
    pub fn deliver(&mut self, event: Event) -> Result<()> {
        self.push(event);
        self.update().map(|_| ())
    }

    /// Button press held past the hold duration, then released.
    pub fn long_press(&mut self) -> Result<()> {
        self.deliver(Event::ButtonPressed)?;
        self.deliver(Event::TimerExpired)?;
        self.deliver(Event::ButtonReleased)
    }

    pub fn mode(&self) -> Mode {
        self.svc.mode()
    }
}
