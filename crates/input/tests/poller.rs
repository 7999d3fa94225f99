use std::sync::{Arc, Mutex};
use std::time::Duration;

use padnav_input::{ControllerBackend, ControllerPoller, DeviceError, PadButton, PadState, ReplayBackend};
use padnav_types::{NavEvent, PollerSettings};
use tokio::time::{sleep, timeout};

#[derive(Debug, Default)]
struct Device {
    present: bool,
    state: PadState,
    detects: usize,
}

/// Backend whose device can be plugged and unplugged from the test.
#[derive(Debug, Clone, Default)]
struct SharedBackend(Arc<Mutex<Device>>);

impl SharedBackend {
    fn plugged(state: PadState) -> Self {
        let backend = Self::default();
        backend.update(|device| {
            device.present = true;
            device.state = state;
        });
        backend
    }

    fn update(&self, f: impl FnOnce(&mut Device)) {
        f(&mut self.0.lock().expect("device lock"));
    }

    fn detects(&self) -> usize {
        self.0.lock().expect("device lock").detects
    }
}

impl ControllerBackend for SharedBackend {
    fn name(&self) -> &str {
        "shared"
    }

    fn detect(&mut self) -> Result<(), DeviceError> {
        let mut device = self.0.lock().expect("device lock");
        device.detects += 1;
        if device.present { Ok(()) } else { Err(DeviceError::NotFound) }
    }

    fn read(&mut self) -> Result<PadState, DeviceError> {
        let device = self.0.lock().expect("device lock");
        if device.present {
            Ok(device.state.clone())
        } else {
            Err(DeviceError::Disconnected("unplugged".to_owned()))
        }
    }
}

#[tokio::test(start_paused = true)]
async fn stop_twice_is_harmless() {
    let backend = SharedBackend::plugged(PadState::pressing([PadButton::DpadDown]));
    let (handle, mut events) = ControllerPoller::spawn(backend, PollerSettings::default());

    let first = timeout(Duration::from_secs(1), events.recv()).await.expect("first press").expect("channel open");
    assert_eq!(first.event, NavEvent::Down);

    handle.stop();
    handle.stop();
    assert!(handle.is_stopped());
    handle.join().await;

    assert!(events.recv().await.is_none(), "no event after stop and the channel closes");
}

#[tokio::test(start_paused = true)]
async fn absent_device_stays_quiet_and_retries_slowly() {
    let backend = SharedBackend::default();
    let probe = backend.clone();
    let (handle, mut events) = ControllerPoller::spawn(backend, PollerSettings::default());

    sleep(Duration::from_millis(5_500)).await;

    assert!(events.try_recv().is_err());
    let detects = probe.detects();
    assert!((4..=7).contains(&detects), "detection retried {detects} times");
    handle.join().await;
}

#[tokio::test(start_paused = true)]
async fn recovers_after_unplug() {
    let backend = SharedBackend::default();
    let device = backend.clone();
    let (handle, mut events) = ControllerPoller::spawn(backend, PollerSettings::default());
    sleep(Duration::from_millis(1_500)).await;
    assert!(events.try_recv().is_err());

    device.update(|device| {
        device.present = true;
        device.state = PadState::pressing([PadButton::South]);
    });
    let input = timeout(Duration::from_secs(3), events.recv()).await.expect("event after detection").expect("channel open");
    assert_eq!(input.event, NavEvent::Activate);
    assert!(input.controller_active);

    device.update(|device| device.present = false);
    sleep(Duration::from_millis(100)).await;
    device.update(|device| {
        device.present = true;
        device.state = PadState::idle().with_stick(0.0, 0.9);
    });
    let input = timeout(Duration::from_secs(3), events.recv()).await.expect("event after re-detection").expect("channel open");
    assert_eq!(input.event, NavEvent::Down);

    handle.join().await;
}

#[tokio::test(start_paused = true)]
async fn replay_emits_one_event_per_scripted_press() {
    let script = [NavEvent::Down, NavEvent::Down, NavEvent::Activate, NavEvent::Right, NavEvent::Back];
    let (handle, mut events) = ControllerPoller::spawn(ReplayBackend::from_events(&script), PollerSettings::default());

    let mut received = Vec::new();
    while received.len() < script.len() {
        let input = timeout(Duration::from_secs(1), events.recv()).await.expect("scripted event").expect("channel open");
        received.push(input.event);
    }
    assert_eq!(received, script);

    sleep(Duration::from_secs(2)).await;
    assert!(events.try_recv().is_err(), "exhausted replay emits nothing more");
    handle.join().await;
}
