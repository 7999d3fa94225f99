use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing policy for the controller poller.
///
/// All values are plain numbers so the struct can live in a JSON config
/// file; the `Duration` accessors are what the poller consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerSettings {
    /// Poll period while a device is connected.
    pub poll_interval_ms: u64,
    /// Period between detection attempts while no device is present.
    pub detect_retry_ms: u64,
    /// How long a direction must be held before it starts repeating.
    pub repeat_delay_ms: u64,
    /// Period between repeats of a held direction.
    pub repeat_interval_ms: u64,
    /// Stick magnitude (0.0..=1.0) above which the stick counts as a d-pad press.
    pub stick_deadzone: f32,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 16,
            detect_retry_ms: 1000,
            repeat_delay_ms: 400,
            repeat_interval_ms: 120,
            stick_deadzone: 0.5,
        }
    }
}

impl PollerSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn detect_retry(&self) -> Duration {
        Duration::from_millis(self.detect_retry_ms.max(1))
    }

    pub fn repeat_delay(&self) -> Duration {
        Duration::from_millis(self.repeat_delay_ms)
    }

    pub fn repeat_interval(&self) -> Duration {
        Duration::from_millis(self.repeat_interval_ms.max(1))
    }
}
