use std::collections::VecDeque;

use padnav_types::NavEvent;

use crate::error::DeviceError;
use crate::pad::{PadButton, PadState};

/// Source of raw controller samples.
///
/// `read` is called once per poll tick and must not block for longer than
/// a tick. Any error marks the device as gone; the poller stops reading and
/// calls `detect` again at the retry cadence until it succeeds.
pub trait ControllerBackend: Send {
    fn name(&self) -> &str;

    /// Looks for a usable device.
    fn detect(&mut self) -> Result<(), DeviceError>;

    /// Samples the current state of the detected device.
    fn read(&mut self) -> Result<PadState, DeviceError>;
}

/// Plays back a fixed sequence of frames, one per read.
///
/// Once the frames are exhausted the device reports itself disconnected and
/// never detects again.
#[derive(Debug, Clone, Default)]
pub struct ReplayBackend {
    frames: VecDeque<PadState>,
}

impl ReplayBackend {
    pub fn new(frames: impl IntoIterator<Item = PadState>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// A press frame followed by a release frame for each event, so every
    /// event produces exactly one edge.
    pub fn from_events(events: &[NavEvent]) -> Self {
        Self::new(
            events
                .iter()
                .flat_map(|event| [PadState::pressing([PadButton::for_event(*event)]), PadState::idle()]),
        )
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl ControllerBackend for ReplayBackend {
    fn name(&self) -> &str {
        "replay"
    }

    fn detect(&mut self) -> Result<(), DeviceError> {
        if self.frames.is_empty() {
            return Err(DeviceError::NotFound);
        }
        Ok(())
    }

    fn read(&mut self) -> Result<PadState, DeviceError> {
        self.frames
            .pop_front()
            .ok_or_else(|| DeviceError::Disconnected("replay exhausted".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_disconnects_when_exhausted() {
        let mut backend = ReplayBackend::from_events(&[NavEvent::Activate]);
        assert!(backend.detect().is_ok());
        assert_eq!(backend.read().expect("press frame"), PadState::pressing([PadButton::South]));
        assert_eq!(backend.read().expect("release frame"), PadState::idle());
        assert!(matches!(backend.read(), Err(DeviceError::Disconnected(_))));
        assert!(matches!(backend.detect(), Err(DeviceError::NotFound)));
    }
}
