//! Per-button edge and auto-repeat detection.

use std::collections::{BTreeMap, BTreeSet};
use std::collections::btree_map::Entry;
use std::time::Duration;

use padnav_types::{NavEvent, PollerSettings};
use tokio::time::Instant;

use crate::mapping::map_button_to_event;
use crate::pad::PadButton;

/// Turns successive pressed-button sets into navigation events.
///
/// A button emits once on its press edge. Directional buttons held past
/// the repeat delay emit again every repeat interval; Activate and Back
/// never repeat. Buttons with no navigation meaning are ignored.
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    repeat_delay: Duration,
    repeat_interval: Duration,
    /// Held navigation buttons and the instant of their next repeat.
    held: BTreeMap<PadButton, Instant>,
}

impl EdgeDetector {
    pub fn new(settings: &PollerSettings) -> Self {
        Self::with_timing(settings.repeat_delay(), settings.repeat_interval())
    }

    pub fn with_timing(repeat_delay: Duration, repeat_interval: Duration) -> Self {
        Self {
            repeat_delay,
            repeat_interval: repeat_interval.max(Duration::from_millis(1)),
            held: BTreeMap::new(),
        }
    }

    pub fn update(&mut self, pressed: &BTreeSet<PadButton>, now: Instant) -> Vec<NavEvent> {
        self.held.retain(|button, _| pressed.contains(button));

        let mut events = Vec::new();
        for &button in pressed {
            let Some(event) = map_button_to_event(button) else {
                continue;
            };
            match self.held.entry(button) {
                Entry::Vacant(slot) => {
                    slot.insert(now + self.repeat_delay);
                    events.push(event);
                }
                Entry::Occupied(mut slot) => {
                    if button.direction().is_some() && now >= *slot.get() {
                        slot.insert(now + self.repeat_interval);
                        events.push(event);
                    }
                }
            }
        }
        events
    }

    /// Forgets held buttons, e.g. after the device went away.
    pub fn reset(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(buttons: &[PadButton]) -> BTreeSet<PadButton> {
        buttons.iter().copied().collect()
    }

    fn detector() -> EdgeDetector {
        EdgeDetector::with_timing(Duration::from_millis(400), Duration::from_millis(120))
    }

    #[test]
    fn emits_once_per_press_edge() {
        let mut edges = detector();
        let start = Instant::now();
        let down = pressed(&[PadButton::DpadDown]);

        assert_eq!(edges.update(&down, start), vec![NavEvent::Down]);
        assert!(edges.update(&down, start + Duration::from_millis(16)).is_empty());
        assert!(edges.update(&pressed(&[]), start + Duration::from_millis(32)).is_empty());
        assert_eq!(edges.update(&down, start + Duration::from_millis(48)), vec![NavEvent::Down]);
    }

    #[test]
    fn held_directions_repeat_after_the_delay() {
        let mut edges = detector();
        let start = Instant::now();
        let right = pressed(&[PadButton::DpadRight]);

        let mut count = 0;
        for tick in 0..=44 {
            count += edges.update(&right, start + Duration::from_millis(tick * 16)).len();
        }
        // Press at 0 ms, repeats near 400, 528 and 656 ms within a 704 ms hold.
        assert_eq!(count, 4);
    }

    #[test]
    fn activate_and_back_never_repeat() {
        let mut edges = detector();
        let start = Instant::now();
        let face = pressed(&[PadButton::South, PadButton::East]);

        assert_eq!(edges.update(&face, start), vec![NavEvent::Activate, NavEvent::Back]);
        assert!(edges.update(&face, start + Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn non_navigation_buttons_are_ignored() {
        let mut edges = detector();
        assert!(edges.update(&pressed(&[PadButton::Start, PadButton::North]), Instant::now()).is_empty());
    }
}
