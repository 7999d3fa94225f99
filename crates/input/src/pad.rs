//! Raw controller state as read from a backend.

use std::collections::BTreeSet;

use padnav_types::{Direction, NavEvent};

/// Digital inputs of a standard dual-stick pad. Face buttons use
/// position names (South is A on Xbox layouts, Cross on PlayStation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PadButton {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    South,
    East,
    West,
    North,
    LeftShoulder,
    RightShoulder,
    Start,
    Select,
}

impl PadButton {
    pub fn direction(self) -> Option<Direction> {
        match self {
            PadButton::DpadUp => Some(Direction::Up),
            PadButton::DpadDown => Some(Direction::Down),
            PadButton::DpadLeft => Some(Direction::Left),
            PadButton::DpadRight => Some(Direction::Right),
            _ => None,
        }
    }

    /// The button that produces `event`; used to synthesize frames.
    pub fn for_event(event: NavEvent) -> PadButton {
        match event {
            NavEvent::Up => PadButton::DpadUp,
            NavEvent::Down => PadButton::DpadDown,
            NavEvent::Left => PadButton::DpadLeft,
            NavEvent::Right => PadButton::DpadRight,
            NavEvent::Activate => PadButton::South,
            NavEvent::Back => PadButton::East,
        }
    }
}

/// One sample of the controller.
///
/// Stick axes are normalized to `-1.0..=1.0` with `+x` right and `+y`
/// down, matching screen coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PadState {
    pub buttons: BTreeSet<PadButton>,
    pub stick_x: f32,
    pub stick_y: f32,
}

impl PadState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn pressing(buttons: impl IntoIterator<Item = PadButton>) -> Self {
        Self {
            buttons: buttons.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_stick(mut self, x: f32, y: f32) -> Self {
        self.stick_x = x;
        self.stick_y = y;
        self
    }

    /// Pressed buttons with the stick folded into the d-pad. An axis past
    /// `deadzone` reads as the matching d-pad direction.
    pub fn effective_buttons(&self, deadzone: f32) -> BTreeSet<PadButton> {
        let deadzone = deadzone.abs();
        let mut pressed = self.buttons.clone();
        if self.stick_x <= -deadzone {
            pressed.insert(PadButton::DpadLeft);
        } else if self.stick_x >= deadzone {
            pressed.insert(PadButton::DpadRight);
        }
        if self.stick_y <= -deadzone {
            pressed.insert(PadButton::DpadUp);
        } else if self.stick_y >= deadzone {
            pressed.insert(PadButton::DpadDown);
        }
        pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_folds_into_dpad_past_deadzone() {
        let state = PadState::pressing([PadButton::South]).with_stick(0.8, -0.3);
        let pressed = state.effective_buttons(0.5);
        assert!(pressed.contains(&PadButton::DpadRight));
        assert!(pressed.contains(&PadButton::South));
        assert!(!pressed.contains(&PadButton::DpadUp), "inside the deadzone");
    }

    #[test]
    fn every_event_has_a_source_button() {
        for event in [NavEvent::Up, NavEvent::Down, NavEvent::Left, NavEvent::Right] {
            assert_eq!(PadButton::for_event(event).direction(), event.direction());
        }
        assert_eq!(PadButton::for_event(NavEvent::Activate), PadButton::South);
    }
}
