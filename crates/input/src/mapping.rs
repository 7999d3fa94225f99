// Gamepad button -> navigation event

use padnav_types::NavEvent;

use crate::pad::PadButton;

/// Maps a pad button to the router event it produces.
pub fn map_button_to_event(button: PadButton) -> Option<NavEvent> {
    match button {
        // D-pad -> directional navigation
        PadButton::DpadUp => Some(NavEvent::Up),
        PadButton::DpadDown => Some(NavEvent::Down),
        PadButton::DpadLeft => Some(NavEvent::Left),
        PadButton::DpadRight => Some(NavEvent::Right),

        // Face buttons
        PadButton::South => Some(NavEvent::Activate),
        PadButton::East => Some(NavEvent::Back),

        // Not navigation inputs
        _ => None,
    }
}

pub fn is_nav_button(button: PadButton) -> bool {
    map_button_to_event(button).is_some()
}
