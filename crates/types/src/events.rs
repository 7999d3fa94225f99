use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four cardinal directions a d-pad or stick can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns `true` for `Up` and `Down`.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Returns `true` for `Left` and `Right`.
    pub const fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }

    /// Signed step along the direction's axis: `-1` for `Up`/`Left`,
    /// `+1` for `Down`/`Right`.
    pub const fn step(self) -> i32 {
        match self {
            Direction::Up | Direction::Left => -1,
            Direction::Down | Direction::Right => 1,
        }
    }
}

/// Abstract navigation event consumed by the focus router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavEvent {
    Up,
    Down,
    Left,
    Right,
    Activate,
    Back,
}

impl NavEvent {
    /// Returns the direction carried by a directional event.
    pub const fn direction(self) -> Option<Direction> {
        match self {
            NavEvent::Up => Some(Direction::Up),
            NavEvent::Down => Some(Direction::Down),
            NavEvent::Left => Some(Direction::Left),
            NavEvent::Right => Some(Direction::Right),
            NavEvent::Activate | NavEvent::Back => None,
        }
    }
}

impl From<Direction> for NavEvent {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => NavEvent::Up,
            Direction::Down => NavEvent::Down,
            Direction::Left => NavEvent::Left,
            Direction::Right => NavEvent::Right,
        }
    }
}

impl fmt::Display for NavEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NavEvent::Up => "up",
            NavEvent::Down => "down",
            NavEvent::Left => "left",
            NavEvent::Right => "right",
            NavEvent::Activate => "activate",
            NavEvent::Back => "back",
        };
        f.write_str(name)
    }
}

impl FromStr for NavEvent {
    type Err = String;

    /// Parses the event names used by scripts. Controller button aliases
    /// (`a`, `b`) are accepted alongside the long names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(NavEvent::Up),
            "down" | "d" => Ok(NavEvent::Down),
            "left" | "l" => Ok(NavEvent::Left),
            "right" | "r" => Ok(NavEvent::Right),
            "activate" | "a" | "enter" => Ok(NavEvent::Activate),
            "back" | "b" | "esc" => Ok(NavEvent::Back),
            other => Err(format!("unknown navigation event '{other}'")),
        }
    }
}

/// An event together with the source flag used for visual feedback.
///
/// `controller_active` records whether the event came from a controller
/// (as opposed to a keyboard or synthetic source). The router stores it
/// but never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavInput {
    pub event: NavEvent,
    pub controller_active: bool,
}

impl NavInput {
    pub const fn controller(event: NavEvent) -> Self {
        Self {
            event,
            controller_active: true,
        }
    }

    pub const fn synthetic(event: NavEvent) -> Self {
        Self {
            event,
            controller_active: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_script_aliases() {
        assert_eq!("A".parse::<NavEvent>(), Ok(NavEvent::Activate));
        assert_eq!(" b ".parse::<NavEvent>(), Ok(NavEvent::Back));
        assert_eq!("right".parse::<NavEvent>(), Ok(NavEvent::Right));
        assert!("jump".parse::<NavEvent>().is_err());
    }

    #[test]
    fn direction_steps_follow_reading_order() {
        assert_eq!(Direction::Up.step(), -1);
        assert_eq!(Direction::Left.step(), -1);
        assert_eq!(Direction::Down.step(), 1);
        assert_eq!(Direction::Right.step(), 1);
        assert_eq!(NavEvent::from(Direction::Left).direction(), Some(Direction::Left));
        assert_eq!(NavEvent::Activate.direction(), None);
    }
}
