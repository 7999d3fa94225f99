use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::Direction;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Stable identity of a focusable node, unique within a registry.
    NodeId
);

string_id!(
    /// Name of a navigation group (one per screen section or scope).
    GroupId
);

/// What happens when navigation reaches either end of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapPolicy {
    /// Stay on the boundary element; the move is a no-op.
    #[default]
    Clamp,
    /// Continue from the opposite end.
    Wrap,
}

/// Which directions move focus between siblings of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupAxis {
    /// Up/Down move between siblings (a settings list).
    #[default]
    Vertical,
    /// Left/Right move between siblings (a row of presets).
    Horizontal,
    /// Up/Left go backward and Down/Right go forward.
    Both,
}

impl GroupAxis {
    /// Returns the signed sibling step for `direction`, or `None` when the
    /// direction is off this axis.
    pub const fn step(self, direction: Direction) -> Option<i32> {
        match (self, direction.is_vertical()) {
            (GroupAxis::Vertical, true) | (GroupAxis::Horizontal, false) | (GroupAxis::Both, _) => Some(direction.step()),
            _ => None,
        }
    }
}

/// Modal sub-state of a navigation root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModalState {
    #[default]
    Idle,
    SliderAdjusting,
    ComboOpen,
}

/// Directions a node claims to handle itself.
///
/// A node returning `true` for a direction receives that event through
/// `handle_direction` instead of the router moving focus. Values are
/// queried fresh on every event, so they may depend on node state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Directional {
    pub can_up: bool,
    pub can_down: bool,
    pub can_left: bool,
    pub can_right: bool,
}

impl Directional {
    /// A node that handles no direction itself.
    pub const NONE: Directional = Directional {
        can_up: false,
        can_down: false,
        can_left: false,
        can_right: false,
    };

    pub const fn horizontal(can_left: bool, can_right: bool) -> Self {
        Self {
            can_up: false,
            can_down: false,
            can_left,
            can_right,
        }
    }

    pub const fn allows(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.can_up,
            Direction::Down => self.can_down,
            Direction::Left => self.can_left,
            Direction::Right => self.can_right,
        }
    }
}

/// Slider capability snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliderState {
    /// The node currently behaves as a slider.
    pub is_slider_now: bool,
    /// Left/Right adjust the value instead of moving focus.
    pub is_activated: bool,
}

/// Combo-box capability snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboState {
    /// The drop-down is open; Up/Down move its internal selection.
    pub has_open_combo: bool,
    /// The internal selection has moved away from the committed value.
    pub is_navigating_combo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_steps_only_on_axis() {
        assert_eq!(GroupAxis::Vertical.step(Direction::Down), Some(1));
        assert_eq!(GroupAxis::Vertical.step(Direction::Left), None);
        assert_eq!(GroupAxis::Horizontal.step(Direction::Left), Some(-1));
        assert_eq!(GroupAxis::Horizontal.step(Direction::Up), None);
        assert_eq!(GroupAxis::Both.step(Direction::Up), Some(-1));
        assert_eq!(GroupAxis::Both.step(Direction::Right), Some(1));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = NodeId::from("tdp.slider");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"tdp.slider\"");
        assert_eq!(id.to_string(), "tdp.slider");
    }
}
