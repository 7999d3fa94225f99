//! Focus state owned by a navigation root.

use padnav_types::{GroupId, ModalState, NodeId};

/// The single focus pointer of a navigation root.
///
/// Only the router mutates this; everyone else reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusState {
    pub(crate) current: Option<NodeId>,
    pub(crate) modal: ModalState,
    pub(crate) active_group: GroupId,
    pub(crate) controller_active: bool,
    // Index of `current` in `active_group` as of the last sync; used to pick
    // the nearest survivor when the focused node disappears.
    pub(crate) last_index: Option<usize>,
}

impl FocusState {
    pub fn new(root_group: GroupId) -> Self {
        Self {
            current: None,
            modal: ModalState::Idle,
            active_group: root_group,
            controller_active: false,
            last_index: None,
        }
    }

    pub fn current(&self) -> Option<&NodeId> {
        self.current.as_ref()
    }

    pub fn modal(&self) -> ModalState {
        self.modal
    }

    pub fn active_group(&self) -> &GroupId {
        &self.active_group
    }

    /// Whether the most recent input came from a controller. Only meant to
    /// gate visual feedback.
    pub fn controller_active(&self) -> bool {
        self.controller_active
    }

    pub fn is_focused(&self, node: &NodeId) -> bool {
        self.current.as_ref() == Some(node)
    }
}
