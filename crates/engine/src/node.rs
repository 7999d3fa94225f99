//! Capability contract for focusable nodes.
//!
//! Every element the router can focus implements [`Navigable`]. The base
//! trait covers what all nodes share (identity, directional claims,
//! activation and focus notifications); the optional refinements
//! [`SliderLike`], [`ComboLike`] and [`Container`] are exposed through
//! accessor methods that default to `None`, so a node that overrides none
//! of them is a plain leaf.
//!
//! Nodes never call back into the router. Anything they need from the
//! surrounding navigation root (feature flags, a follow-up event, a status
//! message) goes through the [`NavContext`] handed to their callbacks.

use std::collections::VecDeque;

use padnav_types::{ApplyOutcome, ComboState, Direction, Directional, GroupId, ModalState, NavEvent, NodeId, SliderState};

use crate::flags::FeatureFlags;

/// A focusable unit of a navigation group.
pub trait Navigable {
    /// Stable identity; must be unique within a registry.
    fn id(&self) -> &NodeId;

    /// Directions this node handles itself (an internal cursor, a stepper).
    ///
    /// Queried on every directional event while the node is focused and no
    /// modal sub-state is active.
    fn directional(&self) -> Directional {
        Directional::NONE
    }

    /// Receives a direction previously claimed through [`Navigable::directional`].
    fn handle_direction(&mut self, _direction: Direction, _ctx: &mut NavContext<'_>) {}

    /// Performs the node's single activation action.
    fn activate(&mut self, ctx: &mut NavContext<'_>);

    /// Called after the router made this node the current focus.
    fn focus_received(&mut self) {}

    /// Called before the router moves focus away from this node.
    fn focus_lost(&mut self) {}

    fn as_slider_mut(&mut self) -> Option<&mut dyn SliderLike> {
        None
    }

    fn as_combo_mut(&mut self) -> Option<&mut dyn ComboLike> {
        None
    }

    fn as_container(&self) -> Option<&dyn Container> {
        None
    }

    /// Read-only view used by presentation code.
    fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot::new(self.id().as_str())
    }
}

/// A node that can capture Left/Right to adjust a scalar value.
pub trait SliderLike {
    fn slider_state(&self) -> SliderState;

    /// Adjusts the value by `steps` (negative for Left). Only called while
    /// `is_activated` is set.
    fn adjust(&mut self, steps: i32, ctx: &mut NavContext<'_>);

    /// Leaves adjust mode without any other side effect.
    fn deactivate(&mut self);
}

/// A node with a drop-down whose selection Up/Down move while it is open.
pub trait ComboLike {
    fn combo_state(&self) -> ComboState;

    /// Moves the highlighted option by `delta` while the combo is open.
    fn move_selection(&mut self, delta: i32);

    /// Closes the drop-down, discarding the highlighted option.
    fn cancel(&mut self);
}

/// A node owning a nested navigation group.
pub trait Container {
    /// The container's own notion of "expanded"; focus may only descend
    /// while this is `true`.
    fn is_expanded(&self) -> bool;

    fn child_group(&self) -> &GroupId;
}

/// Presentation snapshot of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSnapshot {
    pub label: String,
    pub value: Option<String>,
    /// Mirrors the node's focus highlight flag.
    pub highlighted: bool,
}

impl NodeSnapshot {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: None,
            highlighted: false,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn highlighted(mut self, highlighted: bool) -> Self {
        self.highlighted = highlighted;
        self
    }
}

/// Derives the modal sub-state a focused node currently imposes.
pub fn modal_state_of(node: &mut dyn Navigable) -> ModalState {
    if let Some(slider) = node.as_slider_mut()
        && slider.slider_state().is_activated
    {
        return ModalState::SliderAdjusting;
    }
    if let Some(combo) = node.as_combo_mut()
        && combo.combo_state().has_open_combo
    {
        return ModalState::ComboOpen;
    }
    ModalState::Idle
}

/// Access to the navigation root handed to node callbacks.
///
/// Borrowed for the duration of a single callback. Events posted here are
/// queued and dispatched on the next cycle, never synchronously.
pub struct NavContext<'a> {
    flags: &'a mut FeatureFlags,
    posted: &'a mut VecDeque<NavEvent>,
    status: &'a mut Option<String>,
}

impl<'a> NavContext<'a> {
    pub fn new(flags: &'a mut FeatureFlags, posted: &'a mut VecDeque<NavEvent>, status: &'a mut Option<String>) -> Self {
        Self { flags, posted, status }
    }

    pub fn flags(&self) -> &FeatureFlags {
        self.flags
    }

    /// Sets a feature flag. The router re-synchronizes focus afterwards if
    /// the change hid the focused node.
    pub fn set_flag(&mut self, name: &str, value: bool) {
        self.flags.set(name, value);
    }

    /// Queues `event` for the next dispatch cycle.
    pub fn post(&mut self, event: NavEvent) {
        self.posted.push_back(event);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        *self.status = Some(message.into());
    }

    /// Surfaces a hardware apply result as the transient status line.
    pub fn report(&mut self, outcome: &ApplyOutcome) {
        if !outcome.message.is_empty() {
            self.set_status(outcome.message.clone());
        }
    }
}
