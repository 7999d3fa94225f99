//! The focus router: `GamepadNavigationService`.
//!
//! The service owns the [`FocusState`] and [`ScopeStack`] of one navigation
//! root and turns abstract [`NavInput`]s into either calls on the focused
//! node or focus movement inside the active group. Resolution order for a
//! directional event:
//!
//! 1. An active modal sub-state (slider adjust, open combo) gets the event.
//!    Focus never moves while a modal sub-state is active.
//! 2. A node that claims the direction through `directional()` handles it.
//! 3. `Down` on an expanded container descends into its child group.
//! 4. The active group resolves a sibling using its axis and wrap policy.
//!
//! The service assumes exclusive, single-threaded access. Node callbacks
//! cannot reach the router; events they post are queued until
//! [`GamepadNavigationService::pump_pending`] runs.

use std::collections::VecDeque;

use padnav_types::{Direction, GroupId, ModalState, NavEvent, NavInput, NodeId, WrapPolicy};
use tracing::{debug, trace};

use crate::focus::FocusState;
use crate::node::{NavContext, Navigable, modal_state_of};
use crate::registry::NavigationRegistry;
use crate::scope::{ScopeFrame, ScopeStack};

/// What a dispatched event ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Focus moved to the given node.
    Moved(NodeId),
    /// The focused node handled a direction it claimed.
    Forwarded,
    /// A modal handler consumed the event (slider step, combo move).
    Adjusted,
    /// The focused node's activation ran.
    Activated,
    /// `Back` closed a slider adjust mode or an open combo.
    ModalClosed,
    /// Focus descended into the given child group.
    ScopeEntered(GroupId),
    /// Focus returned to the given container.
    ScopeExited(NodeId),
    /// `Back` at the root with nothing to close; the host may act on it.
    Unhandled,
    /// The event had no effect.
    Ignored,
}

/// Focus router for one navigation root.
#[derive(Debug)]
pub struct GamepadNavigationService {
    state: FocusState,
    scopes: ScopeStack,
    pending: VecDeque<NavEvent>,
    status: Option<String>,
}

impl GamepadNavigationService {
    pub fn new(root_group: impl Into<GroupId>) -> Self {
        Self {
            state: FocusState::new(root_group.into()),
            scopes: ScopeStack::new(),
            pending: VecDeque::new(),
            status: None,
        }
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn current(&self) -> Option<&NodeId> {
        self.state.current()
    }

    pub fn modal(&self) -> ModalState {
        self.state.modal()
    }

    /// Takes the latest status message reported by a node callback.
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    /// Number of events posted by callbacks and not yet dispatched.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Routes one event. Never fails: mistimed or meaningless events are
    /// reported as [`DispatchOutcome::Ignored`].
    pub fn dispatch(&mut self, registry: &mut NavigationRegistry, input: NavInput) -> DispatchOutcome {
        self.state.controller_active = input.controller_active;
        self.resync(registry);

        let Some(current) = self.state.current.clone() else {
            return match self.focus_first(registry) {
                Some(node) => DispatchOutcome::Moved(node),
                None => {
                    trace!(event = %input.event, group = %self.state.active_group, "dispatch on empty group ignored");
                    DispatchOutcome::Ignored
                }
            };
        };

        match input.event {
            NavEvent::Activate => {
                self.with_context(registry, &current, |node, ctx| node.activate(ctx));
                self.after_callback(registry);
                DispatchOutcome::Activated
            }
            NavEvent::Back => self.back(registry, &current),
            directional => match directional.direction() {
                Some(direction) => self.navigate(registry, &current, direction),
                None => DispatchOutcome::Ignored,
            },
        }
    }

    /// Dispatches the events queued by node callbacks during earlier cycles.
    /// Events posted while pumping wait for the next call.
    pub fn pump_pending(&mut self, registry: &mut NavigationRegistry) -> Vec<DispatchOutcome> {
        let queued = std::mem::take(&mut self.pending);
        let controller_active = self.state.controller_active;
        queued
            .into_iter()
            .map(|event| {
                self.dispatch(
                    registry,
                    NavInput {
                        event,
                        controller_active,
                    },
                )
            })
            .collect()
    }

    /// Focuses the first visible node of the active group when nothing is
    /// focused yet.
    pub fn focus_first(&mut self, registry: &mut NavigationRegistry) -> Option<NodeId> {
        if self.state.current.is_some() {
            return self.state.current.clone();
        }
        let first = registry.element_at(&self.state.active_group, 0)?;
        self.move_focus(registry, Some(first.clone()));
        Some(first)
    }

    /// Focuses `node` directly (pointer input, initial focus). Only nodes
    /// visible in the active group can be focused.
    pub fn focus_node(&mut self, registry: &mut NavigationRegistry, node: &NodeId) -> bool {
        if registry.index_of(&self.state.active_group, node).is_none() {
            return false;
        }
        self.move_focus(registry, Some(node.clone()));
        true
    }

    /// Descends into `container`'s child group.
    ///
    /// Legal only while `container` is the focused node, reports itself
    /// expanded, and its child group has a visible node.
    pub fn enter_scope(&mut self, registry: &mut NavigationRegistry, container: &NodeId) -> bool {
        if !self.state.is_focused(container) || self.scopes.contains(container) {
            return false;
        }
        let child_group = match registry.node(container).and_then(|node| node.as_container()) {
            Some(info) if info.is_expanded() => info.child_group().clone(),
            _ => return false,
        };
        let Some(first) = registry.element_at(&child_group, 0) else {
            trace!(container = %container, group = %child_group, "scope has no visible nodes");
            return false;
        };

        self.scopes.push(ScopeFrame {
            container: container.clone(),
            parent_group: self.state.active_group.clone(),
            child_group: child_group.clone(),
            parent_index: registry.index_of(&self.state.active_group, container),
        });
        debug!(container = %container, group = %child_group, depth = self.scopes.depth(), "entered scope");
        self.state.active_group = child_group;
        self.move_focus(registry, Some(first));
        true
    }

    /// Leaves the innermost scope and refocuses its container. No-op on an
    /// empty stack.
    pub fn exit_scope(&mut self, registry: &mut NavigationRegistry) -> bool {
        let Some(frame) = self.scopes.pop() else {
            trace!("exit requested with empty scope stack");
            return false;
        };
        debug!(container = %frame.container, group = %frame.parent_group, depth = self.scopes.depth(), "exited scope");
        self.state.active_group = frame.parent_group;
        self.move_focus(registry, Some(frame.container));
        true
    }

    /// Re-validates focus against the registry.
    ///
    /// Pops scopes whose container is gone, hidden or collapsed, then makes
    /// sure the focused node is still visible in the active group. A hidden
    /// focus is moved to the nearest surviving index; it only becomes
    /// `None` when the group has no visible node left.
    pub fn resync(&mut self, registry: &mut NavigationRegistry) {
        while let Some(frame) = self.scopes.top().cloned() {
            let container_alive = registry.is_visible(&frame.container)
                && registry
                    .node(&frame.container)
                    .and_then(|node| node.as_container())
                    .is_some_and(|container| container.is_expanded());
            if container_alive && registry.max_index(&frame.child_group).is_some() {
                break;
            }
            self.scopes.pop();
            debug!(container = %frame.container, "scope closed underneath focus");
            self.state.active_group = frame.parent_group;
            if registry.is_visible(&frame.container) {
                self.move_focus(registry, Some(frame.container));
            } else {
                // Re-clamp below against the container's slot, not the child's.
                self.state.last_index = frame.parent_index;
            }
        }

        let Some(current) = self.state.current.clone() else {
            return;
        };
        let group = self.state.active_group.clone();
        if let Some(index) = registry.index_of(&group, &current) {
            self.state.last_index = Some(index);
            return;
        }

        let replacement = registry
            .max_index(&group)
            .and_then(|max| registry.element_at(&group, self.state.last_index.unwrap_or(0).min(max)));
        debug!(
            hidden = %current,
            replacement = replacement.as_ref().map(NodeId::as_str).unwrap_or("<none>"),
            "focused node no longer visible"
        );
        self.move_focus(registry, replacement);
    }

    fn navigate(&mut self, registry: &mut NavigationRegistry, current: &NodeId, direction: Direction) -> DispatchOutcome {
        match self.state.modal {
            ModalState::SliderAdjusting => {
                if direction.is_vertical() {
                    return DispatchOutcome::Ignored;
                }
                self.with_context(registry, current, |node, ctx| {
                    if let Some(slider) = node.as_slider_mut() {
                        slider.adjust(direction.step(), ctx);
                    }
                });
                self.after_callback(registry);
                return DispatchOutcome::Adjusted;
            }
            ModalState::ComboOpen => {
                if direction.is_horizontal() {
                    return DispatchOutcome::Ignored;
                }
                registry.with_node(current, |node, _| {
                    if let Some(combo) = node.as_combo_mut() {
                        combo.move_selection(direction.step());
                    }
                });
                self.sync_modal(registry);
                return DispatchOutcome::Adjusted;
            }
            ModalState::Idle => {}
        }

        let claimed = registry
            .node(current)
            .is_some_and(|node| node.directional().allows(direction));
        if claimed {
            self.with_context(registry, current, |node, ctx| node.handle_direction(direction, ctx));
            self.after_callback(registry);
            return DispatchOutcome::Forwarded;
        }

        if direction == Direction::Down && self.enter_scope(registry, current) {
            return DispatchOutcome::ScopeEntered(self.state.active_group.clone());
        }

        let group = self.state.active_group.clone();
        let Some(layout) = registry.group(&group).map(|group| (group.axis(), group.policy())) else {
            return DispatchOutcome::Ignored;
        };
        let (axis, policy) = layout;
        match axis.step(direction) {
            Some(step) => {
                if let Some(target) = registry.neighbour(&group, current, step) {
                    self.move_focus(registry, Some(target.clone()));
                    return DispatchOutcome::Moved(target);
                }
                let leaving_start = step < 0 && policy == WrapPolicy::Clamp;
                if leaving_start && registry.index_of(&group, current) == Some(0) {
                    return self.exit_outcome(registry);
                }
                DispatchOutcome::Ignored
            }
            None if direction == Direction::Up => self.exit_outcome(registry),
            None => DispatchOutcome::Ignored,
        }
    }

    fn back(&mut self, registry: &mut NavigationRegistry, current: &NodeId) -> DispatchOutcome {
        match self.state.modal {
            ModalState::SliderAdjusting => {
                registry.with_node(current, |node, _| {
                    if let Some(slider) = node.as_slider_mut() {
                        slider.deactivate();
                    }
                });
                self.sync_modal(registry);
                DispatchOutcome::ModalClosed
            }
            ModalState::ComboOpen => {
                registry.with_node(current, |node, _| {
                    if let Some(combo) = node.as_combo_mut() {
                        combo.cancel();
                    }
                });
                self.sync_modal(registry);
                DispatchOutcome::ModalClosed
            }
            ModalState::Idle => match self.exit_outcome(registry) {
                DispatchOutcome::Ignored => DispatchOutcome::Unhandled,
                outcome => outcome,
            },
        }
    }

    fn exit_outcome(&mut self, registry: &mut NavigationRegistry) -> DispatchOutcome {
        if self.exit_scope(registry)
            && let Some(container) = self.state.current.clone()
        {
            return DispatchOutcome::ScopeExited(container);
        }
        DispatchOutcome::Ignored
    }

    /// Lost before received, then the modal state follows the new node.
    fn move_focus(&mut self, registry: &mut NavigationRegistry, target: Option<NodeId>) {
        if self.state.current == target {
            return;
        }
        if let Some(previous) = self.state.current.take() {
            registry.with_node(&previous, |node, _| node.focus_lost());
        }
        self.state.modal = ModalState::Idle;
        self.state.last_index = None;
        self.state.current = target;

        if let Some(next) = self.state.current.clone() {
            registry.with_node(&next, |node, _| node.focus_received());
            self.state.last_index = registry.index_of(&self.state.active_group, &next);
            self.sync_modal(registry);
            debug!(node = %next, group = %self.state.active_group, index = ?self.state.last_index, "focus moved");
        }
    }

    fn sync_modal(&mut self, registry: &mut NavigationRegistry) {
        self.state.modal = match self.state.current.clone() {
            Some(current) => registry.with_node(&current, |node, _| modal_state_of(node)).unwrap_or_default(),
            None => ModalState::Idle,
        };
    }

    fn after_callback(&mut self, registry: &mut NavigationRegistry) {
        self.sync_modal(registry);
        self.resync(registry);
    }

    fn with_context<R>(
        &mut self,
        registry: &mut NavigationRegistry,
        node: &NodeId,
        f: impl FnOnce(&mut dyn Navigable, &mut NavContext<'_>) -> R,
    ) -> Option<R> {
        let pending = &mut self.pending;
        let status = &mut self.status;
        registry.with_node(node, |node, flags| {
            let mut ctx = NavContext::new(flags, pending, status);
            f(node, &mut ctx)
        })
    }
}
