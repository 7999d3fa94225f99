//! A navigation root: one registry plus the router that navigates it.

use padnav_types::{GroupId, NavEvent, NavInput, NodeId};

use crate::node::NodeSnapshot;
use crate::registry::NavigationRegistry;
use crate::router::{DispatchOutcome, GamepadNavigationService};

/// Independent focus domain (the main window, a modal dialog).
///
/// Each root has its own registry, focus state and scope stack; roots never
/// share nodes.
pub struct NavigationRoot {
    pub registry: NavigationRegistry,
    pub service: GamepadNavigationService,
}

impl NavigationRoot {
    pub fn new(registry: NavigationRegistry, root_group: impl Into<GroupId>) -> Self {
        Self {
            registry,
            service: GamepadNavigationService::new(root_group),
        }
    }

    pub fn dispatch(&mut self, input: NavInput) -> DispatchOutcome {
        self.service.dispatch(&mut self.registry, input)
    }

    /// Dispatches a controller-originated event.
    pub fn press(&mut self, event: NavEvent) -> DispatchOutcome {
        self.dispatch(NavInput::controller(event))
    }

    pub fn pump_pending(&mut self) -> Vec<DispatchOutcome> {
        self.service.pump_pending(&mut self.registry)
    }

    pub fn focus_first(&mut self) -> Option<NodeId> {
        self.service.focus_first(&mut self.registry)
    }

    pub fn focus(&mut self, node: &NodeId) -> bool {
        self.service.focus_node(&mut self.registry, node)
    }

    pub fn resync(&mut self) {
        self.service.resync(&mut self.registry);
    }

    pub fn current(&self) -> Option<&NodeId> {
        self.service.current()
    }

    pub fn snapshot_of(&self, node: &NodeId) -> Option<NodeSnapshot> {
        self.registry.node(node).map(|node| node.snapshot())
    }

    /// Snapshots of the visible nodes of `group`, in navigation order.
    pub fn visible_snapshots(&self, group: &GroupId) -> Vec<(NodeId, NodeSnapshot)> {
        self.registry
            .visible_nodes(group)
            .into_iter()
            .filter_map(|id| self.snapshot_of(&id).map(|snapshot| (id, snapshot)))
            .collect()
    }
}
