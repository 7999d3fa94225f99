use padnav_types::{GroupId, NodeId};
use rat_focus::FocusFlag;
use tracing::debug;

use super::highlight_flag;
use crate::node::{Container, NavContext, Navigable, NodeSnapshot};

/// Collapsible section owning a child navigation group.
///
/// Activate toggles expansion. While expanded, `Down` on the expander
/// moves focus into the child group.
pub struct ExpanderNode {
    id: NodeId,
    label: String,
    expanded: bool,
    child_group: GroupId,
    focus: FocusFlag,
}

impl ExpanderNode {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, child_group: impl Into<GroupId>) -> Self {
        let id = id.into();
        Self {
            focus: highlight_flag(&id),
            id,
            label: label.into(),
            expanded: false,
            child_group: child_group.into(),
        }
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

impl Navigable for ExpanderNode {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn activate(&mut self, _ctx: &mut NavContext<'_>) {
        self.expanded = !self.expanded;
        debug!(node = %self.id, expanded = self.expanded, "expander toggled");
    }

    fn focus_received(&mut self) {
        self.focus.set(true);
    }

    fn focus_lost(&mut self) {
        self.focus.set(false);
    }

    fn as_container(&self) -> Option<&dyn Container> {
        Some(self)
    }

    fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot::new(&self.label)
            .with_value(if self.expanded { "[-]" } else { "[+]" })
            .highlighted(self.focus.get())
    }
}

impl Container for ExpanderNode {
    fn is_expanded(&self) -> bool {
        self.expanded
    }

    fn child_group(&self) -> &GroupId {
        &self.child_group
    }
}
