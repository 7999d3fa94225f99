use padnav_types::NodeId;
use rat_focus::FocusFlag;

use super::highlight_flag;
use crate::node::{NavContext, Navigable, NodeSnapshot};

type Action = Box<dyn FnMut(&mut NavContext<'_>)>;

/// Push button running a callback on activation.
pub struct ButtonNode {
    id: NodeId,
    label: String,
    action: Action,
    focus: FocusFlag,
}

impl ButtonNode {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, action: impl FnMut(&mut NavContext<'_>) + 'static) -> Self {
        let id = id.into();
        Self {
            focus: highlight_flag(&id),
            id,
            label: label.into(),
            action: Box::new(action),
        }
    }
}

impl Navigable for ButtonNode {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn activate(&mut self, ctx: &mut NavContext<'_>) {
        (self.action)(ctx);
    }

    fn focus_received(&mut self) {
        self.focus.set(true);
    }

    fn focus_lost(&mut self) {
        self.focus.set(false);
    }

    fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot::new(&self.label).highlighted(self.focus.get())
    }
}
