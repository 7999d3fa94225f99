//! Scope stack for nested navigation.
//!
//! Entering an expanded container pushes a frame recording which group to
//! return to and which container to refocus; leaving pops it. The router
//! is the only writer, which keeps the depth equal to the number of
//! containers focus has descended into.

use padnav_types::{GroupId, NodeId};

/// One level of descent into a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFrame {
    /// The container that was focused when the scope was entered.
    pub container: NodeId,
    /// Group that was active before entering; restored on exit.
    pub parent_group: GroupId,
    /// Group navigated while the frame is on top.
    pub child_group: GroupId,
    /// Index of `container` in `parent_group` when the scope was entered.
    pub parent_index: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn top(&self) -> Option<&ScopeFrame> {
        self.frames.last()
    }

    pub fn contains(&self, container: &NodeId) -> bool {
        self.frames.iter().any(|frame| &frame.container == container)
    }

    /// Frames from the root outward.
    pub fn frames(&self) -> &[ScopeFrame] {
        &self.frames
    }

    pub(crate) fn push(&mut self, frame: ScopeFrame) {
        self.frames.push(frame);
    }

    pub(crate) fn pop(&mut self) -> Option<ScopeFrame> {
        self.frames.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_on_empty_stack_is_none() {
        let mut stack = ScopeStack::new();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn frames_are_last_in_first_out() {
        let mut stack = ScopeStack::new();
        for (container, parent, child) in [("gpu", "main", "gpu.items"), ("rsr", "gpu.items", "rsr.items")] {
            stack.push(ScopeFrame {
                container: container.into(),
                parent_group: parent.into(),
                child_group: child.into(),
                parent_index: Some(0),
            });
        }
        assert_eq!(stack.depth(), 2);
        assert!(stack.contains(&NodeId::from("gpu")));
        assert_eq!(stack.pop().map(|frame| frame.container), Some(NodeId::from("rsr")));
        assert_eq!(stack.top().map(|frame| frame.parent_group.clone()), Some(GroupId::from("main")));
    }
}
