//! Navigation group registry.
//!
//! A registry is the per-screen store of focusable nodes. It owns the
//! nodes (the router only ever holds a [`NodeId`]) and groups them into
//! named, ordered [`NavigationGroup`]s. Each entry carries an order key and
//! a [`VisibilityRule`]; hidden entries are skipped entirely and do not
//! occupy an index.
//!
//! Index resolution is recomputed on every call from the current feature
//! flags. Nothing is cached, so two calls with unchanged flags always see
//! the same index to node mapping.

use std::collections::HashMap;

use indexmap::IndexMap;
use padnav_types::{GroupAxis, GroupId, NodeId, WrapPolicy};
use thiserror::Error;
use tracing::debug;

use crate::flags::{FeatureFlags, VisibilityRule};
use crate::node::Navigable;

/// Errors raised while assembling a registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("navigation group already registered: {0}")]
    DuplicateGroup(GroupId),

    #[error("node id already registered: {node} (in group {group})")]
    DuplicateNode { node: NodeId, group: GroupId },

    #[error("unknown navigation group: {0}")]
    UnknownGroup(GroupId),
}

/// Declaration of a navigation group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub id: GroupId,
    pub policy: WrapPolicy,
    pub axis: GroupAxis,
}

impl GroupSpec {
    /// A vertical, clamping group.
    pub fn new(id: impl Into<GroupId>) -> Self {
        Self {
            id: id.into(),
            policy: WrapPolicy::Clamp,
            axis: GroupAxis::Vertical,
        }
    }

    pub fn policy(mut self, policy: WrapPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn axis(mut self, axis: GroupAxis) -> Self {
        self.axis = axis;
        self
    }
}

struct GroupEntry {
    order: i32,
    rule: VisibilityRule,
    node: Box<dyn Navigable>,
}

/// An ordered set of sibling nodes sharing a wrap/clamp policy.
pub struct NavigationGroup {
    spec: GroupSpec,
    // Kept sorted by order key; equal keys stay in declaration order.
    entries: Vec<GroupEntry>,
}

impl NavigationGroup {
    pub fn id(&self) -> &GroupId {
        &self.spec.id
    }

    pub fn policy(&self) -> WrapPolicy {
        self.spec.policy
    }

    pub fn axis(&self) -> GroupAxis {
        self.spec.axis
    }

    /// Number of declared entries, visible or not.
    pub fn declared_len(&self) -> usize {
        self.entries.len()
    }

    fn visible<'a>(&'a self, flags: &'a FeatureFlags) -> impl Iterator<Item = &'a GroupEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.rule.evaluate(flags))
    }
}

/// Per-screen store of navigation groups and the feature flags that drive
/// their visibility.
#[derive(Default)]
pub struct NavigationRegistry {
    groups: IndexMap<GroupId, NavigationGroup>,
    owners: HashMap<NodeId, GroupId>,
    flags: FeatureFlags,
}

impl NavigationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(flags: FeatureFlags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    pub fn add_group(&mut self, spec: GroupSpec) -> Result<(), RegistryError> {
        if self.groups.contains_key(&spec.id) {
            return Err(RegistryError::DuplicateGroup(spec.id));
        }
        self.groups.insert(
            spec.id.clone(),
            NavigationGroup {
                spec,
                entries: Vec::new(),
            },
        );
        Ok(())
    }

    /// Appends an always-visible node with the default order key.
    pub fn push(&mut self, group: &GroupId, node: impl Navigable + 'static) -> Result<NodeId, RegistryError> {
        self.insert(group, 0, VisibilityRule::Always, Box::new(node))
    }

    /// Appends a node that is only visible while `rule` holds.
    pub fn push_when(&mut self, group: &GroupId, rule: VisibilityRule, node: impl Navigable + 'static) -> Result<NodeId, RegistryError> {
        self.insert(group, 0, rule, Box::new(node))
    }

    /// Inserts a node at the position given by `order`; nodes sharing an
    /// order key keep their declaration order.
    pub fn insert(
        &mut self,
        group: &GroupId,
        order: i32,
        rule: VisibilityRule,
        node: Box<dyn Navigable>,
    ) -> Result<NodeId, RegistryError> {
        let id = node.id().clone();
        if let Some(owner) = self.owners.get(&id) {
            return Err(RegistryError::DuplicateNode {
                node: id,
                group: owner.clone(),
            });
        }
        let target = self.groups.get_mut(group).ok_or_else(|| RegistryError::UnknownGroup(group.clone()))?;
        let position = target.entries.partition_point(|entry| entry.order <= order);
        target.entries.insert(position, GroupEntry { order, rule, node });
        self.owners.insert(id.clone(), group.clone());
        debug!(node = %id, group = %group, order, "registered navigation node");
        Ok(id)
    }

    /// Removes a node, e.g. when its owning UI element is destroyed.
    pub fn remove(&mut self, id: &NodeId) -> Option<Box<dyn Navigable>> {
        let group = self.owners.remove(id)?;
        let entries = &mut self.groups.get_mut(&group)?.entries;
        let position = entries.iter().position(|entry| entry.node.id() == id)?;
        debug!(node = %id, group = %group, "removed navigation node");
        Some(entries.remove(position).node)
    }

    pub fn group(&self, id: &GroupId) -> Option<&NavigationGroup> {
        self.groups.get(id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &NavigationGroup> {
        self.groups.values()
    }

    pub fn group_of(&self, node: &NodeId) -> Option<&GroupId> {
        self.owners.get(node)
    }

    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut FeatureFlags {
        &mut self.flags
    }

    /// Ids of the currently visible nodes of `group`, in navigation order.
    pub fn visible_nodes(&self, group: &GroupId) -> Vec<NodeId> {
        self.groups
            .get(group)
            .map(|group| group.visible(&self.flags).map(|entry| entry.node.id().clone()).collect())
            .unwrap_or_default()
    }

    /// Highest valid index of `group`, or `None` when nothing is visible.
    pub fn max_index(&self, group: &GroupId) -> Option<usize> {
        let group = self.groups.get(group)?;
        group.visible(&self.flags).count().checked_sub(1)
    }

    pub fn element_at(&self, group: &GroupId, index: usize) -> Option<NodeId> {
        let group = self.groups.get(group)?;
        group.visible(&self.flags).nth(index).map(|entry| entry.node.id().clone())
    }

    pub fn index_of(&self, group: &GroupId, node: &NodeId) -> Option<usize> {
        let group = self.groups.get(group)?;
        group.visible(&self.flags).position(|entry| entry.node.id() == node)
    }

    /// Whether `node` currently occupies an index in its group.
    pub fn is_visible(&self, node: &NodeId) -> bool {
        self.group_of(node)
            .is_some_and(|group| self.index_of(group, node).is_some())
    }

    /// Resolves the sibling `step` positions away from `from`, applying the
    /// group's wrap/clamp policy. Returns `None` when the move would leave a
    /// clamped group, when `from` is not visible in `group`, or when the
    /// move would land on `from` itself.
    pub fn neighbour(&self, group: &GroupId, from: &NodeId, step: i32) -> Option<NodeId> {
        let policy = self.groups.get(group)?.policy();
        let visible = self.visible_nodes(group);
        let index = visible.iter().position(|id| id == from)? as i64;
        let len = visible.len() as i64;
        let target = index + i64::from(step);
        let resolved = match policy {
            WrapPolicy::Clamp if (0..len).contains(&target) => target,
            WrapPolicy::Clamp => return None,
            WrapPolicy::Wrap => target.rem_euclid(len),
        };
        let candidate = &visible[resolved as usize];
        (candidate != from).then(|| candidate.clone())
    }

    pub fn node(&self, id: &NodeId) -> Option<&dyn Navigable> {
        let group = self.owners.get(id)?;
        self.groups
            .get(group)?
            .entries
            .iter()
            .find(|entry| entry.node.id() == id)
            .map(|entry| entry.node.as_ref())
    }

    /// Runs `f` with mutable access to a node and the feature flags.
    pub fn with_node<R>(&mut self, id: &NodeId, f: impl FnOnce(&mut dyn Navigable, &mut FeatureFlags) -> R) -> Option<R> {
        let group = self.owners.get(id)?;
        let entry = self
            .groups
            .get_mut(group)?
            .entries
            .iter_mut()
            .find(|entry| entry.node.id() == id)?;
        Some(f(entry.node.as_mut(), &mut self.flags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NavContext;

    struct Plain(NodeId);

    impl Navigable for Plain {
        fn id(&self) -> &NodeId {
            &self.0
        }

        fn activate(&mut self, _ctx: &mut NavContext<'_>) {}
    }

    fn plain(id: &str) -> Box<dyn Navigable> {
        Box::new(Plain(NodeId::from(id)))
    }

    fn registry_with(group: &GroupId, spec: GroupSpec) -> NavigationRegistry {
        let mut registry = NavigationRegistry::new();
        registry.add_group(spec).expect("add group");
        assert!(registry.group(group).is_some());
        registry
    }

    #[test]
    fn order_keys_sort_and_ties_keep_declaration_order() {
        let group = GroupId::from("main");
        let mut registry = registry_with(&group, GroupSpec::new("main"));
        registry.insert(&group, 10, VisibilityRule::Always, plain("late")).expect("insert");
        registry.insert(&group, 0, VisibilityRule::Always, plain("first")).expect("insert");
        registry.insert(&group, 0, VisibilityRule::Always, plain("second")).expect("insert");
        registry.insert(&group, 5, VisibilityRule::Always, plain("middle")).expect("insert");

        let ids: Vec<String> = registry.visible_nodes(&group).iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, ["first", "second", "middle", "late"]);
    }

    #[test]
    fn hidden_entries_do_not_occupy_indices() {
        let group = GroupId::from("gpu");
        let mut registry = registry_with(&group, GroupSpec::new("gpu"));
        registry.insert(&group, 0, VisibilityRule::Always, plain("resolution")).expect("insert");
        registry.insert(&group, 0, VisibilityRule::flag("amd"), plain("rsr")).expect("insert");
        registry.insert(&group, 0, VisibilityRule::Always, plain("audio")).expect("insert");

        assert_eq!(registry.max_index(&group), Some(1));
        assert_eq!(registry.element_at(&group, 1), Some(NodeId::from("audio")));
        assert!(!registry.is_visible(&NodeId::from("rsr")));

        registry.flags_mut().set("amd", true);
        assert_eq!(registry.max_index(&group), Some(2));
        assert_eq!(registry.element_at(&group, 1), Some(NodeId::from("rsr")));
        assert_eq!(registry.index_of(&group, &NodeId::from("audio")), Some(2));
    }

    #[test]
    fn mapping_is_stable_while_flags_are_unchanged() {
        let group = GroupId::from("main");
        let mut registry = registry_with(&group, GroupSpec::new("main"));
        for (id, flag) in [("a", "x"), ("b", "y"), ("c", "x"), ("d", "z")] {
            registry.insert(&group, 0, VisibilityRule::flag(flag), plain(id)).expect("insert");
        }
        registry.flags_mut().extend([("x", true), ("z", true)]);
        let first = registry.visible_nodes(&group);
        let second = registry.visible_nodes(&group);
        assert_eq!(first, second);
        assert_eq!(first, vec![NodeId::from("a"), NodeId::from("c"), NodeId::from("d")]);
    }

    #[test]
    fn empty_group_has_no_max_index() {
        let group = GroupId::from("empty");
        let registry = registry_with(&group, GroupSpec::new("empty"));
        assert_eq!(registry.max_index(&group), None);
        assert_eq!(registry.element_at(&group, 0), None);
    }

    #[test]
    fn neighbour_clamps_or_wraps_per_group() {
        let list = GroupId::from("list");
        let ring = GroupId::from("ring");
        let mut registry = NavigationRegistry::new();
        registry.add_group(GroupSpec::new("list")).expect("add");
        registry.add_group(GroupSpec::new("ring").policy(WrapPolicy::Wrap)).expect("add");
        for id in ["l0", "l1", "l2"] {
            registry.insert(&list, 0, VisibilityRule::Always, plain(id)).expect("insert");
        }
        for id in ["r0", "r1", "r2"] {
            registry.insert(&ring, 0, VisibilityRule::Always, plain(id)).expect("insert");
        }

        assert_eq!(registry.neighbour(&list, &NodeId::from("l2"), 1), None);
        assert_eq!(registry.neighbour(&list, &NodeId::from("l0"), -1), None);
        assert_eq!(registry.neighbour(&list, &NodeId::from("l0"), 1), Some(NodeId::from("l1")));
        assert_eq!(registry.neighbour(&ring, &NodeId::from("r2"), 1), Some(NodeId::from("r0")));
        assert_eq!(registry.neighbour(&ring, &NodeId::from("r0"), -1), Some(NodeId::from("r2")));
    }

    #[test]
    fn duplicate_ids_and_unknown_groups_are_rejected() {
        let group = GroupId::from("main");
        let mut registry = registry_with(&group, GroupSpec::new("main"));
        registry.insert(&group, 0, VisibilityRule::Always, plain("tdp")).expect("insert");

        let duplicate = registry.insert(&group, 0, VisibilityRule::Always, plain("tdp"));
        assert_eq!(
            duplicate.unwrap_err(),
            RegistryError::DuplicateNode {
                node: NodeId::from("tdp"),
                group: group.clone()
            }
        );
        let unknown = registry.insert(&GroupId::from("nope"), 0, VisibilityRule::Always, plain("x"));
        assert_eq!(unknown.unwrap_err(), RegistryError::UnknownGroup(GroupId::from("nope")));
        assert_eq!(
            registry.add_group(GroupSpec::new("main")).unwrap_err(),
            RegistryError::DuplicateGroup(group)
        );
    }

    #[test]
    fn removed_nodes_leave_the_group() {
        let group = GroupId::from("main");
        let mut registry = registry_with(&group, GroupSpec::new("main"));
        registry.insert(&group, 0, VisibilityRule::Always, plain("a")).expect("insert");
        registry.insert(&group, 0, VisibilityRule::Always, plain("b")).expect("insert");

        let removed = registry.remove(&NodeId::from("a")).expect("node removed");
        assert_eq!(removed.id(), &NodeId::from("a"));
        assert_eq!(registry.visible_nodes(&group), vec![NodeId::from("b")]);
        assert!(registry.group_of(&NodeId::from("a")).is_none());
        registry.insert(&group, 0, VisibilityRule::Always, plain("a")).expect("id reusable after removal");
    }
}
