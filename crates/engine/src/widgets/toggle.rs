use padnav_types::NodeId;
use rat_focus::FocusFlag;
use tracing::warn;

use super::highlight_flag;
use crate::hardware::HardwareService;
use crate::node::{NavContext, Navigable, NodeSnapshot};

/// On/off switch. Activation flips the value through the hardware service
/// and, when configured, mirrors the new value into a feature flag so
/// dependent nodes appear or disappear.
pub struct ToggleNode {
    id: NodeId,
    label: String,
    value: bool,
    mirror_flag: Option<String>,
    service: Option<Box<dyn HardwareService<bool>>>,
    focus: FocusFlag,
}

impl ToggleNode {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, value: bool) -> Self {
        let id = id.into();
        Self {
            focus: highlight_flag(&id),
            id,
            label: label.into(),
            value,
            mirror_flag: None,
            service: None,
        }
    }

    /// Attaches a service; its current value, when readable, replaces the
    /// initial value.
    pub fn with_service(mut self, service: impl HardwareService<bool> + 'static) -> Self {
        if let Some(value) = service.query() {
            self.value = value;
        }
        self.service = Some(Box::new(service));
        self
    }

    /// Writes every successful change into feature flag `name`.
    pub fn mirror_flag(mut self, name: impl Into<String>) -> Self {
        self.mirror_flag = Some(name.into());
        self
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub fn focus_flag(&self) -> &FocusFlag {
        &self.focus
    }
}

impl Navigable for ToggleNode {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn activate(&mut self, ctx: &mut NavContext<'_>) {
        let previous = self.value;
        self.value = !previous;
        if let Some(service) = self.service.as_mut() {
            let outcome = service.apply(&self.value);
            ctx.report(&outcome);
            if !outcome.success {
                warn!(node = %self.id, message = %outcome.message, "toggle apply failed; reverting");
                self.value = previous;
                return;
            }
        }
        if let Some(flag) = &self.mirror_flag {
            ctx.set_flag(flag, self.value);
        }
    }

    fn focus_received(&mut self) {
        self.focus.set(true);
    }

    fn focus_lost(&mut self) {
        self.focus.set(false);
    }

    fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot::new(&self.label)
            .with_value(if self.value { "On" } else { "Off" })
            .highlighted(self.focus.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::testing::{Harness, recorder};

    #[test]
    fn activation_applies_and_mirrors_flag() {
        let service = recorder::<bool>();
        let mut toggle = ToggleNode::new("amd.rsr", "Radeon Super Resolution", false)
            .with_service(service.clone())
            .mirror_flag("amd.rsr.enabled");
        let mut harness = Harness::default();

        toggle.activate(&mut harness.ctx());

        assert!(toggle.value());
        assert_eq!(service.borrow().applied, vec![true]);
        assert!(harness.flags.get("amd.rsr.enabled"));
        assert_eq!(harness.status.as_deref(), Some("applied"));
    }

    #[test]
    fn failed_apply_reverts_and_leaves_flag() {
        let service = recorder::<bool>();
        service.borrow_mut().fail = true;
        let mut toggle = ToggleNode::new("hdr", "HDR", false)
            .with_service(service.clone())
            .mirror_flag("hdr.enabled");
        let mut harness = Harness::default();

        toggle.activate(&mut harness.ctx());

        assert!(!toggle.value());
        assert!(!harness.flags.get("hdr.enabled"));
        assert_eq!(harness.status.as_deref(), Some("device rejected value"));
    }

    #[test]
    fn focus_notifications_drive_highlight() {
        let mut toggle = ToggleNode::new("hdr", "HDR", true);
        toggle.focus_received();
        assert!(toggle.snapshot().highlighted);
        toggle.focus_lost();
        assert!(!toggle.focus_flag().get());
        assert_eq!(toggle.snapshot().value.as_deref(), Some("On"));
    }
}
