use std::ops::RangeInclusive;

use padnav_types::{NodeId, SliderState};
use rat_focus::FocusFlag;
use tracing::{debug, warn};

use super::{highlight_flag, ordered_range};
use crate::hardware::HardwareService;
use crate::node::{NavContext, Navigable, NodeSnapshot, SliderLike};

/// Slider with a modal adjust mode.
///
/// Activate toggles adjust mode; while it is on, Left/Right change the
/// value one step at a time and each step is applied immediately. Losing
/// focus always leaves adjust mode.
pub struct SliderNode {
    id: NodeId,
    label: String,
    value: i32,
    range: RangeInclusive<i32>,
    step: i32,
    unit: Option<String>,
    activated: bool,
    service: Option<Box<dyn HardwareService<i32>>>,
    focus: FocusFlag,
}

impl SliderNode {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, value: i32, range: RangeInclusive<i32>) -> Self {
        let id = id.into();
        let range = ordered_range(range);
        Self {
            focus: highlight_flag(&id),
            id,
            label: label.into(),
            value: value.clamp(*range.start(), *range.end()),
            range,
            step: 1,
            unit: None,
            activated: false,
            service: None,
        }
    }

    pub fn with_step(mut self, step: i32) -> Self {
        self.step = step.max(1);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_service(mut self, service: impl HardwareService<i32> + 'static) -> Self {
        if let Some(value) = service.query() {
            self.value = value.clamp(*self.range.start(), *self.range.end());
        }
        self.service = Some(Box::new(service));
        self
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    fn display_value(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{} {unit}", self.value),
            None => self.value.to_string(),
        }
    }
}

impl Navigable for SliderNode {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn activate(&mut self, _ctx: &mut NavContext<'_>) {
        self.activated = !self.activated;
        debug!(node = %self.id, activated = self.activated, "slider adjust mode toggled");
    }

    fn focus_received(&mut self) {
        self.focus.set(true);
    }

    fn focus_lost(&mut self) {
        self.activated = false;
        self.focus.set(false);
    }

    fn as_slider_mut(&mut self) -> Option<&mut dyn SliderLike> {
        Some(self)
    }

    fn snapshot(&self) -> NodeSnapshot {
        let value = if self.activated {
            format!("< {} >", self.display_value())
        } else {
            self.display_value()
        };
        NodeSnapshot::new(&self.label).with_value(value).highlighted(self.focus.get())
    }
}

impl SliderLike for SliderNode {
    fn slider_state(&self) -> SliderState {
        SliderState {
            is_slider_now: true,
            is_activated: self.activated,
        }
    }

    fn adjust(&mut self, steps: i32, ctx: &mut NavContext<'_>) {
        let previous = self.value;
        let next = previous
            .saturating_add(steps.saturating_mul(self.step))
            .clamp(*self.range.start(), *self.range.end());
        if next == previous {
            return;
        }
        self.value = next;
        if let Some(service) = self.service.as_mut() {
            let outcome = service.apply(&next);
            ctx.report(&outcome);
            if !outcome.success {
                warn!(node = %self.id, value = next, message = %outcome.message, "slider apply failed; reverting");
                self.value = previous;
            }
        }
    }

    fn deactivate(&mut self) {
        self.activated = false;
    }
}
