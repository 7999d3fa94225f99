use std::ops::RangeInclusive;

use padnav_types::{Direction, Directional, NodeId};
use rat_focus::FocusFlag;
use tracing::warn;

use super::{highlight_flag, ordered_range};
use crate::hardware::HardwareService;
use crate::node::{NavContext, Navigable, NodeSnapshot};

/// Slider without an adjust mode.
///
/// Left/Right step the value directly; the node only claims a direction
/// while there is room to move that way, so at either bound the event
/// falls through to the router. Activate advances one step and cycles back
/// to the minimum past the maximum.
pub struct StepperNode {
    id: NodeId,
    label: String,
    value: i32,
    range: RangeInclusive<i32>,
    step: i32,
    unit: Option<String>,
    service: Option<Box<dyn HardwareService<i32>>>,
    focus: FocusFlag,
}

impl StepperNode {
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

    fn set_value(&mut self, next: i32, ctx: &mut NavContext<'_>) {
        let previous = self.value;
        if next == previous {
            return;
        }
        self.value = next;
        if let Some(service) = self.service.as_mut() {
            let outcome = service.apply(&next);
            ctx.report(&outcome);
            if !outcome.success {
                warn!(node = %self.id, value = next, message = %outcome.message, "stepper apply failed; reverting");
                self.value = previous;
            }
        }
    }
}

impl Navigable for StepperNode {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn directional(&self) -> Directional {
        Directional::horizontal(self.value > *self.range.start(), self.value < *self.range.end())
    }

    fn handle_direction(&mut self, direction: Direction, ctx: &mut NavContext<'_>) {
        if direction.is_vertical() {
            return;
        }
        let next = self
            .value
            .saturating_add(direction.step().saturating_mul(self.step))
            .clamp(*self.range.start(), *self.range.end());
        self.set_value(next, ctx);
    }

    fn activate(&mut self, ctx: &mut NavContext<'_>) {
        let next = if self.value >= *self.range.end() {
            *self.range.start()
        } else {
            (self.value + self.step).min(*self.range.end())
        };
        self.set_value(next, ctx);
    }

    fn focus_received(&mut self) {
        self.focus.set(true);
    }

    fn focus_lost(&mut self) {
        self.focus.set(false);
    }

    fn snapshot(&self) -> NodeSnapshot {
        let value = match &self.unit {
            Some(unit) => format!("{} {unit}", self.value),
            None => self.value.to_string(),
        };
        NodeSnapshot::new(&self.label).with_value(value).highlighted(self.focus.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::testing::Harness;

    #[test]
    fn inverted_range_is_reordered() {
        let stepper = StepperNode::new("volume", "Volume", -5, 100..=0);
        assert_eq!(stepper.value(), 0);
        assert_eq!(stepper.directional(), Directional::horizontal(false, true));
    }

    #[test]
    fn claims_directions_only_with_room_to_move() {
        let at_min = StepperNode::new("volume", "Volume", 0, 0..=100);
        assert_eq!(at_min.directional(), Directional::horizontal(false, true));
        let at_max = StepperNode::new("volume", "Volume", 100, 0..=100);
        assert_eq!(at_max.directional(), Directional::horizontal(true, false));
    }

    #[test]
    fn activate_cycles_past_the_maximum() {
        let mut stepper = StepperNode::new("volume", "Volume", 90, 0..=100).with_step(10);
        let mut harness = Harness::default();
        stepper.activate(&mut harness.ctx());
        assert_eq!(stepper.value(), 100);
        stepper.activate(&mut harness.ctx());
        assert_eq!(stepper.value(), 0);
        stepper.handle_direction(Direction::Right, &mut harness.ctx());
        assert_eq!(stepper.value(), 10);
    }
}
