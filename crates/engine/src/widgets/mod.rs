//! Reference controls built on the capability contract.
//!
//! Each widget keeps its own value, talks to an optional
//! [`HardwareService`](crate::HardwareService), and reverts its value when
//! an apply fails. Focus highlight is exposed through a `rat_focus`
//! [`FocusFlag`] toggled by `focus_received`/`focus_lost`.

mod button;
mod combo;
mod expander;
mod fan_curve;
mod slider;
mod stepper;
mod toggle;

pub use button::ButtonNode;
pub use combo::ComboNode;
pub use expander::ExpanderNode;
pub use fan_curve::{CurvePoint, FAN_CURVE_POINTS, FanCurve, FanCurveNode};
pub use slider::SliderNode;
pub use stepper::StepperNode;
pub use toggle::ToggleNode;

use std::ops::RangeInclusive;

use padnav_types::NodeId;
use rat_focus::FocusFlag;

fn highlight_flag(id: &NodeId) -> FocusFlag {
    FocusFlag::new().with_name(id.as_str())
}

/// Accepts bounds in either order, so `30..=5` means `5..=30`.
fn ordered_range(range: RangeInclusive<i32>) -> RangeInclusive<i32> {
    let (start, end) = range.into_inner();
    start.min(end)..=start.max(end)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use padnav_types::{ApplyOutcome, NavEvent};

    use crate::flags::FeatureFlags;
    use crate::hardware::HardwareService;
    use crate::node::NavContext;

    /// Owns the pieces a `NavContext` borrows.
    #[derive(Default)]
    pub(crate) struct Harness {
        pub flags: FeatureFlags,
        pub posted: VecDeque<NavEvent>,
        pub status: Option<String>,
    }

    impl Harness {
        pub fn ctx(&mut self) -> NavContext<'_> {
            NavContext::new(&mut self.flags, &mut self.posted, &mut self.status)
        }
    }

    /// Records applied values; fails every apply while `fail` is set.
    pub(crate) struct Recorder<V> {
        pub applied: Vec<V>,
        pub fail: bool,
        pub current: Option<V>,
    }

    impl<V> Default for Recorder<V> {
        fn default() -> Self {
            Self {
                applied: Vec::new(),
                fail: false,
                current: None,
            }
        }
    }

    pub(crate) fn recorder<V>() -> Rc<RefCell<Recorder<V>>> {
        Rc::new(RefCell::new(Recorder::default()))
    }

    impl<V: Clone> HardwareService<V> for Recorder<V> {
        fn apply(&mut self, value: &V) -> ApplyOutcome {
            if self.fail {
                return ApplyOutcome::failed("device rejected value");
            }
            self.applied.push(value.clone());
            self.current = Some(value.clone());
            ApplyOutcome::ok("applied")
        }

        fn query(&self) -> Option<V> {
            self.current.clone()
        }
    }
}
