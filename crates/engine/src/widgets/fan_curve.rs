use padnav_types::{Direction, Directional, NodeId, SliderState};
use rat_focus::FocusFlag;
use tracing::{debug, warn};

use super::highlight_flag;
use crate::hardware::HardwareService;
use crate::node::{NavContext, Navigable, NodeSnapshot, SliderLike};

pub const FAN_CURVE_POINTS: usize = 5;

/// One control point: fan duty at a temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurvePoint {
    pub temp_c: u8,
    pub speed_pct: u8,
}

/// Five-point temperature to fan-speed curve. Speeds never decrease as
/// temperature rises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanCurve {
    points: [CurvePoint; FAN_CURVE_POINTS],
}

impl Default for FanCurve {
    fn default() -> Self {
        Self::new([(40, 20), (50, 35), (60, 50), (70, 70), (85, 100)])
    }
}

impl FanCurve {
    /// Builds a curve from `(temp_c, speed_pct)` pairs. Points are sorted by
    /// temperature and speeds are raised where needed to stay monotonic.
    pub fn new(points: [(u8, u8); FAN_CURVE_POINTS]) -> Self {
        let mut points = points.map(|(temp_c, speed_pct)| CurvePoint {
            temp_c,
            speed_pct: speed_pct.min(100),
        });
        points.sort_by_key(|point| point.temp_c);
        for index in 1..FAN_CURVE_POINTS {
            points[index].speed_pct = points[index].speed_pct.max(points[index - 1].speed_pct);
        }
        Self { points }
    }

    pub fn points(&self) -> &[CurvePoint; FAN_CURVE_POINTS] {
        &self.points
    }

    /// Linear interpolation between the surrounding points; flat beyond
    /// either end.
    pub fn speed_at(&self, temp_c: u8) -> u8 {
        let first = self.points[0];
        if temp_c <= first.temp_c {
            return first.speed_pct;
        }
        let last = self.points[FAN_CURVE_POINTS - 1];
        if temp_c >= last.temp_c {
            return last.speed_pct;
        }
        for window in self.points.windows(2) {
            let (low, high) = (window[0], window[1]);
            if temp_c >= low.temp_c && temp_c <= high.temp_c {
                let span = f32::from(high.temp_c - low.temp_c);
                if span <= f32::EPSILON {
                    return high.speed_pct;
                }
                let ratio = f32::from(temp_c - low.temp_c) / span;
                let delta = f32::from(high.speed_pct) - f32::from(low.speed_pct);
                return (f32::from(low.speed_pct) + ratio * delta).round() as u8;
            }
        }
        first.speed_pct
    }

    /// Sets the speed of point `index`, bounded by its neighbours so the
    /// curve stays monotonic. Returns the speed actually stored.
    pub fn set_speed(&mut self, index: usize, speed_pct: i32) -> u8 {
        let floor = if index == 0 { 0 } else { self.points[index - 1].speed_pct };
        let ceiling = self.points.get(index + 1).map_or(100, |next| next.speed_pct);
        let speed = speed_pct.clamp(i32::from(floor), i32::from(ceiling)) as u8;
        self.points[index].speed_pct = speed;
        speed
    }
}

/// Fan curve editor.
///
/// A multi-cell leaf: Left/Right move an internal cursor around the five
/// control points, wrapping at either end, without moving group focus.
/// Activate toggles adjust mode, in which Left/Right change the selected
/// point's speed instead.
pub struct FanCurveNode {
    id: NodeId,
    label: String,
    curve: FanCurve,
    cursor: usize,
    step: u8,
    adjusting: bool,
    service: Option<Box<dyn HardwareService<FanCurve>>>,
    focus: FocusFlag,
}

impl FanCurveNode {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, curve: FanCurve) -> Self {
        let id = id.into();
        Self {
            focus: highlight_flag(&id),
            id,
            label: label.into(),
            curve,
            cursor: 0,
            step: 5,
            adjusting: false,
            service: None,
        }
    }

    pub fn with_step(mut self, step: u8) -> Self {
        self.step = step.max(1);
        self
    }

    pub fn with_service(mut self, service: impl HardwareService<FanCurve> + 'static) -> Self {
        if let Some(curve) = service.query() {
            self.curve = curve;
        }
        self.service = Some(Box::new(service));
        self
    }

    pub fn curve(&self) -> &FanCurve {
        &self.curve
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Navigable for FanCurveNode {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn directional(&self) -> Directional {
        Directional::horizontal(true, true)
    }

    fn handle_direction(&mut self, direction: Direction, _ctx: &mut NavContext<'_>) {
        if direction.is_vertical() {
            return;
        }
        let len = FAN_CURVE_POINTS as i32;
        self.cursor = (self.cursor as i32 + direction.step()).rem_euclid(len) as usize;
    }

    fn activate(&mut self, _ctx: &mut NavContext<'_>) {
        self.adjusting = !self.adjusting;
        debug!(node = %self.id, point = self.cursor, adjusting = self.adjusting, "fan curve adjust mode toggled");
    }

    fn focus_received(&mut self) {
        self.focus.set(true);
    }

    fn focus_lost(&mut self) {
        self.adjusting = false;
        self.focus.set(false);
    }

    fn as_slider_mut(&mut self) -> Option<&mut dyn SliderLike> {
        Some(self)
    }

    fn snapshot(&self) -> NodeSnapshot {
        let cells: Vec<String> = self
            .curve
            .points()
            .iter()
            .enumerate()
            .map(|(index, point)| match (index == self.cursor, self.adjusting) {
                (true, true) => format!("<{}%@{}C>", point.speed_pct, point.temp_c),
                (true, false) => format!("[{}%@{}C]", point.speed_pct, point.temp_c),
                _ => format!("{}%@{}C", point.speed_pct, point.temp_c),
            })
            .collect();
        NodeSnapshot::new(&self.label)
            .with_value(cells.join(" "))
            .highlighted(self.focus.get())
    }
}

impl SliderLike for FanCurveNode {
    fn slider_state(&self) -> SliderState {
        SliderState {
            is_slider_now: true,
            is_activated: self.adjusting,
        }
    }

    fn adjust(&mut self, steps: i32, ctx: &mut NavContext<'_>) {
        let previous = self.curve.clone();
        let current = i32::from(previous.points()[self.cursor].speed_pct);
        self.curve.set_speed(self.cursor, current + steps * i32::from(self.step));
        if self.curve == previous {
            return;
        }
        if let Some(service) = self.service.as_mut() {
            let outcome = service.apply(&self.curve);
            ctx.report(&outcome);
            if !outcome.success {
                warn!(node = %self.id, point = self.cursor, message = %outcome.message, "fan curve apply failed; reverting");
                self.curve = previous;
            }
        }
    }

    fn deactivate(&mut self) {
        self.adjusting = false;
    }
}
