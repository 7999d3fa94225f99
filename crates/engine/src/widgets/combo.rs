use padnav_types::{ComboState, NodeId};
use rat_focus::FocusFlag;
use tracing::{debug, warn};

use super::highlight_flag;
use crate::hardware::HardwareService;
use crate::node::{ComboLike, NavContext, Navigable, NodeSnapshot};

/// Drop-down selector (resolution, refresh rate, upscaling mode).
///
/// Activate opens the list; while open Up/Down move the highlight and a
/// second Activate confirms it. Back (or losing focus) closes the list
/// without applying anything.
pub struct ComboNode {
    id: NodeId,
    label: String,
    options: Vec<String>,
    selected: usize,
    // `Some` while the drop-down is open.
    highlighted: Option<usize>,
    service: Option<Box<dyn HardwareService<usize>>>,
    focus: FocusFlag,
}

impl ComboNode {
    pub fn new<I, S>(id: impl Into<NodeId>, label: impl Into<String>, options: I, selected: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let selected = selected.min(options.len().saturating_sub(1));
        Self {
            focus: highlight_flag(&id),
            id,
            label: label.into(),
            options,
            selected,
            highlighted: None,
            service: None,
        }
    }

    pub fn with_service(mut self, service: impl HardwareService<usize> + 'static) -> Self {
        if let Some(index) = service.query()
            && index < self.options.len()
        {
            self.selected = index;
        }
        self.service = Some(Box::new(service));
        self
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.options.get(self.selected).map(String::as_str)
    }

    pub fn is_open(&self) -> bool {
        self.highlighted.is_some()
    }

    fn confirm(&mut self, choice: usize, ctx: &mut NavContext<'_>) {
        self.highlighted = None;
        if choice == self.selected {
            return;
        }
        let previous = self.selected;
        self.selected = choice;
        if let Some(service) = self.service.as_mut() {
            let outcome = service.apply(&choice);
            ctx.report(&outcome);
            if !outcome.success {
                warn!(node = %self.id, choice, message = %outcome.message, "combo apply failed; reverting");
                self.selected = previous;
            }
        }
    }
}

impl Navigable for ComboNode {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn activate(&mut self, ctx: &mut NavContext<'_>) {
        match self.highlighted {
            Some(choice) => self.confirm(choice, ctx),
            None if !self.options.is_empty() => {
                self.highlighted = Some(self.selected);
                debug!(node = %self.id, "combo opened");
            }
            None => {}
        }
    }

    fn focus_received(&mut self) {
        self.focus.set(true);
    }

    fn focus_lost(&mut self) {
        self.highlighted = None;
        self.focus.set(false);
    }

    fn as_combo_mut(&mut self) -> Option<&mut dyn ComboLike> {
        Some(self)
    }

    fn snapshot(&self) -> NodeSnapshot {
        let value = match self.highlighted {
            Some(choice) => format!("v {}", self.options.get(choice).map(String::as_str).unwrap_or_default()),
            None => self.selected_label().unwrap_or_default().to_owned(),
        };
        NodeSnapshot::new(&self.label).with_value(value).highlighted(self.focus.get())
    }
}

impl ComboLike for ComboNode {
    fn combo_state(&self) -> ComboState {
        ComboState {
            has_open_combo: self.highlighted.is_some(),
            is_navigating_combo: self.highlighted.is_some_and(|choice| choice != self.selected),
        }
    }

    fn move_selection(&mut self, delta: i32) {
        let Some(choice) = self.highlighted else {
            return;
        };
        let last = self.options.len().saturating_sub(1) as i64;
        let next = (choice as i64 + i64::from(delta)).clamp(0, last);
        self.highlighted = Some(next as usize);
    }

    fn cancel(&mut self) {
        self.highlighted = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::testing::{Harness, recorder};

    fn resolutions() -> ComboNode {
        ComboNode::new("resolution", "Resolution", ["1920x1080", "1600x900", "1280x720"], 0)
    }

    #[test]
    fn open_navigate_confirm() {
        let service = recorder::<usize>();
        let mut combo = resolutions().with_service(service.clone());
        let mut harness = Harness::default();

        combo.activate(&mut harness.ctx());
        assert!(combo.combo_state().has_open_combo);
        combo.move_selection(1);
        combo.move_selection(1);
        combo.move_selection(1);
        assert!(combo.combo_state().is_navigating_combo);
        combo.activate(&mut harness.ctx());

        assert!(!combo.is_open());
        assert_eq!(combo.selected_label(), Some("1280x720"));
        assert_eq!(service.borrow().applied, vec![2]);
    }

    #[test]
    fn cancel_discards_the_highlight() {
        let mut combo = resolutions();
        let mut harness = Harness::default();
        combo.activate(&mut harness.ctx());
        combo.move_selection(1);
        combo.cancel();
        assert_eq!(combo.selected(), 0);
        assert!(!combo.combo_state().has_open_combo);
    }

    #[test]
    fn failed_confirm_keeps_previous_choice() {
        let service = recorder::<usize>();
        service.borrow_mut().fail = true;
        let mut combo = resolutions().with_service(service);
        let mut harness = Harness::default();
        combo.activate(&mut harness.ctx());
        combo.move_selection(1);
        combo.activate(&mut harness.ctx());
        assert_eq!(combo.selected(), 0);
        assert!(!combo.is_open());
    }
}
