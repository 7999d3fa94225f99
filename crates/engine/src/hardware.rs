//! Contract between value-bearing widgets and the hardware services they
//! drive (TDP, fan, GPU features, display, audio).

use std::cell::RefCell;
use std::rc::Rc;

pub use padnav_types::ApplyOutcome;

/// A hardware-backed setting of type `V`.
///
/// Widgets call [`HardwareService::apply`] from inside their activation or
/// adjust callbacks. When `success` is `false` the widget keeps (or
/// restores) its previous value; the service is never retried.
pub trait HardwareService<V> {
    fn apply(&mut self, value: &V) -> ApplyOutcome;

    /// Current hardware value, or `None` when it cannot be read.
    fn query(&self) -> Option<V>;
}

impl<V, S: HardwareService<V>> HardwareService<V> for Rc<RefCell<S>> {
    fn apply(&mut self, value: &V) -> ApplyOutcome {
        self.borrow_mut().apply(value)
    }

    fn query(&self) -> Option<V> {
        self.borrow().query()
    }
}
