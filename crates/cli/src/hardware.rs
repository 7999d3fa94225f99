//! In-memory stand-ins for the device services a handheld exposes.

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use clap::ValueEnum;
use padnav_engine::widgets::FanCurve;
use padnav_engine::{FeatureFlags, HardwareService};
use padnav_types::ApplyOutcome;
use tracing::info;

/// Services that `--fail` can break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceKind {
    Tdp,
    Fan,
    Resolution,
    Volume,
    Hdr,
    Rsr,
    Sharpness,
    Afmf,
    AntiLag,
}

/// One simulated setting. Applies succeed unless the service was built
/// failing, in which case the stored value never changes.
#[derive(Debug)]
pub struct SimulatedService<V> {
    name: &'static str,
    value: V,
    failing: bool,
}

impl<V> SimulatedService<V> {
    pub fn new(name: &'static str, value: V, failing: bool) -> Self {
        Self { name, value, failing }
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<V: Clone + Debug> HardwareService<V> for SimulatedService<V> {
    fn apply(&mut self, value: &V) -> ApplyOutcome {
        if self.failing {
            return ApplyOutcome::failed(format!("{}: device rejected {value:?}", self.name));
        }
        info!(service = self.name, value = ?value, "hardware value applied");
        self.value = value.clone();
        ApplyOutcome::ok(String::new())
    }

    fn query(&self) -> Option<V> {
        Some(self.value.clone())
    }
}

pub type Shared<V> = Rc<RefCell<SimulatedService<V>>>;

fn shared<V>(name: &'static str, value: V, failing: &[ServiceKind], kind: ServiceKind) -> Shared<V> {
    Rc::new(RefCell::new(SimulatedService::new(name, value, failing.contains(&kind))))
}

/// The simulated handheld: a Radeon APU with an HDR-capable panel.
#[derive(Debug, Clone)]
pub struct SimulatedHardware {
    pub tdp: Shared<i32>,
    pub fan: Shared<FanCurve>,
    pub resolution: Shared<usize>,
    pub volume: Shared<i32>,
    pub hdr: Shared<bool>,
    pub rsr: Shared<bool>,
    pub sharpness: Shared<i32>,
    pub afmf: Shared<bool>,
    pub anti_lag: Shared<bool>,
}

impl SimulatedHardware {
    pub fn new(failing: &[ServiceKind]) -> Self {
        Self {
            tdp: shared("TDP", 15, failing, ServiceKind::Tdp),
            fan: shared("Fan curve", FanCurve::default(), failing, ServiceKind::Fan),
            resolution: shared("Resolution", 0, failing, ServiceKind::Resolution),
            volume: shared("Volume", 50, failing, ServiceKind::Volume),
            hdr: shared("HDR", false, failing, ServiceKind::Hdr),
            rsr: shared("Radeon Super Resolution", false, failing, ServiceKind::Rsr),
            sharpness: shared("RSR sharpness", 80, failing, ServiceKind::Sharpness),
            afmf: shared("Fluid Motion Frames", false, failing, ServiceKind::Afmf),
            anti_lag: shared("Anti-Lag", false, failing, ServiceKind::AntiLag),
        }
    }

    /// What the device reports about itself, before config overrides.
    pub fn discovered_flags(&self) -> FeatureFlags {
        [
            ("gpu.vendor.amd", true),
            ("display.hdr_capable", true),
            ("amd.rsr.supported", true),
            ("amd.rsr.enabled", *self.rsr.borrow().value()),
            ("amd.afmf.supported", true),
            ("amd.antilag.supported", true),
        ]
        .into_iter()
        .collect()
    }
}
