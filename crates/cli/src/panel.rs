//! Assembly and plain-text presentation of the demo control panel.

use padnav_engine::widgets::{ButtonNode, ComboNode, ExpanderNode, FanCurveNode, SliderNode, StepperNode, ToggleNode};
use padnav_engine::{FeatureFlags, GroupSpec, NavigationRegistry, NavigationRoot, RegistryError, VisibilityRule};
use padnav_types::{GroupAxis, GroupId, ModalState, NavEvent, WrapPolicy};

use crate::hardware::SimulatedHardware;

pub const MAIN_GROUP: &str = "main";
pub const AMD_GROUP: &str = "amd";
pub const PRESET_GROUP: &str = "presets";

const RESOLUTIONS: [&str; 3] = ["1280x800", "1920x1200", "2560x1600"];
const PRESETS: [(&str, &str); 3] = [("preset.silent", "Silent"), ("preset.balanced", "Balanced"), ("preset.turbo", "Turbo")];

/// Builds the navigation root for `hardware` with `flags` deciding which
/// optional sections exist.
pub fn build_panel(hardware: &SimulatedHardware, flags: FeatureFlags) -> Result<NavigationRoot, RegistryError> {
    let main = GroupId::from(MAIN_GROUP);
    let amd = GroupId::from(AMD_GROUP);
    let presets = GroupId::from(PRESET_GROUP);

    let mut registry = NavigationRegistry::with_flags(flags);
    registry.add_group(GroupSpec::new(MAIN_GROUP))?;
    registry.add_group(GroupSpec::new(AMD_GROUP))?;
    registry.add_group(GroupSpec::new(PRESET_GROUP).axis(GroupAxis::Horizontal).policy(WrapPolicy::Wrap))?;

    registry.push(
        &main,
        SliderNode::new("tdp", "TDP", 15, 5..=30)
            .with_unit("W")
            .with_service(hardware.tdp.clone()),
    )?;
    registry.push(&main, FanCurveNode::new("fan", "Fan curve", Default::default()).with_service(hardware.fan.clone()))?;
    registry.push(
        &main,
        ComboNode::new("resolution", "Resolution", RESOLUTIONS, 0).with_service(hardware.resolution.clone()),
    )?;
    registry.push(
        &main,
        StepperNode::new("volume", "Volume", 50, 0..=100)
            .with_step(5)
            .with_unit("%")
            .with_service(hardware.volume.clone()),
    )?;
    registry.push_when(
        &main,
        VisibilityRule::flag("display.hdr_capable"),
        ToggleNode::new("hdr", "HDR", false).with_service(hardware.hdr.clone()),
    )?;
    registry.push_when(
        &main,
        VisibilityRule::flag("gpu.vendor.amd"),
        ExpanderNode::new("amd.section", "AMD Radeon", AMD_GROUP),
    )?;
    registry.push(&main, ExpanderNode::new("presets.section", "Performance presets", PRESET_GROUP))?;

    registry.push_when(
        &amd,
        VisibilityRule::flag("amd.rsr.supported"),
        ToggleNode::new("amd.rsr", "Radeon Super Resolution", false)
            .with_service(hardware.rsr.clone())
            .mirror_flag("amd.rsr.enabled"),
    )?;
    registry.push_when(
        &amd,
        VisibilityRule::all_flags(["amd.rsr.supported", "amd.rsr.enabled"]),
        SliderNode::new("amd.rsr.sharpness", "Sharpness", 80, 0..=100)
            .with_step(10)
            .with_unit("%")
            .with_service(hardware.sharpness.clone()),
    )?;
    registry.push_when(
        &amd,
        VisibilityRule::flag("amd.afmf.supported"),
        ToggleNode::new("amd.afmf", "Fluid Motion Frames", false).with_service(hardware.afmf.clone()),
    )?;
    registry.push_when(
        &amd,
        VisibilityRule::flag("amd.antilag.supported"),
        ToggleNode::new("amd.antilag", "Anti-Lag", false).with_service(hardware.anti_lag.clone()),
    )?;

    for (id, label) in PRESETS {
        registry.push(
            &presets,
            ButtonNode::new(id, label, move |ctx| {
                ctx.set_status(format!("{label} preset selected"));
                ctx.post(NavEvent::Back);
            }),
        )?;
    }

    Ok(NavigationRoot::new(registry, MAIN_GROUP))
}

/// Renders the visible panel, nested sections indented under their
/// expander, followed by the mode and status lines.
pub fn render(root: &NavigationRoot, status: Option<&str>) -> String {
    let mut lines = Vec::new();
    render_group(root, &GroupId::from(MAIN_GROUP), 0, &mut lines);

    let mode = match root.service.modal() {
        ModalState::Idle => "navigate",
        ModalState::SliderAdjusting => "adjust (left/right to change, A or B to finish)",
        ModalState::ComboOpen => "choose (up/down to pick, A to confirm, B to cancel)",
    };
    lines.push(String::new());
    lines.push(format!("mode: {mode}"));
    if let Some(status) = status {
        lines.push(format!("status: {status}"));
    }
    lines.join("\n")
}

fn render_group(root: &NavigationRoot, group: &GroupId, depth: usize, lines: &mut Vec<String>) {
    for (id, snapshot) in root.visible_snapshots(group) {
        let marker = if snapshot.highlighted { '>' } else { ' ' };
        let indent = "  ".repeat(depth);
        let label = format!("{indent}{}", snapshot.label);
        match &snapshot.value {
            Some(value) => lines.push(format!("{marker} {label:<28} {value}")),
            None => lines.push(format!("{marker} {label}")),
        }

        let child = root
            .registry
            .node(&id)
            .and_then(|node| node.as_container())
            .filter(|container| container.is_expanded())
            .map(|container| container.child_group().clone());
        if let Some(child) = child {
            render_group(root, &child, depth + 1, lines);
        }
    }
}
