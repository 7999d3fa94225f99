//! # Padnav Engine
//!
//! Directional focus and input routing for controller-driven settings
//! panels. A game controller produces six abstract events (four
//! directions, Activate, Back); this crate decides, for each one, whether
//! the focused control consumes it or focus moves to another control.
//!
//! ## Architecture
//!
//! - **`node`**: the capability contract ([`Navigable`] plus the optional
//!   [`SliderLike`], [`ComboLike`] and [`Container`] refinements)
//! - **`flags`**: feature flags and declarative [`VisibilityRule`]s
//! - **`registry`**: ordered navigation groups with per-group wrap/clamp
//!   policy and dynamic visibility
//! - **`router`**: [`GamepadNavigationService`], the single owner of focus
//!   and modal sub-state for a navigation root
//! - **`scope`**: the stack of containers focus has descended into
//! - **`widgets`**: reference controls (toggle, slider, stepper, combo,
//!   button, expander, fan curve) wired to [`HardwareService`]s
//!
//! ## Usage
//!
//! ```rust
//! use padnav_engine::widgets::{ButtonNode, SliderNode, ToggleNode};
//! use padnav_engine::{GroupSpec, NavigationRegistry, NavigationRoot};
//! use padnav_types::NavEvent;
//!
//! let mut registry = NavigationRegistry::new();
//! let main = padnav_types::GroupId::from("main");
//! registry.add_group(GroupSpec::new("main"))?;
//! registry.push(&main, ToggleNode::new("hdr", "HDR", false))?;
//! registry.push(&main, SliderNode::new("tdp", "TDP", 15, 5..=30))?;
//! registry.push(&main, ButtonNode::new("reset", "Reset", |_| {}))?;
//!
//! let mut root = NavigationRoot::new(registry, "main");
//! root.focus_first();
//! root.press(NavEvent::Down);
//! assert_eq!(root.current().map(|id| id.as_str()), Some("tdp"));
//! # Ok::<(), padnav_engine::RegistryError>(())
//! ```

pub mod flags;
pub mod focus;
pub mod hardware;
pub mod node;
pub mod registry;
pub mod root;
pub mod router;
pub mod scope;
pub mod widgets;

pub use flags::{FeatureFlags, VisibilityRule};
pub use focus::FocusState;
pub use hardware::HardwareService;
pub use node::{ComboLike, Container, NavContext, Navigable, NodeSnapshot, SliderLike, modal_state_of};
pub use registry::{GroupSpec, NavigationGroup, NavigationRegistry, RegistryError};
pub use root::NavigationRoot;
pub use router::{DispatchOutcome, GamepadNavigationService};
pub use scope::{ScopeFrame, ScopeStack};
