//! # Padnav Types
//!
//! Shared vocabulary for the padnav workspace: the abstract events a
//! controller produces, the identifiers and policies that describe
//! navigation groups, the capability records nodes report to the router,
//! and the records exchanged with hardware services.
//!
//! Nothing in this crate has behavior beyond small helpers; the engine and
//! input crates build on these definitions.

mod events;
mod hardware;
mod navigation;
mod settings;

pub use events::{Direction, NavEvent, NavInput};
pub use hardware::ApplyOutcome;
pub use navigation::{ComboState, Directional, GroupAxis, GroupId, ModalState, NodeId, SliderState, WrapPolicy};
pub use settings::PollerSettings;
