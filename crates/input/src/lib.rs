//! # Padnav Input
//!
//! Translates raw controller state into the router's event vocabulary.
//!
//! A [`ControllerPoller`] samples a [`ControllerBackend`] at a fixed
//! cadence on a tokio task, folds the analog stick into the d-pad, runs
//! per-button edge and repeat detection ([`EdgeDetector`]) and sends one
//! [`NavInput`](padnav_types::NavInput) per recognized edge over an mpsc
//! channel. The poller owns no focus state.
//!
//! Backends:
//! - [`ReplayBackend`]: scripted frames, used by tests and the demo's
//!   script mode
//! - [`KeyboardBackend`]: terminal keys through `crossterm`

pub mod backend;
pub mod edges;
pub mod error;
pub mod keyboard;
pub mod mapping;
pub mod pad;
pub mod poller;

pub use backend::{ControllerBackend, ReplayBackend};
pub use edges::EdgeDetector;
pub use error::DeviceError;
pub use keyboard::KeyboardBackend;
pub use mapping::{is_nav_button, map_button_to_event};
pub use pad::{PadButton, PadState};
pub use poller::{ControllerPoller, PollerHandle};
