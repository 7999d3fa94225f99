//! Terminal keyboard standing in for a controller.
//!
//! Arrow keys act as the d-pad, Enter/Space as South (A), Esc/Backspace as
//! East (B). Terminals report key presses but rarely releases, so each
//! press is reported as a one-frame tap; held keys rely on the terminal's
//! own key repeat.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::backend::ControllerBackend;
use crate::error::DeviceError;
use crate::pad::{PadButton, PadState};

/// Reads pending terminal key events without blocking. `q` and Ctrl+C
/// cancel the quit token handed in by the host.
#[derive(Debug)]
pub struct KeyboardBackend {
    quit: CancellationToken,
}

impl KeyboardBackend {
    pub fn new(quit: CancellationToken) -> Self {
        Self { quit }
    }

    fn button_for(&self, key: KeyEvent) -> Option<PadButton> {
        match key.code {
            KeyCode::Up => Some(PadButton::DpadUp),
            KeyCode::Down => Some(PadButton::DpadDown),
            KeyCode::Left => Some(PadButton::DpadLeft),
            KeyCode::Right => Some(PadButton::DpadRight),
            KeyCode::Enter | KeyCode::Char(' ') => Some(PadButton::South),
            KeyCode::Esc | KeyCode::Backspace => Some(PadButton::East),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit.cancel();
                None
            }
            KeyCode::Char('q') => {
                self.quit.cancel();
                None
            }
            _ => None,
        }
    }
}

impl ControllerBackend for KeyboardBackend {
    fn name(&self) -> &str {
        "keyboard"
    }

    fn detect(&mut self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn read(&mut self) -> Result<PadState, DeviceError> {
        let mut state = PadState::idle();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()?
                && key.kind != KeyEventKind::Release
                && let Some(button) = self.button_for(key)
            {
                debug!(?button, "key mapped to pad button");
                state.buttons.insert(button);
            }
        }
        Ok(state)
    }
}
