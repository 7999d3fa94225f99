use serde::{Deserialize, Serialize};

/// Result of pushing a value to a hardware service.
///
/// Mirrors the `(success, message)` pair every hardware backend reports.
/// A failed apply is not an error for the navigation layer: the node that
/// issued it reverts its displayed value and surfaces `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    pub success: bool,
    pub message: String,
}

impl ApplyOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
