//! Intake-specific supporting types for events

use serde::{Deserialize, Serialize};

/// Lifecycle status of one document slot
///
/// `Idle` is the initial state. `Success` and `Error` are terminal for an
/// attempt but not absorbing: a new upload or a reset leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    /// Waiting for a document
    Idle,
    /// Extraction, identification or parsing in progress
    Processing,
    /// Parsed data available
    Success,
    /// Last attempt failed
    Error,
}

impl SlotStatus {
    /// Stable lowercase name (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Idle => "idle",
            SlotStatus::Processing => "processing",
            SlotStatus::Success => "success",
            SlotStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
