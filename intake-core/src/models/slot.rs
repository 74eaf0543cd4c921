//! Slot state machine
//!
//! IDLE → PROCESSING → SUCCESS | ERROR
//!
//! Settled states are not absorbing: a new attempt moves any state back to
//! PROCESSING, a reset moves it to IDLE, and a selection error moves it
//! straight to ERROR. Every transition clears the payload of the previous
//! state, so `parsed_data` and `last_error` are never set together.

use crate::error::SlotError;
use crate::report_type::ReportType;
use crate::types::ParsedReport;
use chrono::{DateTime, Utc};
use intake_common::events::SlotStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Static description of one expected document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDefinition {
    /// Unique slot key
    pub key: String,
    /// Type the uploaded document must be identified as
    pub expected_type: ReportType,
    /// Presentation title
    pub display_title: String,
}

impl SlotDefinition {
    pub fn new(
        key: impl Into<String>,
        expected_type: ReportType,
        display_title: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            expected_type,
            display_title: display_title.into(),
        }
    }

    /// Product definition: key and title taken from the report type
    pub fn for_type(report_type: ReportType) -> Self {
        Self::new(report_type.as_str(), report_type, report_type.title())
    }
}

/// The two product slots: asset allocation, then performance
pub fn default_slot_definitions() -> Vec<SlotDefinition> {
    vec![
        SlotDefinition::for_type(ReportType::AssetAllocation),
        SlotDefinition::for_type(ReportType::Performance),
    ]
}

/// Identifies one processing attempt of one slot
///
/// Results carrying a token that is no longer current are stale and must be
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttemptToken {
    pub session_id: Uuid,
    pub slot_key: String,
    pub attempt: u64,
}

/// Record of one status change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotTransition {
    pub slot_key: String,
    pub old_status: SlotStatus,
    pub new_status: SlotStatus,
    /// Attempt counter after the change
    pub attempt: u64,
    pub transitioned_at: DateTime<Utc>,
}

/// One expected document and its current state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    definition: SlotDefinition,
    status: SlotStatus,
    parsed_data: Option<ParsedReport>,
    last_error: Option<SlotError>,
    attempt: u64,
    updated_at: DateTime<Utc>,
}

impl Slot {
    /// Create idle slot
    pub fn new(definition: SlotDefinition) -> Self {
        Self {
            definition,
            status: SlotStatus::Idle,
            parsed_data: None,
            last_error: None,
            attempt: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn key(&self) -> &str {
        &self.definition.key
    }

    pub fn expected_type(&self) -> ReportType {
        self.definition.expected_type
    }

    pub fn definition(&self) -> &SlotDefinition {
        &self.definition
    }

    pub fn status(&self) -> SlotStatus {
        self.status
    }

    /// Parsed payload (only in `Success`)
    pub fn parsed_data(&self) -> Option<&ParsedReport> {
        self.parsed_data.as_ref()
    }

    /// Failure (only in `Error`)
    pub fn last_error(&self) -> Option<&SlotError> {
        self.last_error.as_ref()
    }

    /// Monotonic attempt counter
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `token` still refers to this slot's latest attempt
    pub fn is_current(&self, token: &AttemptToken) -> bool {
        token.slot_key == self.definition.key && token.attempt == self.attempt
    }

    /// Start a new attempt (any state → PROCESSING)
    pub(crate) fn begin_attempt(&mut self, session_id: Uuid) -> (AttemptToken, SlotTransition) {
        self.attempt += 1;
        self.parsed_data = None;
        self.last_error = None;
        let transition = self.transition_to(SlotStatus::Processing);

        let token = AttemptToken {
            session_id,
            slot_key: self.definition.key.clone(),
            attempt: self.attempt,
        };
        (token, transition)
    }

    /// Record a file-selection error (any state → ERROR, no attempt runs)
    ///
    /// Supersedes any attempt still in flight.
    pub(crate) fn reject_selection(&mut self, error: SlotError) -> SlotTransition {
        self.attempt += 1;
        self.parsed_data = None;
        self.last_error = Some(error);
        self.transition_to(SlotStatus::Error)
    }

    /// Finish the current attempt successfully (PROCESSING → SUCCESS)
    pub(crate) fn complete(&mut self, parsed: ParsedReport) -> SlotTransition {
        self.last_error = None;
        self.parsed_data = Some(parsed);
        self.transition_to(SlotStatus::Success)
    }

    /// Finish the current attempt with a failure (PROCESSING → ERROR)
    pub(crate) fn fail(&mut self, error: SlotError) -> SlotTransition {
        self.parsed_data = None;
        self.last_error = Some(error);
        self.transition_to(SlotStatus::Error)
    }

    /// Return to IDLE, superseding any attempt in flight
    ///
    /// Returns `None` if the slot is already idle.
    pub(crate) fn reset(&mut self) -> Option<SlotTransition> {
        if self.status == SlotStatus::Idle {
            return None;
        }
        self.attempt += 1;
        self.parsed_data = None;
        self.last_error = None;
        Some(self.transition_to(SlotStatus::Idle))
    }

    fn transition_to(&mut self, new_status: SlotStatus) -> SlotTransition {
        let now = Utc::now();
        let transition = SlotTransition {
            slot_key: self.definition.key.clone(),
            old_status: self.status,
            new_status,
            attempt: self.attempt,
            transitioned_at: now,
        };
        self.status = new_status;
        self.updated_at = now;
        transition
    }
}
