//! Notification boundary
//!
//! The orchestrator reports to its caller through an `IntakeNotifier`.
//! Notifications are delivered after the session lock is released, in the
//! order: transition, partial data, complete.

use crate::models::SlotTransition;
use crate::types::ParsedReport;
use chrono::Utc;
use intake_common::events::{EventBus, IntakeEvent};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Receiver of intake notifications
///
/// Implementations must not block; they run on the orchestrator's task.
pub trait IntakeNotifier: Send + Sync {
    /// A slot parsed successfully (fired once per successful parse)
    fn on_partial_data(&self, session_id: Uuid, slot_key: &str, parsed: &ParsedReport);

    /// The session just became complete
    fn on_complete(&self, session_id: Uuid, reports: &BTreeMap<String, ParsedReport>);

    /// A slot changed status
    fn on_transition(
        &self,
        _session_id: Uuid,
        _transition: &SlotTransition,
        _error: Option<&str>,
    ) {
    }

    /// A fresh session replaced the previous one
    fn on_session_started(&self, _session_id: Uuid, _slot_keys: &[String]) {}
}

/// Notifier that ignores everything (callers that poll `get_session`)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl IntakeNotifier for NoopNotifier {
    fn on_partial_data(&self, _session_id: Uuid, _slot_key: &str, _parsed: &ParsedReport) {}

    fn on_complete(&self, _session_id: Uuid, _reports: &BTreeMap<String, ParsedReport>) {}
}

/// Broadcasts every notification as an `IntakeEvent`
///
/// Emission is lossy: having no subscribers is not an error.
#[derive(Clone)]
pub struct EventBusNotifier {
    event_bus: EventBus,
}

impl EventBusNotifier {
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}

fn to_json(parsed: &ParsedReport) -> serde_json::Value {
    parsed.data.clone()
}

impl IntakeNotifier for EventBusNotifier {
    fn on_partial_data(&self, session_id: Uuid, slot_key: &str, parsed: &ParsedReport) {
        self.event_bus.emit_lossy(IntakeEvent::PartialDataAvailable {
            session_id,
            slot_key: slot_key.to_string(),
            data: to_json(parsed),
            timestamp: Utc::now(),
        });
    }

    fn on_complete(&self, session_id: Uuid, reports: &BTreeMap<String, ParsedReport>) {
        self.event_bus.emit_lossy(IntakeEvent::IntakeCompleted {
            session_id,
            reports: reports
                .iter()
                .map(|(key, parsed)| (key.clone(), to_json(parsed)))
                .collect(),
            timestamp: Utc::now(),
        });
    }

    fn on_transition(&self, session_id: Uuid, transition: &SlotTransition, error: Option<&str>) {
        self.event_bus.emit_lossy(IntakeEvent::SlotStateChanged {
            session_id,
            slot_key: transition.slot_key.clone(),
            old_status: transition.old_status,
            new_status: transition.new_status,
            attempt: transition.attempt,
            error: error.map(str::to_string),
            timestamp: transition.transitioned_at,
        });
    }

    fn on_session_started(&self, session_id: Uuid, slot_keys: &[String]) {
        self.event_bus.emit_lossy(IntakeEvent::SessionStarted {
            session_id,
            slot_keys: slot_keys.to_vec(),
            timestamp: Utc::now(),
        });
    }
}
