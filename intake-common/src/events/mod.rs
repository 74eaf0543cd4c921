//! Event types for the intake event system
//!
//! Provides shared event definitions and the EventBus used to fan intake
//! notifications out to any number of consumers.

mod intake_types;

pub use intake_types::SlotStatus;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Intake event types
///
/// Events are broadcast via EventBus and can be serialized for transmission
/// to a presentation layer. Parsed payloads travel as JSON values so this
/// crate stays independent of the report schemas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IntakeEvent {
    /// A fresh intake session was started (all slots idle)
    SessionStarted {
        /// New session identifier
        session_id: Uuid,
        /// Configured slot keys, in configuration order
        slot_keys: Vec<String>,
        /// When the session started
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A slot changed lifecycle status
    ///
    /// Triggers:
    /// - UI: Update the slot's card (spinner, check mark, error text)
    SlotStateChanged {
        /// Owning session
        session_id: Uuid,
        /// Slot that changed
        slot_key: String,
        /// Status before the change
        old_status: SlotStatus,
        /// Status after the change
        new_status: SlotStatus,
        /// Attempt counter of the slot after the change
        attempt: u64,
        /// Human-readable failure reason (only for `Error`)
        error: Option<String>,
        /// When the change happened
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// One slot finished parsing; its data is usable on its own
    PartialDataAvailable {
        /// Owning session
        session_id: Uuid,
        /// Slot that completed
        slot_key: String,
        /// Parsed payload
        data: serde_json::Value,
        /// When parsing finished
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Every configured slot holds parsed data
    ///
    /// Fired once each time the session becomes complete, not while it stays complete.
    IntakeCompleted {
        /// Owning session
        session_id: Uuid,
        /// Parsed payload per slot key
        reports: BTreeMap<String, serde_json::Value>,
        /// When the session became complete
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl IntakeEvent {
    /// Event type name (matches the serde tag)
    pub fn event_type(&self) -> &'static str {
        match self {
            IntakeEvent::SessionStarted { .. } => "SessionStarted",
            IntakeEvent::SlotStateChanged { .. } => "SlotStateChanged",
            IntakeEvent::PartialDataAvailable { .. } => "PartialDataAvailable",
            IntakeEvent::IntakeCompleted { .. } => "IntakeCompleted",
        }
    }

    /// Session the event belongs to
    pub fn session_id(&self) -> Uuid {
        match self {
            IntakeEvent::SessionStarted { session_id, .. }
            | IntakeEvent::SlotStateChanged { session_id, .. }
            | IntakeEvent::PartialDataAvailable { session_id, .. }
            | IntakeEvent::IntakeCompleted { session_id, .. } => *session_id,
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus for intake events
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use intake_common::events::{EventBus, IntakeEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(IntakeEvent::SessionStarted {
///     session_id: uuid::Uuid::new_v4(),
///     slot_keys: vec!["performance".to_string()],
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<IntakeEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before dropping old events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<IntakeEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: IntakeEvent,
    ) -> Result<usize, broadcast::error::SendError<IntakeEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: IntakeEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
