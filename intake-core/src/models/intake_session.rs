//! Intake session (in-memory state)
//!
//! Exactly one slot per configured definition, created once and never
//! gaining or losing keys. Only the orchestrator mutates a session.

use super::slot::{AttemptToken, Slot, SlotDefinition};
use crate::error::{IntakeError, IntakeResult};
use crate::types::ParsedReport;
use chrono::{DateTime, Utc};
use intake_common::events::SlotStatus;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeSession {
    session_id: Uuid,
    slots: Vec<Slot>,
    started_at: DateTime<Utc>,
}

impl IntakeSession {
    /// Create session with every slot idle
    ///
    /// Rejects an empty definition list and duplicate keys.
    pub fn new(definitions: Vec<SlotDefinition>) -> IntakeResult<Self> {
        if definitions.is_empty() {
            return Err(IntakeError::EmptyConfiguration);
        }

        let mut seen = HashSet::new();
        for def in &definitions {
            if !seen.insert(def.key.as_str()) {
                return Err(IntakeError::DuplicateSlot(def.key.clone()));
            }
        }

        Ok(Self {
            session_id: Uuid::new_v4(),
            slots: definitions.into_iter().map(Slot::new).collect(),
            started_at: Utc::now(),
        })
    }

    /// Fresh session with the same definitions and a new id
    pub(crate) fn renewed(&self) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            slots: self
                .slots
                .iter()
                .map(|s| Slot::new(s.definition().clone()))
                .collect(),
            started_at: Utc::now(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Slots in configuration order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, key: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.key() == key)
    }

    pub(crate) fn slot_mut(&mut self, key: &str) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.key() == key)
    }

    pub fn slot_keys(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.key().to_string()).collect()
    }

    /// True iff every slot is in `Success`
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| s.status() == SlotStatus::Success)
    }

    /// Parsed payload of every successful slot, keyed by slot key
    pub fn aggregate(&self) -> BTreeMap<String, ParsedReport> {
        self.slots
            .iter()
            .filter_map(|s| s.parsed_data().map(|p| (s.key().to_string(), p.clone())))
            .collect()
    }

    pub fn statuses(&self) -> BTreeMap<String, SlotStatus> {
        self.slots
            .iter()
            .map(|s| (s.key().to_string(), s.status()))
            .collect()
    }

    /// Whether `token` belongs to this session and is its slot's latest attempt
    pub fn is_current(&self, token: &AttemptToken) -> bool {
        token.session_id == self.session_id
            && self
                .slot(&token.slot_key)
                .is_some_and(|slot| slot.is_current(token))
    }
}
