//! Data models for intake-core
//!
//! - Slot: one expected document and its lifecycle state machine
//! - IntakeSession: the fixed set of slots for one intake run

pub mod intake_session;
pub mod slot;

pub use intake_session::IntakeSession;
pub use slot::{default_slot_definitions, AttemptToken, Slot, SlotDefinition, SlotTransition};
pub use intake_common::events::SlotStatus;
