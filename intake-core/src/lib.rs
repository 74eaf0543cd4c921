//! intake-core library
//!
//! Document intake for a fixed set of expected financial reports: per-slot
//! state machine, report type gate, and completion tracking.

pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod report_type;
pub mod services;
pub mod types;
pub mod validators;

pub use crate::error::{IntakeError, IntakeResult, SlotError, SlotErrorKind};
pub use crate::models::{IntakeSession, Slot, SlotDefinition, SlotStatus};
pub use crate::notify::{EventBusNotifier, IntakeNotifier, NoopNotifier};
pub use crate::report_type::ReportType;
pub use crate::services::IntakeOrchestrator;
pub use crate::types::{
    CandidateFile, CollaboratorError, Collaborators, ExtractedDocument, ExtractedText,
    Identification, ParsedReport, ReportParser, TextExtractor, TypeIdentifier,
};
