//! Error types for intake-core
//!
//! Slot-level failures (`SlotError`) are recorded on the slot and never
//! returned as `Err` from orchestrator operations. `IntakeError` covers
//! construction and configuration problems only.

use crate::report_type::ReportType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Phrase used when identification produced neither a type nor a name
pub const UNKNOWN_REPORT_TYPE: &str = "Unknown report type";

/// Failure recorded on a slot in `error` status
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotError {
    /// Rejected by the file picker before extraction (passed through verbatim)
    #[error("{message}")]
    Selection { message: String },

    /// Text extraction failed or produced too little text
    #[error("{0}")]
    Extraction(ExtractionFailure),

    /// Document identified as something other than the slot expects
    #[error("{0}")]
    TypeMismatch(TypeMismatch),

    /// Parser failed on correctly identified content
    #[error("Failed to parse document: {message}")]
    Parse { message: String },
}

/// Discriminant of `SlotError`, for callers that style by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotErrorKind {
    Selection,
    Extraction,
    TypeMismatch,
    Parse,
}

impl SlotError {
    pub fn kind(&self) -> SlotErrorKind {
        match self {
            SlotError::Selection { .. } => SlotErrorKind::Selection,
            SlotError::Extraction(_) => SlotErrorKind::Extraction,
            SlotError::TypeMismatch(_) => SlotErrorKind::TypeMismatch,
            SlotError::Parse { .. } => SlotErrorKind::Parse,
        }
    }

    /// Human-readable message for display
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Extraction failure detail
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExtractionFailure {
    /// Extractor returned an error
    #[error("Failed to extract text from document: {message}")]
    Extractor { message: String },

    /// Extractor succeeded but the text is below the minimum length
    #[error(
        "Could not extract enough text from document \
         ({found} characters, need at least {minimum})"
    )]
    InsufficientContent { found: usize, minimum: usize },
}

/// Identification did not match the slot's expected type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMismatch {
    /// Type the slot requires
    pub expected: ReportType,
    /// Human-readable name of what was detected, if anything
    pub detected_name: Option<String>,
}

impl TypeMismatch {
    /// Detected name, or the generic unknown-type phrase when blank or absent
    pub fn detected(&self) -> &str {
        self.detected_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_REPORT_TYPE)
    }
}

impl std::fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "This appears to be a {}, not a {}. Please upload the correct document.",
            self.detected(),
            self.expected.title()
        )
    }
}

impl std::error::Error for TypeMismatch {}

/// Orchestrator construction / configuration error
#[derive(Debug, Error)]
pub enum IntakeError {
    /// No slot definitions were supplied
    #[error("At least one slot definition is required")]
    EmptyConfiguration,

    /// Two slot definitions share a key
    #[error("Duplicate slot key: {0}")]
    DuplicateSlot(String),

    /// Slot entry names a report type that does not exist
    #[error("Slot '{key}' has unknown expected type '{expected_type}'")]
    UnknownReportType { key: String, expected_type: String },

    /// Config file could not be loaded or a setting is invalid
    #[error("Common error: {0}")]
    Common(#[from] intake_common::Error),
}

/// Result type for orchestrator construction
pub type IntakeResult<T> = Result<T, IntakeError>;
