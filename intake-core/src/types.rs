//! Core Types and Collaborator Trait Definitions
//!
//! The orchestrator drives three external collaborators in sequence:
//! - **TextExtractor:** candidate file → plain text
//! - **TypeIdentifier:** plain text → report type guess
//! - **ReportParser:** identified document → structured fields
//!
//! All three are async, object-safe and held as `Arc<dyn _>` so they can
//! be swapped for fakes in tests.

use crate::report_type::ReportType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Data Types
// ============================================================================

/// Document handed over by the file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Original file name
    pub name: String,
    /// Raw file bytes
    pub content: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// File size in bytes
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Output of a TextExtractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub full_text: String,
}

impl ExtractedText {
    /// Length in characters (not bytes)
    pub fn char_count(&self) -> usize {
        self.full_text.chars().count()
    }
}

/// Output of a TypeIdentifier
///
/// `report_type: None` means the text could not be classified. That is a
/// normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Identification {
    /// Identified type, if any
    pub report_type: Option<ReportType>,
    /// Human-readable name of the identified document
    pub name: Option<String>,
    /// Identifier confidence (0.0-1.0)
    pub confidence: Option<f32>,
}

impl Identification {
    /// Identified as `report_type` with its standard title as name
    pub fn identified(report_type: ReportType) -> Self {
        Self {
            report_type: Some(report_type),
            name: Some(report_type.title().to_string()),
            confidence: None,
        }
    }

    /// Nothing recognized
    pub fn unidentified() -> Self {
        Self::default()
    }

    /// Attach a confidence score (clamped to 0.0-1.0)
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }
}

/// Input to a ReportParser
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    /// Original file name
    pub file_name: String,
    /// Extracted text
    pub full_text: String,
    /// Type confirmed by the validation gate
    pub report_type: ReportType,
}

/// Structured output of a ReportParser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReport {
    /// Type the data was parsed as
    pub report_type: ReportType,
    /// Parsed fields
    pub data: serde_json::Value,
}

impl ParsedReport {
    pub fn new(report_type: ReportType, data: serde_json::Value) -> Self {
        Self { report_type, data }
    }
}

/// Failure reported by an extractor or parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// Document could not be read or decoded
    #[error("{0}")]
    Unreadable(String),

    /// Document content does not have the expected structure
    #[error("{0}")]
    Malformed(String),

    /// Any other failure
    #[error("{0}")]
    Other(String),
}

// ============================================================================
// Collaborator Traits
// ============================================================================

/// Byte stream → plain text
#[async_trait::async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, file: &CandidateFile) -> Result<ExtractedText, CollaboratorError>;
}

/// Plain text → report type
#[async_trait::async_trait]
pub trait TypeIdentifier: Send + Sync {
    async fn identify(&self, full_text: &str) -> Identification;
}

/// Identified document → structured fields
///
/// Only invoked after the validation gate accepted the identification.
#[async_trait::async_trait]
pub trait ReportParser: Send + Sync {
    async fn parse(&self, document: &ExtractedDocument) -> Result<ParsedReport, CollaboratorError>;
}

/// The three collaborators the orchestrator needs
#[derive(Clone)]
pub struct Collaborators {
    pub extractor: Arc<dyn TextExtractor>,
    pub identifier: Arc<dyn TypeIdentifier>,
    pub parser: Arc<dyn ReportParser>,
}

impl Collaborators {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        identifier: Arc<dyn TypeIdentifier>,
        parser: Arc<dyn ReportParser>,
    ) -> Self {
        Self {
            extractor,
            identifier,
            parser,
        }
    }
}
