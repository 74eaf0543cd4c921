//! Report type gate
//!
//! Runs after text extraction and before parsing, so a parser is never
//! handed a document of the wrong schema.

use crate::error::TypeMismatch;
use crate::report_type::ReportType;
use crate::types::Identification;
use tracing::debug;

/// Outcome of the type gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Accept,
    Reject(TypeMismatch),
}

impl GateDecision {
    pub fn is_accept(&self) -> bool {
        matches!(self, GateDecision::Accept)
    }
}

/// Accept iff the identified type equals `expected`
///
/// An unidentified document (`report_type: None`) is always rejected. The
/// rejection names what was detected: the identifier's name if given, else
/// the detected type's title, else nothing (generic phrase).
pub fn validate(expected: ReportType, identification: &Identification) -> GateDecision {
    if identification.report_type == Some(expected) {
        debug!(expected = %expected, "Type gate accepted document");
        return GateDecision::Accept;
    }

    let detected_name = identification
        .name
        .as_ref()
        .filter(|n| !n.trim().is_empty())
        .cloned()
        .or_else(|| identification.report_type.map(|t| t.title().to_string()));

    debug!(
        expected = %expected,
        detected = ?identification.report_type,
        "Type gate rejected document"
    );

    GateDecision::Reject(TypeMismatch {
        expected,
        detected_name,
    })
}
