//! Fake collaborators

use async_trait::async_trait;
use intake_core::models::SlotTransition;
use intake_core::{
    CandidateFile, CollaboratorError, ExtractedDocument, ExtractedText, Identification,
    IntakeNotifier, ParsedReport, ReportParser, ReportType, TextExtractor, TypeIdentifier,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use uuid::Uuid;

pub const ASSET_MARKER: &str = "ASSET ALLOCATION SUMMARY";
pub const PERFORMANCE_MARKER: &str = "PERFORMANCE SUMMARY";

/// `marker` followed by padding, exactly `len` characters long
pub fn report_text(marker: &str, len: usize) -> String {
    assert!(len >= marker.len(), "length {} shorter than marker", len);
    let mut text = marker.to_string();
    text.push_str(&".".repeat(len - marker.len()));
    text
}

pub fn asset_allocation_file(name: &str) -> CandidateFile {
    CandidateFile::new(name, report_text(ASSET_MARKER, 400))
}

pub fn performance_file(name: &str) -> CandidateFile {
    CandidateFile::new(name, report_text(PERFORMANCE_MARKER, 400))
}

// ============================================================================
// Extractors
// ============================================================================

/// Treats the file bytes as UTF-8 text
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, file: &CandidateFile) -> Result<ExtractedText, CollaboratorError> {
        String::from_utf8(file.content.clone())
            .map(|full_text| ExtractedText { full_text })
            .map_err(|_| CollaboratorError::Unreadable("document is not valid text".to_string()))
    }
}

#[derive(Default)]
struct Gate {
    entered: Notify,
    release: Notify,
}

/// PlainTextExtractor that can hold chosen files until released
#[derive(Default)]
pub struct GatedExtractor {
    gates: Mutex<HashMap<String, Arc<Gate>>>,
}

impl GatedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold extraction of files with this name until `release`
    pub fn hold(&self, file_name: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(file_name.to_string(), Arc::new(Gate::default()));
    }

    /// Wait until extraction of a held file has started
    pub async fn wait_entered(&self, file_name: &str) {
        let gate = self.gate(file_name);
        gate.entered.notified().await;
    }

    pub fn release(&self, file_name: &str) {
        self.gate(file_name).release.notify_one();
    }

    fn gate(&self, file_name: &str) -> Arc<Gate> {
        self.gates
            .lock()
            .unwrap()
            .get(file_name)
            .cloned()
            .unwrap_or_else(|| panic!("no gate registered for {}", file_name))
    }
}

#[async_trait]
impl TextExtractor for GatedExtractor {
    async fn extract(&self, file: &CandidateFile) -> Result<ExtractedText, CollaboratorError> {
        let gate = self.gates.lock().unwrap().get(&file.name).cloned();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        PlainTextExtractor.extract(file).await
    }
}

// ============================================================================
// Identifier
// ============================================================================

/// Identifies by marker text; counts calls
#[derive(Default)]
pub struct KeywordIdentifier {
    calls: AtomicUsize,
}

impl KeywordIdentifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TypeIdentifier for KeywordIdentifier {
    async fn identify(&self, full_text: &str) -> Identification {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if full_text.contains(ASSET_MARKER) {
            Identification::identified(ReportType::AssetAllocation).with_confidence(0.95)
        } else if full_text.contains(PERFORMANCE_MARKER) {
            Identification::identified(ReportType::Performance).with_confidence(0.95)
        } else {
            Identification::unidentified()
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Records every parse call; optionally fails
#[derive(Default)]
pub struct SpyParser {
    calls: Mutex<Vec<ExtractedDocument>>,
    failure: Option<String>,
}

impl SpyParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn parsed_file_names(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.file_name.clone())
            .collect()
    }

    /// Output this parser produces for a document
    pub fn expected_output(document: &ExtractedDocument) -> ParsedReport {
        ParsedReport::new(
            document.report_type,
            serde_json::json!({
                "file": document.file_name,
                "chars": document.full_text.chars().count(),
            }),
        )
    }
}

#[async_trait]
impl ReportParser for SpyParser {
    async fn parse(&self, document: &ExtractedDocument) -> Result<ParsedReport, CollaboratorError> {
        self.calls.lock().unwrap().push(document.clone());
        match &self.failure {
            Some(message) => Err(CollaboratorError::Malformed(message.clone())),
            None => Ok(Self::expected_output(document)),
        }
    }
}

// ============================================================================
// Notifier
// ============================================================================

/// Records every notification in delivery order
#[derive(Default)]
pub struct RecordingNotifier {
    partials: Mutex<Vec<(String, ParsedReport)>>,
    completes: Mutex<Vec<BTreeMap<String, ParsedReport>>>,
    transitions: Mutex<Vec<(SlotTransition, Option<String>)>>,
    sessions: Mutex<Vec<Uuid>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partials(&self) -> Vec<(String, ParsedReport)> {
        self.partials.lock().unwrap().clone()
    }

    pub fn completes(&self) -> Vec<BTreeMap<String, ParsedReport>> {
        self.completes.lock().unwrap().clone()
    }

    pub fn transitions(&self) -> Vec<(SlotTransition, Option<String>)> {
        self.transitions.lock().unwrap().clone()
    }

    pub fn sessions_started(&self) -> Vec<Uuid> {
        self.sessions.lock().unwrap().clone()
    }
}

impl IntakeNotifier for RecordingNotifier {
    fn on_partial_data(&self, _session_id: Uuid, slot_key: &str, parsed: &ParsedReport) {
        self.partials
            .lock()
            .unwrap()
            .push((slot_key.to_string(), parsed.clone()));
    }

    fn on_complete(&self, _session_id: Uuid, reports: &BTreeMap<String, ParsedReport>) {
        self.completes.lock().unwrap().push(reports.clone());
    }

    fn on_transition(&self, _session_id: Uuid, transition: &SlotTransition, error: Option<&str>) {
        self.transitions
            .lock()
            .unwrap()
            .push((transition.clone(), error.map(str::to_string)));
    }

    fn on_session_started(&self, session_id: Uuid, _slot_keys: &[String]) {
        self.sessions.lock().unwrap().push(session_id);
    }
}
