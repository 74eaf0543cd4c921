//! Document intake orchestrator
//!
//! Owns the intake session and drives every slot through its state machine.
//!
//! # Processing Path
//! EXTRACT → (length floor) → IDENTIFY → TYPE GATE → PARSE
//!
//! Each stage can end the attempt with a slot-scoped error; nothing is
//! returned to the caller as `Err`. After every successful parse the
//! orchestrator emits partial data for the slot, and emits the full set when
//! the session goes from incomplete to complete.
//!
//! # Concurrency
//! Session state sits behind an async `RwLock` that is never held across a
//! collaborator call. Every attempt carries an `AttemptToken`; results whose
//! token is no longer current (newer upload, reset, new session) are dropped.

use crate::config::IntakeSettings;
use crate::error::{ExtractionFailure, IntakeResult, SlotError};
use crate::models::{
    default_slot_definitions, AttemptToken, IntakeSession, SlotDefinition, SlotTransition,
};
use crate::notify::{EventBusNotifier, IntakeNotifier};
use crate::report_type::ReportType;
use crate::types::{CandidateFile, Collaborators, ExtractedDocument, ParsedReport};
use crate::validators::{self, GateDecision};
use intake_common::config::{load_config, TomlConfig};
use intake_common::events::EventBus;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Notification collected under the session lock, delivered after release
enum Notification {
    Transition {
        session_id: Uuid,
        transition: SlotTransition,
        error: Option<String>,
    },
    PartialData {
        session_id: Uuid,
        slot_key: String,
        parsed: ParsedReport,
    },
    Complete {
        session_id: Uuid,
        reports: BTreeMap<String, ParsedReport>,
    },
    SessionStarted {
        session_id: Uuid,
        slot_keys: Vec<String>,
    },
}

/// How a pipeline run ended
enum PipelineOutcome {
    Parsed(ParsedReport),
    Failed(SlotError),
    /// Token went stale before parsing; the parser was not called
    Superseded,
}

/// Intake orchestrator service
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct IntakeOrchestrator {
    session: Arc<RwLock<IntakeSession>>,
    collaborators: Collaborators,
    notifier: Arc<dyn IntakeNotifier>,
    settings: IntakeSettings,
}

impl IntakeOrchestrator {
    /// Create orchestrator with a fresh session
    ///
    /// # Errors
    /// Empty definition list or duplicate slot keys
    pub fn new(
        definitions: Vec<SlotDefinition>,
        collaborators: Collaborators,
        notifier: Arc<dyn IntakeNotifier>,
        settings: IntakeSettings,
    ) -> IntakeResult<Self> {
        let session = IntakeSession::new(definitions)?;

        info!(
            session_id = %session.session_id(),
            slots = ?session.slot_keys(),
            min_text_chars = settings.min_text_chars,
            "Intake orchestrator initialized"
        );

        Ok(Self {
            session: Arc::new(RwLock::new(session)),
            collaborators,
            notifier,
            settings,
        })
    }

    /// Product slots (asset allocation + performance) with default settings
    pub fn with_defaults(
        collaborators: Collaborators,
        notifier: Arc<dyn IntakeNotifier>,
    ) -> IntakeResult<Self> {
        Self::new(
            default_slot_definitions(),
            collaborators,
            notifier,
            IntakeSettings::default(),
        )
    }

    /// Slots and settings from a loaded TOML config
    pub fn from_config(
        config: &TomlConfig,
        collaborators: Collaborators,
        notifier: Arc<dyn IntakeNotifier>,
    ) -> IntakeResult<Self> {
        let (settings, definitions) = crate::config::resolve(config)?;
        Self::new(definitions, collaborators, notifier, settings)
    }

    /// Load the config file (explicit path, env var or platform default),
    /// then build as `from_config`
    ///
    /// # Errors
    /// `Common` when the file is malformed or an override is invalid
    pub fn from_config_file(
        path: Option<&Path>,
        collaborators: Collaborators,
        notifier: Arc<dyn IntakeNotifier>,
    ) -> IntakeResult<Self> {
        let config = load_config(path)?;
        Self::from_config(&config, collaborators, notifier)
    }

    /// Build from config with an `EventBusNotifier` sized by
    /// `intake.event_capacity`
    ///
    /// Returns the bus so callers can subscribe.
    pub fn with_event_bus(
        config: &TomlConfig,
        collaborators: Collaborators,
    ) -> IntakeResult<(Self, EventBus)> {
        let (settings, definitions) = crate::config::resolve(config)?;
        let event_bus = settings.event_bus()?;
        let notifier = Arc::new(EventBusNotifier::new(event_bus.clone()));
        let orchestrator = Self::new(definitions, collaborators, notifier, settings)?;
        Ok((orchestrator, event_bus))
    }

    pub fn settings(&self) -> &IntakeSettings {
        &self.settings
    }

    /// Snapshot of the current session
    pub async fn get_session(&self) -> IntakeSession {
        self.session.read().await.clone()
    }

    /// True iff every slot currently holds parsed data
    pub async fn is_complete(&self) -> bool {
        self.session.read().await.is_complete()
    }

    /// Submit a candidate file (or a file-picker error) for a slot
    ///
    /// - `selection_error` set: slot goes straight to ERROR with that message
    /// - no file and no error: ignored
    /// - otherwise: runs the processing path
    ///
    /// Unknown slot keys are logged and ignored.
    pub async fn submit_file(
        &self,
        slot_key: &str,
        file: Option<CandidateFile>,
        selection_error: Option<String>,
    ) {
        if let Some(message) = selection_error {
            self.record_selection_error(slot_key, message).await;
            return;
        }

        let Some(file) = file else {
            debug!(slot_key = %slot_key, "Empty submission ignored");
            return;
        };

        let Some((token, expected_type)) = self.begin_attempt(slot_key, &file).await else {
            return;
        };

        let outcome = self.run_pipeline(&token, expected_type, &file).await;
        match outcome {
            PipelineOutcome::Parsed(parsed) => self.finish_attempt(token, Ok(parsed)).await,
            PipelineOutcome::Failed(error) => self.finish_attempt(token, Err(error)).await,
            PipelineOutcome::Superseded => debug!(
                slot_key = %token.slot_key,
                attempt = token.attempt,
                "Attempt superseded before parsing"
            ),
        }
    }

    /// Return a slot to IDLE, clearing its data and error
    ///
    /// No-op for idle slots and unknown keys.
    pub async fn reset_slot(&self, slot_key: &str) {
        let mut notes = Vec::new();
        {
            let mut session = self.session.write().await;
            let session_id = session.session_id();
            let Some(slot) = session.slot_mut(slot_key) else {
                warn!(slot_key = %slot_key, "Reset requested for unknown slot");
                return;
            };

            if let Some(transition) = slot.reset() {
                info!(
                    session_id = %session_id,
                    slot_key = %slot_key,
                    from = %transition.old_status,
                    "Slot reset"
                );
                notes.push(Notification::Transition {
                    session_id,
                    transition,
                    error: None,
                });
            }
        }
        self.deliver(notes);
    }

    /// Replace the session with a fresh one (all slots idle)
    ///
    /// Every attempt still in flight becomes stale. Returns the new session id.
    pub async fn start_new_session(&self) -> Uuid {
        let notes;
        let session_id;
        {
            let mut session = self.session.write().await;
            let previous = session.session_id();
            *session = session.renewed();
            session_id = session.session_id();

            info!(
                session_id = %session_id,
                previous_session_id = %previous,
                "New intake session started"
            );
            notes = vec![Notification::SessionStarted {
                session_id,
                slot_keys: session.slot_keys(),
            }];
        }
        self.deliver(notes);
        session_id
    }

    async fn record_selection_error(&self, slot_key: &str, message: String) {
        let mut notes = Vec::new();
        {
            let mut session = self.session.write().await;
            let session_id = session.session_id();
            let Some(slot) = session.slot_mut(slot_key) else {
                warn!(slot_key = %slot_key, "Selection error for unknown slot ignored");
                return;
            };

            warn!(
                session_id = %session_id,
                slot_key = %slot_key,
                error = %message,
                "File selection rejected"
            );
            let transition = slot.reject_selection(SlotError::Selection {
                message: message.clone(),
            });
            notes.push(Notification::Transition {
                session_id,
                transition,
                error: Some(message),
            });
        }
        self.deliver(notes);
    }

    async fn begin_attempt(
        &self,
        slot_key: &str,
        file: &CandidateFile,
    ) -> Option<(AttemptToken, ReportType)> {
        let mut notes = Vec::new();
        let result;
        {
            let mut session = self.session.write().await;
            let session_id = session.session_id();
            let Some(slot) = session.slot_mut(slot_key) else {
                warn!(slot_key = %slot_key, "Upload for unknown slot ignored");
                return None;
            };

            let expected_type = slot.expected_type();
            let (token, transition) = slot.begin_attempt(session_id);

            info!(
                session_id = %session_id,
                slot_key = %slot_key,
                attempt = token.attempt,
                file = %file.name,
                size_bytes = file.size(),
                "Processing uploaded document"
            );
            notes.push(Notification::Transition {
                session_id,
                transition,
                error: None,
            });
            result = Some((token, expected_type));
        }
        self.deliver(notes);
        result
    }

    async fn run_pipeline(
        &self,
        token: &AttemptToken,
        expected_type: ReportType,
        file: &CandidateFile,
    ) -> PipelineOutcome {
        // Stage 1: text extraction
        let extracted = match self.collaborators.extractor.extract(file).await {
            Ok(text) => text,
            Err(e) => {
                return PipelineOutcome::Failed(SlotError::Extraction(
                    ExtractionFailure::Extractor {
                        message: e.to_string(),
                    },
                ));
            }
        };

        let found = extracted.char_count();
        if found < self.settings.min_text_chars {
            return PipelineOutcome::Failed(SlotError::Extraction(
                ExtractionFailure::InsufficientContent {
                    found,
                    minimum: self.settings.min_text_chars,
                },
            ));
        }

        // Stage 2: identification + type gate
        let identification = self
            .collaborators
            .identifier
            .identify(&extracted.full_text)
            .await;

        debug!(
            slot_key = %token.slot_key,
            attempt = token.attempt,
            identified = ?identification.report_type,
            confidence = ?identification.confidence,
            "Document identified"
        );

        if let GateDecision::Reject(mismatch) = validators::validate(expected_type, &identification)
        {
            return PipelineOutcome::Failed(SlotError::TypeMismatch(mismatch));
        }

        if !self.session.read().await.is_current(token) {
            return PipelineOutcome::Superseded;
        }

        // Stage 3: parsing
        let document = ExtractedDocument {
            file_name: file.name.clone(),
            full_text: extracted.full_text,
            report_type: expected_type,
        };

        match self.collaborators.parser.parse(&document).await {
            Ok(parsed) => PipelineOutcome::Parsed(parsed),
            Err(e) => PipelineOutcome::Failed(SlotError::Parse {
                message: e.to_string(),
            }),
        }
    }

    async fn finish_attempt(&self, token: AttemptToken, outcome: Result<ParsedReport, SlotError>) {
        let mut notes = Vec::new();
        {
            let mut session = self.session.write().await;
            if !session.is_current(&token) {
                debug!(
                    session_id = %token.session_id,
                    slot_key = %token.slot_key,
                    attempt = token.attempt,
                    "Discarding result of superseded attempt"
                );
                return;
            }

            let session_id = session.session_id();
            let was_complete = session.is_complete();
            let Some(slot) = session.slot_mut(&token.slot_key) else {
                return;
            };

            match outcome {
                Ok(parsed) => {
                    let transition = slot.complete(parsed.clone());
                    info!(
                        session_id = %session_id,
                        slot_key = %token.slot_key,
                        attempt = token.attempt,
                        "Document parsed successfully"
                    );
                    notes.push(Notification::Transition {
                        session_id,
                        transition,
                        error: None,
                    });
                    notes.push(Notification::PartialData {
                        session_id,
                        slot_key: token.slot_key.clone(),
                        parsed,
                    });

                    if !was_complete && session.is_complete() {
                        let reports = session.aggregate();
                        info!(
                            session_id = %session_id,
                            reports = reports.len(),
                            "All documents parsed, intake complete"
                        );
                        notes.push(Notification::Complete {
                            session_id,
                            reports,
                        });
                    }
                }
                Err(error) => {
                    let message = error.message();
                    warn!(
                        session_id = %session_id,
                        slot_key = %token.slot_key,
                        attempt = token.attempt,
                        kind = ?error.kind(),
                        error = %message,
                        "Document processing failed"
                    );
                    let transition = slot.fail(error);
                    notes.push(Notification::Transition {
                        session_id,
                        transition,
                        error: Some(message),
                    });
                }
            }
        }
        self.deliver(notes);
    }

    fn deliver(&self, notes: Vec<Notification>) {
        for note in notes {
            match note {
                Notification::Transition {
                    session_id,
                    transition,
                    error,
                } => self
                    .notifier
                    .on_transition(session_id, &transition, error.as_deref()),
                Notification::PartialData {
                    session_id,
                    slot_key,
                    parsed,
                } => self.notifier.on_partial_data(session_id, &slot_key, &parsed),
                Notification::Complete {
                    session_id,
                    reports,
                } => self.notifier.on_complete(session_id, &reports),
                Notification::SessionStarted {
                    session_id,
                    slot_keys,
                } => self.notifier.on_session_started(session_id, &slot_keys),
            }
        }
    }
}
