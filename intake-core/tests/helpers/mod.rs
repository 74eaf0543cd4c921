//! Test Helper Utilities
//!
//! Shared fakes and utilities for testing intake-core

#![allow(dead_code, unused_imports)]

pub mod fakes;
pub mod log_capture;

pub use fakes::{
    asset_allocation_file, performance_file, report_text, GatedExtractor, KeywordIdentifier,
    PlainTextExtractor, RecordingNotifier, SpyParser, ASSET_MARKER, PERFORMANCE_MARKER,
};
pub use log_capture::{capture_logs, LogCapture};

use intake_core::{Collaborators, IntakeOrchestrator};
use std::sync::Arc;

/// Orchestrator over the product slots with plain-text fakes
pub struct TestHarness {
    pub orchestrator: IntakeOrchestrator,
    pub identifier: Arc<KeywordIdentifier>,
    pub parser: Arc<SpyParser>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn create_test_harness() -> TestHarness {
    create_harness_with_parser(SpyParser::new())
}

pub fn create_harness_with_parser(parser: SpyParser) -> TestHarness {
    let identifier = Arc::new(KeywordIdentifier::new());
    let parser = Arc::new(parser);
    let notifier = Arc::new(RecordingNotifier::new());

    let collaborators = Collaborators::new(
        Arc::new(PlainTextExtractor),
        identifier.clone(),
        parser.clone(),
    );
    let orchestrator = IntakeOrchestrator::with_defaults(collaborators, notifier.clone())
        .expect("default configuration is valid");

    TestHarness {
        orchestrator,
        identifier,
        parser,
        notifier,
    }
}
