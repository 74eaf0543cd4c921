//! Settings resolution for intake-core
//!
//! Turns the `[intake]` TOML section into typed settings and slot definitions.

use crate::error::{IntakeError, IntakeResult};
use crate::models::{default_slot_definitions, SlotDefinition};
use crate::report_type::ReportType;
use intake_common::config::{
    IntakeSection, TomlConfig, DEFAULT_EVENT_CAPACITY, DEFAULT_MIN_TEXT_CHARS,
};
use intake_common::events::EventBus;
use tracing::info;

/// Runtime settings of the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeSettings {
    /// Extracted text shorter than this (characters) fails extraction
    pub min_text_chars: usize,
    /// EventBus channel capacity
    pub event_capacity: usize,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl IntakeSettings {
    pub fn from_section(section: &IntakeSection) -> Self {
        Self {
            min_text_chars: section.min_text_chars,
            event_capacity: section.event_capacity,
        }
    }

    /// EventBus sized by `event_capacity`
    ///
    /// # Errors
    /// `Config` when the capacity is zero (a broadcast channel needs room
    /// for at least one event)
    pub fn event_bus(&self) -> intake_common::Result<EventBus> {
        if self.event_capacity == 0 {
            return Err(intake_common::Error::Config(
                "intake.event_capacity must be at least 1".to_string(),
            ));
        }
        Ok(EventBus::new(self.event_capacity))
    }
}

/// Slot definitions from the `[intake]` section
///
/// No `slots` entry means the built-in two-slot configuration.
pub fn slot_definitions(section: &IntakeSection) -> IntakeResult<Vec<SlotDefinition>> {
    let Some(entries) = &section.slots else {
        return Ok(default_slot_definitions());
    };

    let definitions = entries
        .iter()
        .map(|entry| {
            let expected_type: ReportType = entry.expected_type.parse().map_err(|_| {
                IntakeError::UnknownReportType {
                    key: entry.key.clone(),
                    expected_type: entry.expected_type.clone(),
                }
            })?;
            let title = entry
                .title
                .clone()
                .unwrap_or_else(|| expected_type.title().to_string());
            Ok(SlotDefinition::new(entry.key.clone(), expected_type, title))
        })
        .collect::<IntakeResult<Vec<_>>>()?;

    info!(slot_count = definitions.len(), "Slot definitions loaded from configuration");
    Ok(definitions)
}

/// Settings and slot definitions from a loaded config
pub fn resolve(config: &TomlConfig) -> IntakeResult<(IntakeSettings, Vec<SlotDefinition>)> {
    Ok((
        IntakeSettings::from_section(&config.intake),
        slot_definitions(&config.intake)?,
    ))
}
