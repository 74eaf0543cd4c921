//! Services for intake-core

pub mod intake_orchestrator;

pub use intake_orchestrator::IntakeOrchestrator;
