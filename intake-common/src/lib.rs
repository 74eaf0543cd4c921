//! # Report Intake Common Library
//!
//! Shared code for the report intake crates:
//! - Error types
//! - Event types (IntakeEvent enum) and the broadcast EventBus
//! - Configuration loading
//! - Logging initialization

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
