//! Validators
//!
//! Checks that run between extraction and parsing.

pub mod type_gate;

pub use type_gate::{validate, GateDecision};
