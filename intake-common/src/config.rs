//! Configuration loading for report intake
//!
//! Bootstrap configuration comes from a TOML file with environment overrides.
//!
//! # Config File Resolution
//! 1. Explicit path (highest priority)
//! 2. `REPORT_INTAKE_CONFIG` environment variable
//! 3. Platform config directory: `<config_dir>/report-intake/config.toml`
//!
//! A missing file is not an error: defaults are used and a warning is logged.
//! A file that exists but cannot be parsed is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "REPORT_INTAKE_CONFIG";

/// Environment variable overriding `intake.min_text_chars`
pub const MIN_TEXT_CHARS_ENV_VAR: &str = "REPORT_INTAKE_MIN_TEXT_CHARS";

/// Extracted text shorter than this is treated as an extraction failure
pub const DEFAULT_MIN_TEXT_CHARS: usize = 100;

/// Default EventBus buffer size
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Intake behavior (optional)
    #[serde(default)]
    pub intake: IntakeSection,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// `[intake]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeSection {
    /// Minimum extracted text length (characters) accepted for identification
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,

    /// EventBus channel capacity
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Slot list; `None` means the built-in two-slot configuration
    #[serde(default)]
    pub slots: Option<Vec<SlotEntry>>,
}

impl Default for IntakeSection {
    fn default() -> Self {
        Self {
            min_text_chars: default_min_text_chars(),
            event_capacity: default_event_capacity(),
            slots: None,
        }
    }
}

/// One `[[intake.slots]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotEntry {
    /// Unique slot key
    pub key: String,
    /// Report type key the uploaded document must match
    pub expected_type: String,
    /// Display title (defaults to the report type's title)
    #[serde(default)]
    pub title: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_min_text_chars() -> usize {
    DEFAULT_MIN_TEXT_CHARS
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

/// Resolve which config file to read
///
/// Returns `None` when no candidate location can be determined.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join("report-intake").join("config.toml"))
}

/// Load a TOML config file, falling back to defaults if it does not exist
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

/// Resolve, load and apply environment overrides
pub fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let mut config = match resolve_config_path(explicit) {
        Some(path) => load_toml_config(&path)?,
        None => {
            warn!("Could not determine config directory, using defaults");
            TomlConfig::default()
        }
    };

    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Apply environment variable overrides on top of file values
pub fn apply_env_overrides(config: &mut TomlConfig) -> Result<()> {
    if let Ok(raw) = std::env::var(MIN_TEXT_CHARS_ENV_VAR) {
        let value = raw.trim().parse::<usize>().map_err(|_| {
            Error::Config(format!(
                "{} must be a non-negative integer, got '{}'",
                MIN_TEXT_CHARS_ENV_VAR, raw
            ))
        })?;
        info!("min_text_chars overridden from environment: {}", value);
        config.intake.min_text_chars = value;
    }
    Ok(())
}

/// Write config to disk (write to temp file, then rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
