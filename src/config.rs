//! Indexer configuration.
//!
//! An optional TOML file passed with `--config`. Every key is optional and
//! unknown keys are rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! [metadata]
//! enabled = false                                        # Write <name>.json EXIF sidecars
//! fields = ["Model", "ImageDescription", "DateTimeOriginal"]
//!
//! [processing]
//! on_error = "continue"     # "continue" records failures, "abort" stops the run
//!
//! [logging]
//! level = "info"            # trace, debug, info, warn, error
//! format = "pretty"         # pretty or json
//! ```
//!
//! Target sizes (3000/1000/200) and JPEG quality (80) are fixed.

use crate::metadata::{KNOWN_FIELDS, default_fields};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Indexer configuration loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexerConfig {
    /// EXIF sidecar settings.
    pub metadata: MetadataConfig,
    /// Failure handling.
    pub processing: ProcessingConfig,
    /// Diagnostic log settings.
    pub logging: LoggingConfig,
}

/// EXIF sidecar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    pub enabled: bool,
    /// EXIF field names to extract.
    pub fields: Vec<String>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            fields: default_fields(),
        }
    }
}

/// What a per-file or per-derivative failure does to the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Record the failure and move on to the next file.
    #[default]
    Continue,
    /// Stop the run at the first failure.
    Abort,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    pub on_error: ErrorPolicy,
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn is_verbose(&self) -> bool {
        matches!(self.level.as_str(), "debug" | "trace")
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl IndexerConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.metadata.fields.is_empty() {
            return Err(ConfigError::Validation(
                "metadata.fields must not be empty".into(),
            ));
        }
        if let Some(unknown) = self
            .metadata
            .fields
            .iter()
            .find(|f| !KNOWN_FIELDS.contains(&f.as_str()))
        {
            return Err(ConfigError::Validation(format!(
                "metadata.fields: unknown EXIF field '{unknown}' (known: {})",
                KNOWN_FIELDS.join(", ")
            )));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::Validation(
                "logging.format must be 'pretty' or 'json'".into(),
            ));
        }
        Ok(())
    }
}

/// Parse and validate a TOML string.
pub fn parse_config(content: &str) -> Result<IndexerConfig, ConfigError> {
    let config: IndexerConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file, rejecting unknown keys and validating values.
pub fn load_config(path: &Path) -> Result<IndexerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock config file with every key at its default.
///
/// Printed by `--print-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-indexer configuration
# ============================
# Every key is optional; the values below are the defaults.

[metadata]
# Write <output>/<file name>.json with EXIF metadata for every indexed photo.
enabled = false
# EXIF fields to extract. Known: Model, ImageDescription, DateTimeOriginal.
fields = ["Model", "ImageDescription", "DateTimeOriginal"]

[processing]
# "continue": record failed files in the summary and index the rest.
# "abort": stop at the first failure.
on_error = "continue"

[logging]
# trace, debug, info, warn, error (RUST_LOG overrides)
level = "info"
# pretty or json (written to stderr)
format = "pretty"
"##
}
