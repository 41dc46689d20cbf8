//! Engine configuration and TOML template files
//!
//! Templates are normally declared on the command line, but they can also be
//! collected in a TOML file so a profile set ships with its own defaults:
//!
//! ```toml
//! [limits]
//! max_value_length = 255
//!
//! [templates]
//! DIR = "/home/user/data"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Longest name accepted by the session bus. Template values are bounded by it
/// because the built-in macro resolver enforces the same limit.
pub const DBUS_MAX_NAME_LENGTH: usize = 255;

/// Errors that can occur when loading a template file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read template file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse template file TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a template registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum value length in bytes, never above `DBUS_MAX_NAME_LENGTH`
    pub max_value_len: usize,

    /// Enables diagnostic dumps of the registry
    pub debug: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_value_len: DBUS_MAX_NAME_LENGTH,
            debug: false,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum value length.
    ///
    /// The limit can be lowered but not raised past `DBUS_MAX_NAME_LENGTH`.
    pub fn with_max_value_len(mut self, len: usize) -> Self {
        self.max_value_len = len.min(DBUS_MAX_NAME_LENGTH);
        self
    }

    /// The value length limit actually enforced
    pub fn value_len_limit(&self) -> usize {
        self.max_value_len.min(DBUS_MAX_NAME_LENGTH)
    }

    /// Enable or disable debug dumps
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Template declarations loaded from a TOML file
#[derive(Debug, Clone, Default)]
pub struct TemplateFile {
    /// Overrides the default value length limit when set
    pub max_value_len: Option<usize>,
    /// Declared templates, sorted by key
    pub templates: Vec<(String, String)>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlTemplateFile {
    limits: Option<TomlLimits>,
    #[serde(default)]
    templates: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlLimits {
    max_value_length: Option<usize>,
}

impl TemplateFile {
    /// Load templates from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load templates from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlTemplateFile = toml::from_str(content)?;

        Ok(TemplateFile {
            max_value_len: parsed.limits.and_then(|l| l.max_value_length),
            templates: parsed.templates.into_iter().collect(),
        })
    }

    /// Apply this file's limits on top of an existing configuration.
    ///
    /// A limit above `DBUS_MAX_NAME_LENGTH` is capped.
    pub fn apply(&self, config: EngineConfig) -> EngineConfig {
        match self.max_value_len {
            Some(len) => config.with_max_value_len(len),
            None => config,
        }
    }
}
