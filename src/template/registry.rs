//! Template registry for storing validated key/value declarations

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::error::RegistrationError;

use super::macros::{InternalMacroGuard, MacroResolver};
use super::validate::{validate_key, validate_value};

/// Separator between key and value in a `KEY:VALUE` declaration
pub const KEY_VALUE_DELIMITER: char = ':';

/// A stored template declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    key: String,
    value: String,
}

impl TemplateEntry {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Split a `KEY:VALUE` argument once on `:`.
///
/// A missing `:` is reported as an invalid (empty) value.
pub fn parse_template_arg(arg: &str) -> Result<(&str, &str), RegistrationError> {
    match arg.split_once(KEY_VALUE_DELIMITER) {
        Some(pair) => Ok(pair),
        None if !validate_key(arg) => Err(RegistrationError::InvalidKey {
            key: arg.to_string(),
        }),
        None => Err(RegistrationError::InvalidValue {
            key: arg.to_string(),
            value: String::new(),
        }),
    }
}

/// Registry of user templates.
///
/// One registry is built per run: populated while arguments are processed,
/// read while profile lines are expanded, cleared once at teardown. Keys are
/// unique; a second declaration of the same key is rejected, never overwritten.
#[derive(Debug)]
pub struct TemplateRegistry<R> {
    entries: Vec<TemplateEntry>,
    index: HashMap<String, usize>,
    guard: InternalMacroGuard<R>,
    config: EngineConfig,
}

impl<R: MacroResolver> TemplateRegistry<R> {
    /// Create an empty registry that consults `resolver` for built-in macros
    pub fn new(resolver: R) -> Self {
        Self::with_config(resolver, EngineConfig::default())
    }

    pub fn with_config(resolver: R, config: EngineConfig) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            guard: InternalMacroGuard::new(resolver),
            config,
        }
    }

    /// Validate and store a template.
    ///
    /// The registry is left untouched when any check fails.
    pub fn register(&mut self, key: &str, value: &str) -> Result<(), RegistrationError> {
        if !validate_key(key) {
            return Err(RegistrationError::InvalidKey {
                key: key.to_string(),
            });
        }

        if !validate_value(value, self.config.value_len_limit()) {
            return Err(RegistrationError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            });
        }

        // Built-in macros and reserved names cannot be overridden
        if self.guard.is_internal(key) {
            return Err(RegistrationError::ForbiddenOverride {
                key: key.to_string(),
            });
        }

        if self.index.contains_key(key) {
            return Err(RegistrationError::DuplicateKey {
                key: key.to_string(),
            });
        }

        tracing::debug!(key, value, "create template");
        self.index.insert(key.to_string(), self.entries.len());
        self.entries.push(TemplateEntry {
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    /// Parse a `KEY:VALUE` argument and register it
    pub fn check_template(&mut self, arg: &str) -> Result<(), RegistrationError> {
        let (key, value) = parse_template_arg(arg)?;
        self.register(key, value)
    }

    /// Get the value registered for `key`.
    ///
    /// An empty registry and a missing key look the same to callers.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].value())
    }

    /// Check if a template exists
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Release every entry. Calling it again is a no-op.
    pub fn clear(&mut self) {
        for entry in self.entries.drain(..) {
            tracing::debug!(key = entry.key(), value = entry.value(), "free template");
        }
        self.index.clear();
    }

    /// Log every entry when the debug flag is set
    pub fn dump_all(&self) {
        if !self.config.debug {
            return;
        }

        for entry in self.entries.iter().rev() {
            tracing::debug!(key = entry.key(), value = entry.value(), "template");
        }
    }

    /// Entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn guard(&self) -> &InternalMacroGuard<R> {
        &self.guard
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
