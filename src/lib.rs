//! Sandbox Template - `${KEY}` substitution for sandbox profile lines
//!
//! This library validates operator-declared templates, classifies profile
//! lines, and expands template references before the lines reach the profile
//! parser.
//!
//! # Example
//!
//! ```rust
//! use sandbox_template::{BuiltinMacros, TemplateRegistry};
//!
//! let mut registry = TemplateRegistry::new(BuiltinMacros);
//! registry.register("DIR", "/home/user/data").unwrap();
//!
//! let line = registry.expand("cp ${DIR}/file dest").unwrap();
//! assert_eq!(line, "cp /home/user/data/file dest");
//! ```
//!
//! The registry is not synchronised. Hosts that share it between threads
//! wrap it in a single lock; once registration is done, expansion only needs
//! shared references and distinct lines can be expanded concurrently.

pub mod config;
pub mod error;
pub mod parser;
pub mod template;

use std::borrow::Cow;

pub use config::{ConfigError, EngineConfig, TemplateFile, DBUS_MAX_NAME_LENGTH};
pub use error::{ExpandError, RegistrationError};
pub use template::{
    parse_template_arg, BuiltinMacros, Expander, InternalMacroGuard, LineClass, MacroId,
    MacroResolver, MacroTable, NoMacros, Scanner, TemplateEntry, TemplateRegistry,
};

use thiserror::Error;

/// Errors that can occur anywhere in the template pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// A template declaration was rejected
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A profile line could not be expanded
    #[error(transparent)]
    Expand(#[from] ExpandError),

    /// A template file could not be loaded
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl<R: MacroResolver> TemplateRegistry<R> {
    /// Expand a line with this registry
    pub fn expand(&self, line: &str) -> Result<String, ExpandError> {
        Expander::new(self).expand(line)
    }

    /// Classify a line with this registry
    pub fn classify(&self, line: &str) -> LineClass {
        Scanner::new(self).classify(line)
    }

    /// Register every template declared in a file
    pub fn register_file(&mut self, file: &TemplateFile) -> Result<(), RegistrationError> {
        for (key, value) in &file.templates {
            self.register(key, value)?;
        }
        Ok(())
    }
}

/// Prepare one profile line for the profile resolver.
///
/// Lines without user templates are returned borrowed; lines that need
/// expansion are expanded; invalid lines report why.
///
/// # Example
///
/// ```rust
/// use sandbox_template::{process_line, NoMacros, TemplateRegistry};
///
/// let mut registry = TemplateRegistry::new(NoMacros);
/// registry.register("APP", "org.example.App").unwrap();
///
/// assert_eq!(process_line(&registry, "whitelist ${HOME}").unwrap(), "whitelist ${HOME}");
/// assert_eq!(
///     process_line(&registry, "dbus-user.own ${APP}").unwrap(),
///     "dbus-user.own org.example.App"
/// );
/// assert!(process_line(&registry, "private ${nope}").is_err());
/// ```
pub fn process_line<'l, R: MacroResolver>(
    registry: &TemplateRegistry<R>,
    line: &'l str,
) -> Result<Cow<'l, str>, ExpandError> {
    match Scanner::new(registry).check(line)? {
        LineClass::NoExpansionNeeded => Ok(Cow::Borrowed(line)),
        LineClass::ExpansionRequired => registry.expand(line).map(Cow::Owned),
        // `check` reports invalid lines as errors; only `classify` yields this
        LineClass::Invalid => registry.expand(line).map(Cow::Owned),
    }
}
