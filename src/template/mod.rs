//! Template system for profile lines
//!
//! Operators declare templates as `KEY:VALUE` pairs. Profile lines may then
//! reference them as `${KEY}`; references to built-in macros are left for the
//! profile resolver.
//!
//! # Example
//!
//! ```text
//! --template APPDIR:/opt/example
//!
//! whitelist ${APPDIR}/share      -> whitelist /opt/example/share
//! whitelist ${HOME}/.example     -> unchanged, ${HOME} is built in
//! ```

mod expander;
mod macros;
mod registry;
mod scanner;
mod validate;

pub use expander::Expander;
pub use macros::{
    BuiltinMacros, InternalMacroGuard, MacroId, MacroResolver, MacroTable, NoMacros,
    RESERVED_KEYS,
};
pub use registry::{parse_template_arg, TemplateEntry, TemplateRegistry, KEY_VALUE_DELIMITER};
pub use scanner::{LineClass, Scanner};
pub use validate::{validate_key, validate_value};
