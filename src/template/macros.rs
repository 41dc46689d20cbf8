//! Reserved and built-in macro detection
//!
//! Built-in macros such as `${HOME}` are resolved by a later stage of the
//! profile pipeline. This module only needs to recognise them: user templates
//! may not shadow them, and the expander leaves them in place.

/// Names that can never be used as template keys
pub const RESERVED_KEYS: [&str; 5] = ["HOME", "CFG", "RUNUSER", "PATH", "PRIVILEGED"];

/// Identifier of a built-in macro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacroId(pub usize);

/// Lookup capability of the built-in macro resolver
pub trait MacroResolver {
    /// Resolve the textual macro form (`${NAME}`) to its id
    fn resolve(&self, macro_text: &str) -> Option<MacroId>;

    /// Resolve a bare macro name such as `HOME`.
    ///
    /// The default builds the `${NAME}` form and calls [`resolve`](Self::resolve);
    /// table-backed resolvers override it to skip that allocation.
    fn resolve_name(&self, name: &str) -> Option<MacroId> {
        self.resolve(&format!("${{{name}}}"))
    }
}

impl<R: MacroResolver + ?Sized> MacroResolver for &R {
    fn resolve(&self, macro_text: &str) -> Option<MacroId> {
        (**self).resolve(macro_text)
    }

    fn resolve_name(&self, name: &str) -> Option<MacroId> {
        (**self).resolve_name(name)
    }
}

/// Strip the `${` and `}` around a macro name
fn macro_name(macro_text: &str) -> Option<&str> {
    macro_text.strip_prefix("${")?.strip_suffix('}')
}

/// Resolver that knows no built-in macros
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMacros;

impl MacroResolver for NoMacros {
    fn resolve(&self, _macro_text: &str) -> Option<MacroId> {
        None
    }

    fn resolve_name(&self, _name: &str) -> Option<MacroId> {
        None
    }
}

/// Table of the user-directory macros understood by the profile resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinMacros;

const BUILTIN_MACROS: [&str; 8] = [
    "HOME",
    "CFG",
    "DOWNLOADS",
    "MUSIC",
    "VIDEOS",
    "PICTURES",
    "DESKTOP",
    "DOCUMENTS",
];

impl MacroResolver for BuiltinMacros {
    fn resolve(&self, macro_text: &str) -> Option<MacroId> {
        self.resolve_name(macro_name(macro_text)?)
    }

    fn resolve_name(&self, name: &str) -> Option<MacroId> {
        BUILTIN_MACROS.iter().position(|m| *m == name).map(MacroId)
    }
}

/// A fixed list of macro names, handy for tests and embedders
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    names: Vec<String>,
}

impl MacroTable {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl MacroResolver for MacroTable {
    fn resolve(&self, macro_text: &str) -> Option<MacroId> {
        self.resolve_name(macro_name(macro_text)?)
    }

    fn resolve_name(&self, name: &str) -> Option<MacroId> {
        self.names.iter().position(|n| n == name).map(MacroId)
    }
}

/// Classifies names as internal (reserved or built-in) or user-definable
#[derive(Debug, Clone, Default)]
pub struct InternalMacroGuard<R> {
    resolver: R,
}

impl<R: MacroResolver> InternalMacroGuard<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Check whether `name` belongs to the reserved set or the resolver
    pub fn is_internal(&self, name: &str) -> bool {
        if RESERVED_KEYS.contains(&name) {
            return true;
        }

        self.resolver.resolve_name(name).is_some()
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_keys_always_internal() {
        let guard = InternalMacroGuard::new(NoMacros);
        for key in RESERVED_KEYS {
            assert!(guard.is_internal(key));
        }
        assert!(!guard.is_internal("DIR"));
        assert!(!guard.is_internal("home"));
    }

    #[test]
    fn test_builtin_macros() {
        let guard = InternalMacroGuard::new(BuiltinMacros);
        assert!(guard.is_internal("DOWNLOADS"));
        assert!(guard.is_internal("DOCUMENTS"));
        assert!(!guard.is_internal("DIR"));
        assert_eq!(BuiltinMacros.resolve("${MUSIC}"), Some(MacroId(3)));
        assert_eq!(BuiltinMacros.resolve("MUSIC"), None);
        assert_eq!(BuiltinMacros.resolve_name("MUSIC"), Some(MacroId(3)));
        assert_eq!(BuiltinMacros.resolve_name("${MUSIC}"), None);
    }

    /// Resolver that only understands the `${NAME}` form
    struct TextOnly;

    impl MacroResolver for TextOnly {
        fn resolve(&self, macro_text: &str) -> Option<MacroId> {
            (macro_text == "${SOCKET}").then_some(MacroId(0))
        }
    }

    #[test]
    fn test_default_name_lookup_uses_macro_form() {
        assert_eq!(TextOnly.resolve_name("SOCKET"), Some(MacroId(0)));

        let guard = InternalMacroGuard::new(TextOnly);
        assert!(guard.is_internal("SOCKET"));
        assert!(!guard.is_internal("${SOCKET}"));
    }

    #[test]
    fn test_macro_table() {
        let table = MacroTable::new(["APPDIR", "SOCKET"]);
        assert_eq!(table.resolve("${SOCKET}"), Some(MacroId(1)));
        assert_eq!(table.resolve("SOCKET"), None);
        assert_eq!(table.resolve("${OTHER}"), None);

        let guard = InternalMacroGuard::new(table);
        assert!(guard.is_internal("APPDIR"));
        assert!(guard.is_internal("PATH"));
        assert!(!guard.is_internal("OTHER"));
    }

    #[test]
    fn test_resolver_by_reference() {
        let table = MacroTable::new(["X"]);
        let guard = InternalMacroGuard::new(&table);
        assert!(guard.is_internal("X"));
    }
}
