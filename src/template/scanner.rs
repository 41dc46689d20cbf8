//! Pre-flight classification of profile lines

use std::fmt;

use crate::error::ExpandError;
use crate::parser::{pieces, Piece};

use super::macros::MacroResolver;
use super::registry::TemplateRegistry;

/// What a profile line needs before it can be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// No user templates; the line can be used as is
    NoExpansionNeeded,
    /// At least one registered template must be substituted
    ExpansionRequired,
    /// The line would fail expansion
    Invalid,
}

impl fmt::Display for LineClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LineClass::NoExpansionNeeded => "plain",
            LineClass::ExpansionRequired => "expand",
            LineClass::Invalid => "invalid",
        };
        f.write_str(s)
    }
}

/// Read-only line classifier sharing the expander's tokenizer
#[derive(Debug)]
pub struct Scanner<'a, R> {
    registry: &'a TemplateRegistry<R>,
}

impl<'a, R: MacroResolver> Scanner<'a, R> {
    pub fn new(registry: &'a TemplateRegistry<R>) -> Self {
        Self { registry }
    }

    /// Classify a line without building any output
    pub fn classify(&self, line: &str) -> LineClass {
        let class = self.check(line).unwrap_or(LineClass::Invalid);
        tracing::trace!(line, %class, "classified line");
        class
    }

    /// Classify a line, reporting the error expansion would hit.
    ///
    /// When this fails, expanding the same line fails with the same error.
    pub fn check(&self, line: &str) -> Result<LineClass, ExpandError> {
        if !line.contains('$') {
            return Ok(LineClass::NoExpansionNeeded);
        }

        let leading = line.starts_with('$');
        let guard = self.registry.guard();
        let mut needs_expansion = false;
        for piece in pieces(line) {
            // The expander rejects a leading `$` before tokenizing
            let piece = piece.map_err(|e| {
                if leading {
                    ExpandError::leading_dollar(line)
                } else {
                    e
                }
            })?;
            let Piece::Reference { key, span } = piece else {
                continue;
            };
            if guard.is_internal(key) {
                continue;
            }
            if leading {
                return Err(ExpandError::leading_dollar(line));
            }
            if !self.registry.contains(key) {
                return Err(ExpandError::missing_key(key, line, span));
            }
            needs_expansion = true;
        }

        Ok(if needs_expansion {
            LineClass::ExpansionRequired
        } else {
            LineClass::NoExpansionNeeded
        })
    }
}
