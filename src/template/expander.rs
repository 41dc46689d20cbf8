//! Substitutes registered templates into profile lines

use crate::error::ExpandError;
use crate::parser::{pieces, Piece};

use super::macros::MacroResolver;
use super::registry::TemplateRegistry;

/// Expands `${KEY}` references using a registry.
///
/// Built-in macros are written back in their `${NAME}` form for the profile
/// resolver; every other reference must name a registered template.
#[derive(Debug)]
pub struct Expander<'a, R> {
    registry: &'a TemplateRegistry<R>,
}

impl<'a, R: MacroResolver> Expander<'a, R> {
    pub fn new(registry: &'a TemplateRegistry<R>) -> Self {
        Self { registry }
    }

    /// Produce a new line with every user template substituted
    pub fn expand(&self, line: &str) -> Result<String, ExpandError> {
        let mut out = LineBuilder::new(line);

        if !line.contains('$') {
            out.push(line)?;
            return Ok(out.finish());
        }

        if line.starts_with('$') {
            return Err(ExpandError::leading_dollar(line));
        }

        let guard = self.registry.guard();
        for piece in pieces(line) {
            match piece? {
                Piece::Literal(text) => out.push(text)?,
                Piece::Reference { key, span } if guard.is_internal(key) => {
                    out.push(&line[span])?;
                }
                Piece::Reference { key, span } => {
                    let value = self
                        .registry
                        .lookup(key)
                        .ok_or_else(|| ExpandError::missing_key(key, line, span))?;
                    out.push(value)?;
                }
            }
        }

        Ok(out.finish())
    }
}

/// Output buffer that reports allocation failure instead of aborting
struct LineBuilder<'l> {
    line: &'l str,
    buf: String,
}

impl<'l> LineBuilder<'l> {
    fn new(line: &'l str) -> Self {
        Self {
            line,
            buf: String::new(),
        }
    }

    fn push(&mut self, text: &str) -> Result<(), ExpandError> {
        self.buf
            .try_reserve(text.len())
            .map_err(|_| ExpandError::allocation(self.line))?;
        self.buf.push_str(text);
        Ok(())
    }

    fn finish(self) -> String {
        self.buf
    }
}
