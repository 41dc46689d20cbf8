//! Error types for template registration and line expansion

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in a profile line
pub type Span = std::ops::Range<usize>;

/// Errors raised while declaring a template
///
/// These are fatal to startup: a malformed declaration must stop the sandbox
/// before it is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("invalid template key \"{key}\"")]
    InvalidKey { key: String },

    #[error("invalid template value in \"{key}:{value}\"")]
    InvalidValue { key: String, value: String },

    /// Key names a reserved or built-in macro
    #[error("override of \"${{{key}}}\" is not permitted")]
    ForbiddenOverride { key: String },

    #[error("template key \"{key}\" already exists")]
    DuplicateKey { key: String },
}

impl RegistrationError {
    /// The key the failed declaration was for
    pub fn key(&self) -> &str {
        match self {
            Self::InvalidKey { key }
            | Self::InvalidValue { key, .. }
            | Self::ForbiddenOverride { key }
            | Self::DuplicateKey { key } => key,
        }
    }
}

/// Errors raised while expanding a single profile line
///
/// Only the line being processed is affected; the caller decides whether to
/// drop the line or abort the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    #[error("line \"{line}\" starts with \"$\"")]
    LeadingDollar { line: String },

    #[error("unterminated macro/template key on line \"{line}\"")]
    UnterminatedReference { line: String, span: Span },

    #[error("unknown template key \"{key}\" on line \"{line}\"")]
    MissingKey {
        key: String,
        line: String,
        span: Span,
    },

    #[error("out of memory while expanding line \"{line}\"")]
    AllocationFailure { line: String },
}

impl ExpandError {
    pub fn leading_dollar(line: &str) -> Self {
        Self::LeadingDollar {
            line: line.to_string(),
        }
    }

    pub fn unterminated(line: &str, span: Span) -> Self {
        Self::UnterminatedReference {
            line: line.to_string(),
            span,
        }
    }

    pub fn missing_key(key: &str, line: &str, span: Span) -> Self {
        Self::MissingKey {
            key: key.to_string(),
            line: line.to_string(),
            span,
        }
    }

    pub fn allocation(line: &str) -> Self {
        Self::AllocationFailure {
            line: line.to_string(),
        }
    }

    /// The full line that failed to expand
    pub fn line(&self) -> &str {
        match self {
            Self::LeadingDollar { line }
            | Self::UnterminatedReference { line, .. }
            | Self::MissingKey { line, .. }
            | Self::AllocationFailure { line } => line,
        }
    }

    /// Get the offending byte range if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::LeadingDollar { .. } => Some(0..1),
            Self::UnterminatedReference { span, .. } | Self::MissingKey { span, .. } => {
                Some(span.clone())
            }
            Self::AllocationFailure { .. } => None,
        }
    }

    /// Format the error with line context using ariadne
    pub fn format(&self, source_name: &str) -> String {
        let line = self.line();
        let Some(span) = self.span() else {
            return self.to_string();
        };

        // ariadne counts characters, not bytes
        let span = char_offset(line, span.start)..char_offset(line, span.end);
        let label = match self {
            Self::LeadingDollar { .. } => "references are not allowed at the start of a line",
            Self::UnterminatedReference { .. } => "expected `${KEY}`",
            Self::MissingKey { .. } => "no template registered under this key",
            Self::AllocationFailure { .. } => "",
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, source_name, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((source_name, span))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((source_name, Source::from(line)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

fn char_offset(line: &str, byte: usize) -> usize {
    line.get(..byte)
        .map(|prefix| prefix.chars().count())
        .unwrap_or(byte)
}
