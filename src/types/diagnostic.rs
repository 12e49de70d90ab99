use std::fmt;

use crate::parse::ParseError;

/// Why a rule line did not make it into the compiled rule list.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// The line matched neither rule form, or returned an undeclared label.
    Skipped(ParseError),
    /// The line follows an unconditional `RETURN` and can never fire.
    Unreachable { fallback_line: usize },
}

/// A non-fatal note about one line of the rule block.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    line: usize,
    text: String,
    kind: DiagnosticKind,
}

impl Diagnostic {
    pub(crate) fn skipped(line: usize, text: &str, reason: ParseError) -> Self {
        Self {
            line,
            text: text.to_owned(),
            kind: DiagnosticKind::Skipped(reason),
        }
    }

    pub(crate) fn unreachable(line: usize, text: &str, fallback_line: usize) -> Self {
        Self {
            line,
            text: text.to_owned(),
            kind: DiagnosticKind::Unreachable { fallback_line },
        }
    }

    /// 1-based line number in the source text.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// The offending line, trimmed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self.kind, DiagnosticKind::Unreachable { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::Skipped(reason) => {
                write!(f, "line {}: skipped `{}`: {reason}", self.line, self.text)
            }
            DiagnosticKind::Unreachable { fallback_line } => write!(
                f,
                "line {}: `{}` is unreachable after the RETURN on line {fallback_line}",
                self.line, self.text
            ),
        }
    }
}
