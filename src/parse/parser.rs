use tracing::warn;
use winnow::Parser;

use super::error::ParseError;
use super::grammar;
use crate::{CompiledRule, Diagnostic};

/// The result of parsing a rule block: the rules that parsed, in source
/// order, and a diagnostic for every line that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRules {
    pub rules: Vec<CompiledRule>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedRules {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with("//")
}

pub(crate) fn parse_lines<'a>(lines: impl IntoIterator<Item = (usize, &'a str)>) -> ParsedRules {
    let mut parsed = ParsedRules::default();

    for (line_no, raw) in lines {
        let line = raw.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }

        match grammar::rule_line.parse(line) {
            Ok(rule) => parsed.rules.push(CompiledRule::new(rule, line_no)),
            Err(e) => {
                let reason = describe(e.offset(), &e.inner().to_string());
                warn!(line = line_no, text = line, %reason, "skipping malformed rule line");
                parsed
                    .diagnostics
                    .push(Diagnostic::skipped(line_no, line, reason));
            }
        }
    }

    parsed
}

fn describe(offset: usize, detail: &str) -> ParseError {
    let detail = detail.trim().replace('\n', "; ");
    if detail.is_empty() {
        ParseError::at(offset + 1, "unrecognised rule")
    } else {
        ParseError::at(offset + 1, detail)
    }
}
